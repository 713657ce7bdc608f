use chrono::NaiveDate;
use daybook_core::db::open_db_in_memory;
use daybook_core::repo::habit_repo::{HabitRepository, SqliteHabitRepository};
use daybook_core::{Cadence, GoalKind, HabitService, TrackKind};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("test date should be valid")
}

#[test]
fn daily_target_progress_tracks_increments_and_never_clamps_current() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = HabitService::new(Box::new(SqliteHabitRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let habit = service
        .add_habit("pages read", GoalKind::Target, TrackKind::Count, Cadence::Daily, 8)
        .expect("add should succeed");
    let today = date(2024, 6, 12);

    service
        .log_value(habit, today, 5)
        .expect("log should succeed");
    service.increment(habit, today).expect("increment should succeed");

    let progress = service.progress(habit, today).expect("habit should exist");
    assert_eq!(progress.current, 6);
    assert_eq!(progress.percent, 75.0);
    assert!(!progress.is_complete);

    service
        .log_value(habit, today, 9)
        .expect("log should succeed");
    let over = service.progress(habit, today).expect("habit should exist");
    assert_eq!(over.current, 9);
    assert_eq!(over.percent, 100.0);
    assert!(over.is_complete);
}

#[test]
fn limit_habit_over_its_target_is_flagged_not_complete() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = HabitService::new(Box::new(SqliteHabitRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let habit = service
        .add_habit("coffees", GoalKind::Limit, TrackKind::Count, Cadence::Daily, 2)
        .expect("add should succeed");
    let today = date(2024, 6, 12);

    service
        .log_value(habit, today, 3)
        .expect("log should succeed");
    let progress = service.progress(habit, today).expect("habit should exist");
    assert!(progress.is_over_limit);
    assert!(!progress.is_complete);
}

#[test]
fn weekly_habits_sum_their_monday_start_week() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = HabitService::new(Box::new(SqliteHabitRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let habit = service
        .add_habit("runs", GoalKind::Target, TrackKind::Count, Cadence::Weekly, 3)
        .expect("add should succeed");

    // Mon 10th and Wed 12th fall in the same week; Sun 9th belongs to the
    // week before.
    service
        .log_value(habit, date(2024, 6, 9), 5)
        .expect("log should succeed");
    service
        .log_value(habit, date(2024, 6, 10), 1)
        .expect("log should succeed");
    service
        .log_value(habit, date(2024, 6, 12), 1)
        .expect("log should succeed");

    let progress = service
        .progress(habit, date(2024, 6, 13))
        .expect("habit should exist");
    assert_eq!(progress.current, 2);
}

#[test]
fn relogging_the_same_day_updates_one_row() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = HabitService::new(Box::new(SqliteHabitRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let habit = service
        .add_habit("stretch", GoalKind::Target, TrackKind::Minutes, Cadence::Daily, 15)
        .expect("add should succeed");
    let today = date(2024, 6, 12);

    service
        .log_value(habit, today, 5)
        .expect("log should succeed");
    service
        .log_value(habit, today, 12)
        .expect("relog should succeed");

    let history = service.logs_for(habit);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].value, 12);

    let repo = SqliteHabitRepository::new(&conn, user);
    assert_eq!(repo.list_logs().expect("list should succeed").len(), 1);
}

#[test]
fn decrement_floors_at_zero() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = HabitService::new(Box::new(SqliteHabitRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let habit = service
        .add_habit("pushups", GoalKind::Target, TrackKind::Count, Cadence::Daily, 20)
        .expect("add should succeed");
    let today = date(2024, 6, 12);

    service.decrement(habit, today).expect("decrement at zero is a no-op");
    let progress = service.progress(habit, today).expect("habit should exist");
    assert_eq!(progress.current, 0);

    service.increment(habit, today).expect("increment should succeed");
    service.decrement(habit, today).expect("decrement should succeed");
    let progress = service.progress(habit, today).expect("habit should exist");
    assert_eq!(progress.current, 0);
}

#[test]
fn deleting_a_habit_leaves_no_orphaned_logs() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = HabitService::new(Box::new(SqliteHabitRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let doomed = service
        .add_habit("doomed", GoalKind::Target, TrackKind::Count, Cadence::Daily, 1)
        .expect("add should succeed");
    let kept = service
        .add_habit("kept", GoalKind::Target, TrackKind::Count, Cadence::Daily, 1)
        .expect("add should succeed");

    service
        .log_value(doomed, date(2024, 6, 11), 1)
        .expect("log should succeed");
    service
        .log_value(doomed, date(2024, 6, 12), 2)
        .expect("log should succeed");
    service
        .log_value(kept, date(2024, 6, 12), 1)
        .expect("log should succeed");

    service.delete_habit(doomed).expect("delete should succeed");
    assert!(service.logs_for(doomed).is_empty());

    // The cascade holds in the store itself, not just in memory.
    let repo = SqliteHabitRepository::new(&conn, user);
    let logs = repo.list_logs().expect("list should succeed");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].habit_id, kept);
}
