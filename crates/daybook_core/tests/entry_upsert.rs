use chrono::NaiveDate;
use daybook_core::db::open_db_in_memory;
use daybook_core::repo::entry_repo::SqliteEntryRepository;
use daybook_core::{EntryKind, JournalService, ServiceError};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("test date should be valid")
}

#[test]
fn weekly_entries_saved_on_different_days_share_one_record() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = JournalService::new(Box::new(SqliteEntryRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    // Wednesday, then Friday of the same Sunday-start week.
    service
        .save_entry(EntryKind::Weekly, date(2024, 6, 12), "first draft")
        .expect("first save should succeed");
    service
        .save_entry(EntryKind::Weekly, date(2024, 6, 14), "final reflection")
        .expect("second save should succeed");

    let weekly: Vec<_> = service
        .entries()
        .iter()
        .filter(|entry| entry.kind == EntryKind::Weekly)
        .collect();
    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].date, date(2024, 6, 9));
    assert_eq!(weekly[0].content, "final reflection");

    // The store agrees after a reload.
    let mut reloaded =
        JournalService::new(Box::new(SqliteEntryRepository::new(&conn, user)), None);
    reloaded.load().expect("reload should succeed");
    assert_eq!(reloaded.entries().len(), 1);
    assert_eq!(reloaded.entries()[0].content, "final reflection");
}

#[test]
fn daily_weekly_and_monthly_keys_do_not_collide() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = JournalService::new(Box::new(SqliteEntryRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let today = date(2024, 6, 9); // A Sunday and not the first of the month.
    service
        .save_entry(EntryKind::Daily, today, "day")
        .expect("daily save should succeed");
    service
        .save_entry(EntryKind::Weekly, today, "week")
        .expect("weekly save should succeed");
    service
        .save_entry(EntryKind::Monthly, today, "month")
        .expect("monthly save should succeed");

    assert_eq!(service.entries().len(), 3);
    assert_eq!(service.today_entry(today).map(|e| e.content.as_str()), Some("day"));
    assert_eq!(
        service.weekly_entry(today).map(|e| e.content.as_str()),
        Some("week")
    );
    assert_eq!(
        service.monthly_entry(today).map(|e| e.content.as_str()),
        Some("month")
    );
    assert_eq!(
        service.monthly_entry(today).map(|e| e.date),
        Some(date(2024, 6, 1))
    );
}

#[test]
fn blank_content_is_rejected_before_the_store_is_touched() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = JournalService::new(Box::new(SqliteEntryRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let err = service
        .save_entry(EntryKind::Daily, date(2024, 6, 12), "   ")
        .expect_err("blank content must be rejected");
    assert!(matches!(err, ServiceError::Entry(_)));
    assert!(service.entries().is_empty());
}

#[test]
fn delete_removes_exactly_the_addressed_entry() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = JournalService::new(Box::new(SqliteEntryRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let keep = service
        .save_entry(EntryKind::Daily, date(2024, 6, 11), "keep me")
        .expect("save should succeed");
    let drop = service
        .save_entry(EntryKind::Daily, date(2024, 6, 12), "drop me")
        .expect("save should succeed");

    service
        .delete_entry(drop.id)
        .expect("delete should succeed");
    assert_eq!(service.entries().len(), 1);
    assert_eq!(service.entries()[0].id, keep.id);

    let err = service
        .delete_entry(drop.id)
        .expect_err("second delete must report not-found");
    assert!(matches!(err, ServiceError::Repo(_)));
}

#[test]
fn recent_entries_exclude_today_and_cap_at_the_limit() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = JournalService::new(Box::new(SqliteEntryRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let today = date(2024, 6, 15);
    for day in 10..=15 {
        service
            .save_entry(EntryKind::Daily, date(2024, 6, day), format!("day {day}").as_str())
            .expect("save should succeed");
    }

    let recent = service.recent_entries(today, 3);
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].date, date(2024, 6, 14));
    assert!(recent.iter().all(|entry| entry.date != today));

    let june = service.entries_in_month(2024, 6);
    assert_eq!(june.len(), 6);
    assert_eq!(june[0].date, date(2024, 6, 10));
}
