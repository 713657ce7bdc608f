use chrono::NaiveDate;
use daybook_core::db::open_db_in_memory;
use daybook_core::repo::profile_repo::SqliteProfileRepository;
use daybook_core::{ServiceError, SessionService, StoreMode, AVERAGE_LIFESPAN_DAYS};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("test date should be valid")
}

#[test]
fn guest_sessions_have_no_identity_and_reject_profile_writes() {
    let mut session = SessionService::guest();

    assert!(session.is_guest());
    assert_eq!(session.user(), None);
    assert_eq!(session.store_mode(), StoreMode::Guest);
    assert_eq!(session.profile(), None);
    assert_eq!(session.day_of_life(date(2024, 6, 12)), None);

    let err = session
        .update_dob(date(1990, 3, 14))
        .expect_err("guest dob update must be rejected");
    assert!(matches!(err, ServiceError::NotSignedIn));
}

#[test]
fn signed_in_session_persists_the_birth_date_and_derives_counters() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut session =
        SessionService::signed_in(user, Box::new(SqliteProfileRepository::new(&conn)))
            .expect("sign-in should succeed");
    assert_eq!(session.store_mode(), StoreMode::Account(user));
    // A fresh account has no profile row yet.
    assert_eq!(session.profile(), None);

    session
        .update_dob(date(1990, 3, 14))
        .expect("dob update should succeed");
    assert_eq!(session.day_of_life(date(1990, 3, 15)), Some(2));
    assert_eq!(
        session.days_remaining(date(1990, 3, 14)),
        Some(AVERAGE_LIFESPAN_DAYS - 1)
    );

    // The next session sees the stored profile.
    let next = SessionService::signed_in(user, Box::new(SqliteProfileRepository::new(&conn)))
        .expect("sign-in should succeed");
    assert_eq!(
        next.profile().and_then(|profile| profile.dob),
        Some(date(1990, 3, 14))
    );
}

#[test]
fn profile_fields_update_together_and_sign_out_drops_the_session() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut session =
        SessionService::signed_in(user, Box::new(SqliteProfileRepository::new(&conn)))
            .expect("sign-in should succeed");

    session
        .update_profile(Some("Ada".to_string()), None)
        .expect("profile update should succeed");
    assert_eq!(
        session.profile().and_then(|profile| profile.name.as_deref()),
        Some("Ada")
    );

    session.sign_out();
    assert!(session.is_guest());
    assert_eq!(session.profile(), None);
    assert_eq!(session.store_mode(), StoreMode::Guest);
}
