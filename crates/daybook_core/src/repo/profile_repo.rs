//! Profile repository contract and its account-store implementation.
//!
//! Profiles exist only for authenticated users; guest mode has no profile
//! record, so there is no local implementation here.

use crate::model::profile::Profile;
use crate::repo::{parse_date, parse_uuid, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Repository interface for account profiles.
pub trait ProfileRepository {
    fn fetch(&self, user_id: Uuid) -> RepoResult<Option<Profile>>;
    fn upsert(&self, profile: &Profile) -> RepoResult<()>;
}

/// Account-store implementation.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn fetch(&self, user_id: Uuid) -> RepoResult<Option<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, name, avatar_url, dob
             FROM profiles
             WHERE user_id = ?1;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_profile_row(row)?)),
            None => Ok(None),
        }
    }

    fn upsert(&self, profile: &Profile) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO profiles (user_id, name, avatar_url, dob)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                avatar_url = excluded.avatar_url,
                dob = excluded.dob;",
            params![
                profile.user_id.to_string(),
                profile.name.as_deref(),
                profile.avatar_url.as_deref(),
                profile.dob.map(|dob| dob.to_string()),
            ],
        )?;
        Ok(())
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let uuid_text: String = row.get("user_id")?;
    let dob = match row.get::<_, Option<String>>("dob")? {
        Some(text) => Some(parse_date(&text, "profiles.dob")?),
        None => None,
    };

    Ok(Profile {
        user_id: parse_uuid(&uuid_text, "profiles.user_id")?,
        name: row.get("name")?,
        avatar_url: row.get("avatar_url")?,
        dob,
    })
}
