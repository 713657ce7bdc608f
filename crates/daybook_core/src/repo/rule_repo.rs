//! Life rule repository contracts and both store implementations.
//!
//! # Invariants
//! - Listing returns position order.
//! - Position writes touch one record at a time; ordering transactions are
//!   the service layer's concern (it issues one update per affected record).

use crate::kv::{keys, KvStore};
use crate::model::rule::{LifeRule, RuleId};
use crate::repo::{
    parse_datetime, parse_uuid, read_guest_collection, write_guest_collection, RepoError,
    RepoResult,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const RULE_SELECT_SQL: &str = "SELECT
    uuid,
    content,
    position,
    created_at,
    updated_at
FROM life_rules";

/// Repository interface for life rules.
pub trait RuleRepository {
    /// Lists rules ordered by position.
    fn list(&self) -> RepoResult<Vec<LifeRule>>;
    fn insert(&self, rule: &LifeRule) -> RepoResult<()>;
    fn update_content(
        &self,
        id: RuleId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<()>;
    fn set_position(&self, id: RuleId, position: u32) -> RepoResult<()>;
    fn delete(&self, id: RuleId) -> RepoResult<()>;
}

/// Account-store implementation, scoped to one user.
pub struct SqliteRuleRepository<'conn> {
    conn: &'conn Connection,
    user_id: Uuid,
}

impl<'conn> SqliteRuleRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: Uuid) -> Self {
        Self { conn, user_id }
    }
}

impl RuleRepository for SqliteRuleRepository<'_> {
    fn list(&self) -> RepoResult<Vec<LifeRule>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RULE_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY position ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![self.user_id.to_string()])?;
        let mut rules = Vec::new();
        while let Some(row) = rows.next()? {
            rules.push(parse_rule_row(row)?);
        }
        Ok(rules)
    }

    fn insert(&self, rule: &LifeRule) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO life_rules (
                uuid,
                user_id,
                content,
                position,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                rule.id.to_string(),
                self.user_id.to_string(),
                rule.content.as_str(),
                rule.position,
                rule.created_at.to_rfc3339(),
                rule.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_content(
        &self,
        id: RuleId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE life_rules
             SET content = ?1, updated_at = ?2
             WHERE uuid = ?3 AND user_id = ?4;",
            params![
                content,
                updated_at.to_rfc3339(),
                id.to_string(),
                self.user_id.to_string()
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn set_position(&self, id: RuleId, position: u32) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE life_rules
             SET position = ?1
             WHERE uuid = ?2 AND user_id = ?3;",
            params![position, id.to_string(), self.user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: RuleId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM life_rules WHERE uuid = ?1 AND user_id = ?2;",
            params![id.to_string(), self.user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Guest-store implementation over the local key-value collaborator.
pub struct LocalRuleRepository {
    kv: Arc<dyn KvStore>,
}

impl LocalRuleRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn mutate<F>(&self, id: RuleId, apply: F) -> RepoResult<()>
    where
        F: FnOnce(&mut LifeRule),
    {
        let mut rules: Vec<LifeRule> = read_guest_collection(self.kv.as_ref(), keys::LIFE_RULES);
        match rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => apply(rule),
            None => return Err(RepoError::NotFound(id)),
        }
        write_guest_collection(self.kv.as_ref(), keys::LIFE_RULES, &rules);
        Ok(())
    }
}

impl RuleRepository for LocalRuleRepository {
    fn list(&self) -> RepoResult<Vec<LifeRule>> {
        let mut rules: Vec<LifeRule> = read_guest_collection(self.kv.as_ref(), keys::LIFE_RULES);
        rules.sort_by_key(|rule| rule.position);
        Ok(rules)
    }

    fn insert(&self, rule: &LifeRule) -> RepoResult<()> {
        let mut rules: Vec<LifeRule> = read_guest_collection(self.kv.as_ref(), keys::LIFE_RULES);
        rules.push(rule.clone());
        write_guest_collection(self.kv.as_ref(), keys::LIFE_RULES, &rules);
        Ok(())
    }

    fn update_content(
        &self,
        id: RuleId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        self.mutate(id, |rule| {
            rule.content = content.to_string();
            rule.updated_at = updated_at;
        })
    }

    fn set_position(&self, id: RuleId, position: u32) -> RepoResult<()> {
        self.mutate(id, |rule| rule.position = position)
    }

    fn delete(&self, id: RuleId) -> RepoResult<()> {
        let mut rules: Vec<LifeRule> = read_guest_collection(self.kv.as_ref(), keys::LIFE_RULES);
        let before = rules.len();
        rules.retain(|rule| rule.id != id);
        if rules.len() == before {
            return Err(RepoError::NotFound(id));
        }
        write_guest_collection(self.kv.as_ref(), keys::LIFE_RULES, &rules);
        Ok(())
    }
}

fn parse_rule_row(row: &Row<'_>) -> RepoResult<LifeRule> {
    let uuid_text: String = row.get("uuid")?;
    let created_text: String = row.get("created_at")?;
    let updated_text: String = row.get("updated_at")?;

    Ok(LifeRule {
        id: parse_uuid(&uuid_text, "life_rules.uuid")?,
        content: row.get("content")?,
        position: row.get("position")?,
        created_at: parse_datetime(&created_text, "life_rules.created_at")?,
        updated_at: parse_datetime(&updated_text, "life_rules.updated_at")?,
    })
}
