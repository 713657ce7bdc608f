//! Life rule use-case service.
//!
//! # Responsibility
//! - Own the ordered rule collection and keep positions dense.
//!
//! # Invariants
//! - In-memory order is position order; positions are always 0..n-1 after
//!   any mutation settles.
//! - Position writes go out one record at a time with no transactional
//!   grouping; a partial failure leaves the store behind the in-memory
//!   order until the next successful rewrite.

use crate::kv::{keys, KvStore};
use crate::model::rule::{LifeRule, RuleId, RuleValidationError};
use crate::repo::rule_repo::RuleRepository;
use crate::service::{migration, ServiceError, ServiceResult};
use chrono::Utc;
use log::error;
use std::sync::Arc;

/// Use-case service for life rules.
pub struct RuleService<'a> {
    repo: Box<dyn RuleRepository + 'a>,
    guest_vault: Option<Arc<dyn KvStore>>,
    rules: Vec<LifeRule>,
    loaded: bool,
    saving: bool,
}

impl<'a> RuleService<'a> {
    pub fn new(
        repo: Box<dyn RuleRepository + 'a>,
        guest_vault: Option<Arc<dyn KvStore>>,
    ) -> Self {
        Self {
            repo,
            guest_vault,
            rules: Vec::new(),
            loaded: false,
            saving: false,
        }
    }

    pub fn load(&mut self) -> ServiceResult<()> {
        let mut rules = self.repo.list()?;

        if let Some(kv) = self.guest_vault.as_deref() {
            let repo = self.repo.as_ref();
            let outcome = migration::import_guest_records(
                kv,
                keys::LIFE_RULES,
                rules.is_empty(),
                |record: LifeRule| repo.insert(&record),
            )?;
            if outcome.imported > 0 {
                rules = repo.list()?;
            }
        }

        self.rules = rules;
        self.loaded = true;
        Ok(())
    }

    /// Appends a rule at the end of the ordering.
    pub fn add_rule(&mut self, content: &str) -> ServiceResult<RuleId> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(RuleValidationError::BlankContent.into());
        }

        let rule = LifeRule::new(trimmed, self.rules.len() as u32);
        self.saving = true;
        let outcome = self.repo.insert(&rule);
        self.saving = false;

        match outcome {
            Ok(()) => {
                let id = rule.id;
                self.rules.push(rule);
                Ok(id)
            }
            Err(err) => {
                error!("event=rule_add module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn update_rule(&mut self, id: RuleId, content: &str) -> ServiceResult<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(RuleValidationError::BlankContent.into());
        }

        let now = Utc::now();
        self.saving = true;
        let outcome = self.repo.update_content(id, trimmed, now);
        self.saving = false;

        match outcome {
            Ok(()) => {
                if let Some(rule) = self.rules.iter_mut().find(|rule| rule.id == id) {
                    rule.content = trimmed.to_string();
                    rule.updated_at = now;
                }
                Ok(())
            }
            Err(err) => {
                error!("event=rule_update module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes a rule and renumbers the remainder to keep positions dense.
    pub fn delete_rule(&mut self, id: RuleId) -> ServiceResult<()> {
        self.saving = true;
        let outcome = self.repo.delete(id);
        self.saving = false;

        match outcome {
            Ok(()) => {
                self.rules.retain(|rule| rule.id != id);
                self.sync_positions()
            }
            Err(err) => {
                error!("event=rule_delete module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Rewrites the ordering to match `ordered_ids` exactly.
    pub fn reorder(&mut self, ordered_ids: &[RuleId]) -> ServiceResult<()> {
        if ordered_ids.len() != self.rules.len() {
            return Err(ServiceError::InvalidOrdering {
                expected: self.rules.len(),
                given: ordered_ids.len(),
            });
        }

        let mut reordered = Vec::with_capacity(self.rules.len());
        for id in ordered_ids {
            let index = self
                .rules
                .iter()
                .position(|rule| rule.id == *id)
                .ok_or(ServiceError::NotFound(*id))?;
            reordered.push(self.rules.remove(index));
        }
        self.rules = reordered;

        self.sync_positions()
    }

    pub fn rules(&self) -> &[LifeRule] {
        &self.rules
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Rewrites every out-of-place position, one store update per record.
    /// All records are attempted even after a failure; the first error is
    /// reported once the sweep finishes.
    fn sync_positions(&mut self) -> ServiceResult<()> {
        let mut first_error = None;

        self.saving = true;
        for (index, rule) in self.rules.iter_mut().enumerate() {
            let position = index as u32;
            if rule.position == position {
                continue;
            }
            rule.position = position;
            if let Err(err) = self.repo.set_position(rule.id, position) {
                error!(
                    "event=rule_reorder module=service status=error rule={} error={err}",
                    rule.id
                );
                first_error.get_or_insert(err);
            }
        }
        self.saving = false;

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
