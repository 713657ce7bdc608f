//! Authentication collaborator surface: identity, profile, store mode.
//!
//! # Responsibility
//! - Expose the current user identity (or guest), the cached profile, and
//!   the lifetime counters derived from its birth date.
//!
//! # Invariants
//! - "No user" is guest mode, never an error.
//! - Profile mutations require a signed-in session and keep the cached
//!   profile in sync with the store.

use crate::model::profile::Profile;
use crate::repo::profile_repo::ProfileRepository;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use uuid::Uuid;

/// Store selection made once at construction time of the entity services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Guest,
    Account(Uuid),
}

/// Session state for one running process.
pub struct SessionService<'a> {
    user: Option<Uuid>,
    profile: Option<Profile>,
    repo: Option<Box<dyn ProfileRepository + 'a>>,
}

impl<'a> SessionService<'a> {
    /// A guest session: no identity, no profile, local persistence only.
    pub fn guest() -> Self {
        Self {
            user: None,
            profile: None,
            repo: None,
        }
    }

    /// An authenticated session; fetches the profile eagerly (absence of a
    /// profile row is a valid state for a fresh account).
    pub fn signed_in(user: Uuid, repo: Box<dyn ProfileRepository + 'a>) -> ServiceResult<Self> {
        let profile = repo.fetch(user)?;
        Ok(Self {
            user: Some(user),
            profile,
            repo: Some(repo),
        })
    }

    pub fn user(&self) -> Option<Uuid> {
        self.user
    }

    pub fn is_guest(&self) -> bool {
        self.user.is_none()
    }

    pub fn store_mode(&self) -> StoreMode {
        match self.user {
            Some(user) => StoreMode::Account(user),
            None => StoreMode::Guest,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Drops identity, cached profile, and the profile store handle.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.profile = None;
        self.repo = None;
    }

    /// Sets the birth date driving the lifetime counters.
    pub fn update_dob(&mut self, dob: NaiveDate) -> ServiceResult<()> {
        self.update_cached_profile(|profile| profile.dob = Some(dob))
    }

    pub fn update_profile(
        &mut self,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> ServiceResult<()> {
        self.update_cached_profile(|profile| {
            profile.name = name;
            profile.avatar_url = avatar_url;
        })
    }

    /// Days lived, counting the birth day as day 1. `None` for guests or
    /// sessions without a birth date.
    pub fn day_of_life(&self, today: NaiveDate) -> Option<i64> {
        self.profile.as_ref()?.day_of_life(today)
    }

    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.profile.as_ref()?.days_remaining(today)
    }

    fn update_cached_profile(
        &mut self,
        apply: impl FnOnce(&mut Profile),
    ) -> ServiceResult<()> {
        let user = self.user.ok_or(ServiceError::NotSignedIn)?;
        let repo = self.repo.as_ref().ok_or(ServiceError::NotSignedIn)?;

        let mut profile = self
            .profile
            .clone()
            .unwrap_or_else(|| Profile::empty(user));
        apply(&mut profile);
        repo.upsert(&profile)?;
        self.profile = Some(profile);
        Ok(())
    }
}
