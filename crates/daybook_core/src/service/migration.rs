//! One-shot guest-to-account import.
//!
//! # Invariants
//! - The only trigger is "account collection empty AND guest key holds
//!   records"; a non-empty account collection disables the import forever.
//! - The import is not transactional. A failure partway leaves the account
//!   collection non-empty, so the import never re-fires; the outcome count
//!   makes the truncation observable in logs.

use crate::kv::KvStore;
use crate::repo::{read_guest_collection, RepoResult};
use log::{error, info};
use serde::de::DeserializeOwned;

/// Result of one import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
}

impl ImportOutcome {
    pub const NONE: Self = Self { imported: 0 };
}

/// Returns the guest records awaiting import, or empty when the trigger
/// condition does not hold.
pub fn pending_guest_records<T: DeserializeOwned>(
    kv: &dyn KvStore,
    key: &str,
    account_is_empty: bool,
) -> Vec<T> {
    if !account_is_empty {
        return Vec::new();
    }
    read_guest_collection(kv, key)
}

/// Inserts each pending guest record into the account store.
///
/// Propagates the first insert failure; records inserted before it stay in
/// the account store (partial migration is accepted).
pub fn import_guest_records<T, F>(
    kv: &dyn KvStore,
    key: &str,
    account_is_empty: bool,
    mut insert: F,
) -> RepoResult<ImportOutcome>
where
    T: DeserializeOwned,
    F: FnMut(T) -> RepoResult<()>,
{
    let records = pending_guest_records::<T>(kv, key, account_is_empty);
    if records.is_empty() {
        return Ok(ImportOutcome::NONE);
    }

    let total = records.len();
    let mut imported = 0;
    for record in records {
        if let Err(err) = insert(record) {
            error!(
                "event=guest_import module=migration status=error key={key} imported={imported} total={total} error={err}"
            );
            return Err(err);
        }
        imported += 1;
    }

    info!("event=guest_import module=migration status=ok key={key} imported={imported}");
    Ok(ImportOutcome { imported })
}

#[cfg(test)]
mod tests {
    use super::{import_guest_records, pending_guest_records, ImportOutcome};
    use crate::kv::{KvStore, MemoryKvStore};
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn import_copies_every_pending_record() {
        let kv = MemoryKvStore::new();
        kv.set("life-rules", "[1, 2, 3]").expect("set should work");

        let mut seen = Vec::new();
        let outcome = import_guest_records::<u32, _>(&kv, "life-rules", true, |record| {
            seen.push(record);
            Ok(())
        })
        .expect("import should succeed");

        assert_eq!(outcome, ImportOutcome { imported: 3 });
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn non_empty_account_collection_disables_the_import() {
        let kv = MemoryKvStore::new();
        kv.set("life-rules", "[1]").expect("set should work");

        let pending = pending_guest_records::<u32>(&kv, "life-rules", false);
        assert!(pending.is_empty());

        let outcome = import_guest_records::<u32, _>(&kv, "life-rules", false, |_| {
            panic!("insert must not run")
        })
        .expect("gated import should be a no-op");
        assert_eq!(outcome, ImportOutcome::NONE);
    }

    #[test]
    fn corrupt_guest_payload_imports_nothing() {
        let kv = MemoryKvStore::new();
        kv.set("habits", "not-json").expect("set should work");

        let outcome = import_guest_records::<u32, _>(&kv, "habits", true, |_| {
            panic!("insert must not run")
        })
        .expect("corrupt payload should degrade to empty");
        assert_eq!(outcome, ImportOutcome::NONE);
    }

    #[test]
    fn insert_failure_stops_the_import_partway() {
        let kv = MemoryKvStore::new();
        kv.set("habits", "[1, 2, 3]").expect("set should work");

        let mut seen = Vec::new();
        let err = import_guest_records::<u32, _>(&kv, "habits", true, |record| {
            if record == 3 {
                return Err(RepoError::NotFound(Uuid::nil()));
            }
            seen.push(record);
            Ok(())
        })
        .expect_err("third insert should fail");

        assert!(matches!(err, RepoError::NotFound(_)));
        assert_eq!(seen, vec![1, 2]);
    }
}
