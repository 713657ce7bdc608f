use daybook_core::db::open_db_in_memory;
use daybook_core::kv::MemoryKvStore;
use daybook_core::repo::rule_repo::{LocalRuleRepository, SqliteRuleRepository};
use daybook_core::{RuleService, ServiceError};
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn reorder_rewrites_every_position_and_survives_reload() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let a = service.add_rule("A").expect("add should succeed");
    let b = service.add_rule("B").expect("add should succeed");
    let c = service.add_rule("C").expect("add should succeed");

    service.reorder(&[c, a, b]).expect("reorder should succeed");

    let positions: Vec<(String, u32)> = service
        .rules()
        .iter()
        .map(|rule| (rule.content.clone(), rule.position))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("C".to_string(), 0),
            ("A".to_string(), 1),
            ("B".to_string(), 2)
        ]
    );

    let mut reloaded = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    reloaded.load().expect("reload should succeed");
    let order: Vec<&str> = reloaded
        .rules()
        .iter()
        .map(|rule| rule.content.as_str())
        .collect();
    assert_eq!(order, vec!["C", "A", "B"]);
}

#[test]
fn guest_rules_reorder_exactly_like_account_rules() {
    let kv = Arc::new(MemoryKvStore::new());

    let mut service = RuleService::new(Box::new(LocalRuleRepository::new(kv.clone())), None);
    service.load().expect("load should succeed");

    let a = service.add_rule("A").expect("add should succeed");
    let b = service.add_rule("B").expect("add should succeed");
    let c = service.add_rule("C").expect("add should succeed");

    service.reorder(&[c, a, b]).expect("reorder should succeed");

    let mut reloaded = RuleService::new(Box::new(LocalRuleRepository::new(kv)), None);
    reloaded.load().expect("reload should succeed");
    let order: Vec<(&str, u32)> = reloaded
        .rules()
        .iter()
        .map(|rule| (rule.content.as_str(), rule.position))
        .collect();
    assert_eq!(order, vec![("C", 0), ("A", 1), ("B", 2)]);
}

#[test]
fn delete_renumbers_the_remaining_rules_densely() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let _a = service.add_rule("A").expect("add should succeed");
    let b = service.add_rule("B").expect("add should succeed");
    let _c = service.add_rule("C").expect("add should succeed");

    service.delete_rule(b).expect("delete should succeed");

    let positions: Vec<u32> = service.rules().iter().map(|rule| rule.position).collect();
    assert_eq!(positions, vec![0, 1]);

    let mut reloaded = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    reloaded.load().expect("reload should succeed");
    let order: Vec<(&str, u32)> = reloaded
        .rules()
        .iter()
        .map(|rule| (rule.content.as_str(), rule.position))
        .collect();
    assert_eq!(order, vec![("A", 0), ("C", 1)]);
}

#[test]
fn reorder_rejects_non_permutations() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let a = service.add_rule("A").expect("add should succeed");
    let _b = service.add_rule("B").expect("add should succeed");

    let short = service.reorder(&[a]).expect_err("short list must be rejected");
    assert!(matches!(short, ServiceError::InvalidOrdering { .. }));

    let unknown = service
        .reorder(&[a, Uuid::new_v4()])
        .expect_err("unknown id must be rejected");
    assert!(matches!(unknown, ServiceError::NotFound(_)));
}

#[test]
fn update_rewrites_content_in_place() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let user = Uuid::new_v4();

    let mut service = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    service.load().expect("load should succeed");

    let id = service.add_rule("draft wording").expect("add should succeed");
    service
        .update_rule(id, "final wording")
        .expect("update should succeed");

    let blank = service
        .update_rule(id, "  ")
        .expect_err("blank content must be rejected");
    assert!(matches!(blank, ServiceError::Rule(_)));

    let mut reloaded = RuleService::new(Box::new(SqliteRuleRepository::new(&conn, user)), None);
    reloaded.load().expect("reload should succeed");
    assert_eq!(reloaded.rules()[0].content, "final wording");
}
