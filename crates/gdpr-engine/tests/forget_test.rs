mod common;

use std::sync::Arc;

use common::*;
use gdpr_core::{
    Entity, EntityRepository, Error, FieldAction, FieldMeta, FieldType, FieldValue,
    MemoryRepository, Result, RtfDisposition,
};
use regex::Regex;

fn user_fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::new("uid", FieldType::Integer).key(),
        FieldMeta::new("mail", FieldType::Email),
        FieldMeta::new("name", FieldType::Text),
        FieldMeta::new("status", FieldType::Integer),
        FieldMeta::reference("profile", "profile"),
        FieldMeta::reference("badges", "badge").multi_valued(),
    ]
}

fn user_seven() -> Entity {
    Entity::new("user", "user", "7")
        .with_value("uid", FieldValue::Integer(7))
        .with_value("mail", text("ben@example.org"))
        .with_value("name", text("ben"))
        .with_value("status", FieldValue::Integer(1))
}

#[test]
fn test_end_to_end_anonymize_and_block() {
    let repo = Arc::new(MemoryRepository::new());
    repo.define_fields("user", "user", user_fields());
    repo.insert(user_seven());

    let catalog = catalog(vec![
        rtf("user", "user", "mail", RtfDisposition::Anonymize, Some("email")),
        rtf("user", "user", "name", RtfDisposition::Anonymize, Some("username")),
    ]);

    let root = repo.get("user", "7").unwrap();
    let outcome = engine(repo.clone(), catalog).execute_forget(&root).unwrap();

    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.successes.len(), 1);

    let after = repo.get("user", "7").unwrap();
    let mail = after.value("mail").unwrap().as_text().unwrap();
    assert!(Regex::new(r"^anon_[a-z]+@example\.com$").unwrap().is_match(mail));

    let name = after.value("name").unwrap().as_text().unwrap();
    assert_ne!(name, "ben");
    assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));

    assert_eq!(after.value("status"), Some(&FieldValue::Integer(0)));

    let sanitizers: Vec<_> = outcome
        .log
        .iter()
        .filter_map(|entry| entry.sanitizer.as_deref())
        .collect();
    assert_eq!(sanitizers, vec!["email", "username"]);
}

#[test]
fn test_all_or_nothing_blocks_every_mutation() {
    let repo = Arc::new(MemoryRepository::new());
    repo.define_fields("user", "user", user_fields());
    repo.define_fields(
        "profile",
        "profile",
        vec![FieldMeta::new("bio", FieldType::Text)],
    );
    repo.define_fields(
        "badge",
        "badge",
        vec![FieldMeta::new("code", FieldType::Text).required()],
    );

    repo.insert(
        user_seven()
            .with_value("profile", reference("profile", "p1"))
            .with_value("badges", references("badge", &["b1"])),
    );
    repo.insert(Entity::new("profile", "profile", "p1").with_value("bio", text("born 1970")));
    repo.insert(Entity::new("badge", "badge", "b1").with_value("code", text("1234")));

    let catalog = catalog(vec![
        rtf("user", "user", "mail", RtfDisposition::Anonymize, Some("email")),
        follow("user", "user", "profile"),
        follow("user", "user", "badges"),
        rtf("profile", "profile", "bio", RtfDisposition::Remove, None),
        // Removing a required field fails, which must block everything else.
        rtf("badge", "badge", "code", RtfDisposition::Remove, None),
    ]);

    let before_user = repo.get("user", "7").unwrap();
    let before_profile = repo.get("profile", "p1").unwrap();
    let before_badge = repo.get("badge", "b1").unwrap();

    let root = before_user.clone();
    let outcome = engine(repo.clone(), catalog).execute_forget(&root).unwrap();

    assert!(!outcome.is_clean());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].id, "b1");

    assert_eq!(repo.get("user", "7").unwrap(), before_user);
    assert_eq!(repo.get("profile", "p1").unwrap(), before_profile);
    assert_eq!(repo.get("badge", "b1").unwrap(), before_badge);
}

#[test]
fn test_remove_on_identifier_deletes_whole_entity() {
    let repo = Arc::new(MemoryRepository::new());
    repo.define_fields("user", "user", user_fields());
    repo.define_fields(
        "profile",
        "profile",
        vec![
            FieldMeta::new("pid", FieldType::Integer).key(),
            FieldMeta::new("bio", FieldType::Text),
        ],
    );
    repo.insert(user_seven().with_value("profile", reference("profile", "p1")));
    repo.insert(
        Entity::new("profile", "profile", "p1")
            .with_value("pid", FieldValue::Integer(1))
            .with_value("bio", text("born 1970")),
    );

    let catalog = catalog(vec![
        rtf("user", "user", "mail", RtfDisposition::Anonymize, Some("email")),
        follow("user", "user", "profile"),
        rtf("profile", "profile", "pid", RtfDisposition::Remove, None),
    ]);

    let root = repo.get("user", "7").unwrap();
    let outcome = engine(repo.clone(), catalog).execute_forget(&root).unwrap();

    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.to_delete.len(), 1);
    assert_eq!(outcome.to_delete[0].id, "p1");
    assert!(outcome
        .log
        .iter()
        .any(|entry| entry.action == FieldAction::DeleteEntity));

    assert!(repo.get("profile", "p1").is_none());
    assert!(repo.get("user", "7").is_some());
}

#[test]
fn test_missing_sanitizer_fails_the_field_and_entity() {
    let repo = Arc::new(MemoryRepository::new());
    repo.define_fields("user", "user", user_fields());
    repo.insert(user_seven());

    let catalog = catalog(vec![
        rtf("user", "user", "mail", RtfDisposition::Anonymize, Some("email")),
        rtf("user", "user", "name", RtfDisposition::Anonymize, Some("bogus")),
    ]);

    let before = repo.get("user", "7").unwrap();
    let outcome = engine(repo.clone(), catalog).execute_forget(&before).unwrap();

    assert!(!outcome.is_clean());
    assert!(outcome.errors[0].contains("Could not anonymize"));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(repo.get("user", "7").unwrap(), before);
}

#[test]
fn test_remove_fails_on_computed_and_read_only_fields() {
    let repo = Arc::new(MemoryRepository::new());
    repo.define_fields(
        "user",
        "user",
        vec![
            FieldMeta::new("mail", FieldType::Email),
            FieldMeta::new("reputation", FieldType::Integer).computed(),
            FieldMeta::new("signup_channel", FieldType::Text).read_only(),
        ],
    );
    repo.insert(
        Entity::new("user", "user", "7")
            .with_value("mail", text("ben@example.org"))
            .with_value("reputation", FieldValue::Integer(12))
            .with_value("signup_channel", text("import")),
    );

    let catalog = catalog(vec![
        rtf("user", "user", "mail", RtfDisposition::Anonymize, Some("email")),
        rtf("user", "user", "reputation", RtfDisposition::Remove, None),
        rtf("user", "user", "signup_channel", RtfDisposition::Remove, None),
    ]);

    let before = repo.get("user", "7").unwrap();
    let outcome = engine(repo.clone(), catalog).execute_forget(&before).unwrap();

    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors.iter().any(|e| e.contains("computed")));
    assert!(outcome.errors.iter().any(|e| e.contains("read-only")));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(repo.get("user", "7").unwrap(), before);
}

#[test]
fn test_root_scheduled_for_deletion_skips_blocking() {
    let repo = Arc::new(MemoryRepository::new());
    repo.define_fields("user", "user", user_fields());
    repo.insert(user_seven());

    let catalog = catalog(vec![rtf(
        "user",
        "user",
        "uid",
        RtfDisposition::Remove,
        None,
    )]);

    let root = repo.get("user", "7").unwrap();
    let outcome = engine(repo.clone(), catalog).execute_forget(&root).unwrap();

    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
    assert!(repo.get("user", "7").is_none());
}

/// Wrapper that fails saving one specific entity, standing in for storage
/// breaking partway through the commit phase.
struct BrokenSaveRepository {
    inner: MemoryRepository,
    fail_id: String,
}

impl EntityRepository for BrokenSaveRepository {
    fn load(&self, entity_type: &str, id: &str) -> Result<Option<Entity>> {
        self.inner.load(entity_type, id)
    }

    fn load_unchanged(&self, entity_type: &str, id: &str) -> Result<Option<Entity>> {
        self.inner.load_unchanged(entity_type, id)
    }

    fn save(&self, entity: &Entity) -> Result<()> {
        if entity.id == self.fail_id {
            return Err(Error::Repository("disk full".to_string()));
        }
        self.inner.save(entity)
    }

    fn delete(&self, entity: &Entity) -> Result<()> {
        self.inner.delete(entity)
    }

    fn query(&self, entity_type: &str, field_name: &str, target_id: &str) -> Result<Vec<String>> {
        self.inner.query(entity_type, field_name, target_id)
    }

    fn field_definitions(&self, entity_type: &str, bundle: &str) -> Result<Vec<FieldMeta>> {
        self.inner.field_definitions(entity_type, bundle)
    }

    fn is_fieldable(&self, entity_type: &str) -> bool {
        self.inner.is_fieldable(entity_type)
    }

    fn begin(&self) -> Result<()> {
        self.inner.begin()
    }

    fn commit(&self) -> Result<()> {
        self.inner.commit()
    }

    fn rollback(&self) -> Result<()> {
        self.inner.rollback()
    }
}

#[test]
fn test_commit_failure_rolls_everything_back() {
    let inner = MemoryRepository::new();
    inner.define_fields("user", "user", user_fields());
    inner.define_fields(
        "profile",
        "profile",
        vec![FieldMeta::new("bio", FieldType::Text)],
    );
    inner.insert(user_seven().with_value("profile", reference("profile", "p1")));
    inner.insert(Entity::new("profile", "profile", "p1").with_value("bio", text("born 1970")));

    let repo = Arc::new(BrokenSaveRepository {
        inner,
        fail_id: "p1".to_string(),
    });

    let catalog = catalog(vec![
        rtf("user", "user", "mail", RtfDisposition::Anonymize, Some("email")),
        follow("user", "user", "profile"),
        rtf("profile", "profile", "bio", RtfDisposition::Remove, None),
    ]);

    let root = repo.load("user", "7").unwrap().unwrap();
    let before_user = root.clone();
    let before_profile = repo.load("profile", "p1").unwrap().unwrap();

    let engine = gdpr_engine::ComplianceEngine::new(
        repo.clone(),
        Arc::new(catalog),
        Arc::new(gdpr_sanitizers::SanitizerRegistry::with_defaults()),
    );
    let outcome = engine.execute_forget(&root).unwrap();

    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("disk full"));
    assert_eq!(repo.load("user", "7").unwrap().unwrap(), before_user);
    assert_eq!(repo.load("profile", "p1").unwrap().unwrap(), before_profile);
}
