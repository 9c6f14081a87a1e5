//! Right to be Forgotten execution

use std::sync::Arc;

use tracing::{info, warn};

use gdpr_core::{
    Entity, EntityRepository, Error, FieldAction, FieldMeta, FieldPolicy, FieldValue,
    ForgetOutcome, LogEntry, PolicyStore, Result, RtfDisposition,
};
use gdpr_sanitizers::SanitizerRegistry;

use crate::traversal::{GraphTraversal, NodeVisitor};

/// Field on the root account toggled off after a successful run.
const STATUS_FIELD: &str = "status";

/// Traversal visitor applying remove/anonymize dispositions, plus the
/// all-or-nothing commit phase.
///
/// Field failures are collected, not propagated: a failed field fails its
/// entity, the walk continues, and the presence of any failure blocks every
/// write at the end. Only repository failures abort the run outright.
pub struct ForgetExecutor {
    repository: Arc<dyn EntityRepository>,
    sanitizers: Arc<SanitizerRegistry>,
    outcome: ForgetOutcome,
}

impl ForgetExecutor {
    pub fn new(repository: Arc<dyn EntityRepository>, sanitizers: Arc<SanitizerRegistry>) -> Self {
        Self {
            repository,
            sanitizers,
            outcome: ForgetOutcome::default(),
        }
    }

    /// Traverses from `root` and, when every field disposition succeeded,
    /// persists all mutations and deletions inside one transaction.
    pub fn run(mut self, traversal: &GraphTraversal, root: &Entity) -> Result<ForgetOutcome> {
        traversal.traverse(root, &mut self)?;

        if !self.outcome.failures.is_empty() {
            warn!(
                failures = self.outcome.failures.len(),
                "forget run has field failures, nothing will be persisted"
            );
            return Ok(self.outcome);
        }

        self.repository.begin()?;
        match self.commit_phase(root) {
            Ok(()) => {
                if let Err(error) = self.repository.commit() {
                    self.outcome.errors.push(error.to_string());
                } else {
                    info!(
                        saved = self.outcome.successes.len(),
                        deleted = self.outcome.to_delete.len(),
                        "forget run committed"
                    );
                }
            }
            Err(error) => {
                self.repository.rollback()?;
                self.outcome.errors.push(error.to_string());
            }
        }
        Ok(self.outcome)
    }

    fn commit_phase(&mut self, root: &Entity) -> Result<()> {
        let deleted: Vec<(&str, &str)> = self
            .outcome
            .to_delete
            .iter()
            .map(|e| (e.entity_type.as_str(), e.id.as_str()))
            .collect();

        for entity in &self.outcome.to_delete {
            self.repository.delete(entity)?;
        }

        // A deletion supersedes any pending save of the same entity.
        let to_save: Vec<&Entity> = self
            .outcome
            .successes
            .iter()
            .filter(|e| !deleted.contains(&(e.entity_type.as_str(), e.id.as_str())))
            .collect();
        for entity in to_save {
            self.repository.save(entity)?;
        }

        if deleted.contains(&(root.entity_type.as_str(), root.id.as_str())) {
            return Ok(());
        }

        // Re-load the root so the block lands on top of the saves above.
        let mut fresh = self
            .repository
            .load_unchanged(&root.entity_type, &root.id)?
            .ok_or_else(|| {
                Error::Repository(format!(
                    "root entity {}/{} disappeared during commit",
                    root.entity_type, root.id
                ))
            })?;
        let blocked = match fresh.value(STATUS_FIELD) {
            Some(FieldValue::Boolean(_)) => FieldValue::Boolean(false),
            _ => FieldValue::Integer(0),
        };
        fresh.set_value(STATUS_FIELD, blocked);
        self.repository.save(&fresh)
    }

    fn log(
        &mut self,
        entity: &Entity,
        field_name: &str,
        action: FieldAction,
        sanitizer: Option<String>,
        error: Option<String>,
    ) {
        self.outcome.log.push(LogEntry {
            entity_id: entity.id.clone(),
            entity_type: format!("{}.{}", entity.entity_type, entity.bundle),
            field_name: field_name.to_string(),
            action,
            sanitizer,
            error,
        });
    }

    fn remove_field(working: &mut Entity, meta: &FieldMeta) -> Result<()> {
        if meta.is_computed {
            return Err(Error::Constraint(format!(
                "Unable to remove computed field {}: {}",
                working.entity_type, meta.name
            )));
        }
        if meta.is_required {
            return Err(Error::Constraint(format!(
                "Unable to remove required field {}: {}",
                working.entity_type, meta.name
            )));
        }
        if meta.is_read_only {
            return Err(Error::Constraint(format!(
                "Unable to remove read-only field {}: {}",
                working.entity_type, meta.name
            )));
        }
        working.clear_value(&meta.name);
        Ok(())
    }

    fn anonymize_field(
        &self,
        working: &mut Entity,
        meta: &FieldMeta,
        policy: &FieldPolicy,
    ) -> Result<String> {
        let Some(sanitizer) = self
            .sanitizers
            .resolve(policy.sanitizer.as_deref(), meta.field_type)
        else {
            return Err(Error::Configuration(format!(
                "Could not anonymize field {}: {}. Consider changing this field from \
                 'anonymize' to 'remove', or register a custom sanitizer.",
                working.entity_type, meta.name
            )));
        };

        let current = working.value(&meta.name).cloned().unwrap_or(FieldValue::Null);
        let value = sanitizer.sanitize(&current, meta)?;
        working.set_value(&meta.name, value);
        Ok(sanitizer.id().to_string())
    }
}

impl NodeVisitor for ForgetExecutor {
    fn on_entity(
        &mut self,
        entity: &Entity,
        policies: &PolicyStore,
        fields: &[FieldMeta],
        _row_id: &str,
        _parent: Option<&FieldPolicy>,
    ) -> Result<()> {
        // Mutate a fresh copy so other in-memory references to this entity
        // stay untouched if the run aborts.
        let mut working = self
            .repository
            .load_unchanged(&entity.entity_type, &entity.id)?
            .unwrap_or_else(|| entity.clone());

        let mut touched = false;
        let mut failed = false;
        let mut delete_entity = false;

        for meta in fields {
            let policy = policies.get(&entity.bundle, &meta.name);
            if !policy.enabled {
                continue;
            }

            match policy.rtf {
                RtfDisposition::Remove if meta.is_key => {
                    // Removing the identifier means removing the entity;
                    // deletion supersedes the remaining field edits.
                    self.log(entity, &meta.name, FieldAction::DeleteEntity, None, None);
                    delete_entity = true;
                    break;
                }
                RtfDisposition::Remove => match Self::remove_field(&mut working, meta) {
                    Ok(()) => {
                        touched = true;
                        self.log(entity, &meta.name, FieldAction::Remove, None, None);
                    }
                    Err(error) => {
                        let message = error.to_string();
                        warn!(
                            entity_type = %entity.entity_type,
                            id = %entity.id,
                            field = %meta.name,
                            "remove failed: {message}"
                        );
                        self.outcome.errors.push(message.clone());
                        self.log(entity, &meta.name, FieldAction::Remove, None, Some(message));
                        failed = true;
                    }
                },
                RtfDisposition::Anonymize => {
                    match self.anonymize_field(&mut working, meta, &policy) {
                        Ok(sanitizer_id) => {
                            touched = true;
                            self.log(
                                entity,
                                &meta.name,
                                FieldAction::Anonymize,
                                Some(sanitizer_id),
                                None,
                            );
                        }
                        Err(error) => {
                            let message = error.to_string();
                            warn!(
                                entity_type = %entity.entity_type,
                                id = %entity.id,
                                field = %meta.name,
                                "anonymize failed: {message}"
                            );
                            self.outcome.errors.push(message.clone());
                            self.log(
                                entity,
                                &meta.name,
                                FieldAction::Anonymize,
                                None,
                                Some(message),
                            );
                            failed = true;
                        }
                    }
                }
                RtfDisposition::Maybe | RtfDisposition::NotIncluded => {}
            }
        }

        if failed {
            // None of this entity's edits survive; keep the untouched copy.
            self.outcome.failures.push(entity.clone());
        } else if delete_entity {
            self.outcome.to_delete.push(working);
        } else if touched {
            self.outcome.successes.push(working);
        }

        Ok(())
    }
}
