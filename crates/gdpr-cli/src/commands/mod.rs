pub mod access;
pub mod forget;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};

use gdpr_config::PolicyConfigStore;
use gdpr_core::Entity;
use gdpr_engine::ComplianceEngine;
use gdpr_sanitizers::SanitizerRegistry;

use crate::fixture::{self, Dataset};

/// Builds the engine and resolves the root entity from CLI inputs.
pub(crate) fn load_engine(
    root: &str,
    data: &Path,
    policies: Option<PathBuf>,
) -> Result<(ComplianceEngine, Entity)> {
    let (entity_type, id) = fixture::parse_entity_ref(root)?;
    let repo = Dataset::from_file(data)?.into_repository();

    let dir = policies.unwrap_or_else(PolicyConfigStore::default_dir);
    let catalog = PolicyConfigStore::new(dir).load_all()?;

    let Some(root_entity) = repo.get(&entity_type, &id) else {
        bail!("Root entity {entity_type}:{id} not found in dataset");
    };

    let engine = ComplianceEngine::new(
        repo,
        Arc::new(catalog),
        Arc::new(SanitizerRegistry::with_defaults()),
    );
    Ok((engine, root_entity))
}
