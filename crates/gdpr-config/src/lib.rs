//! Policy configuration loading
//!
//! Field policies live in per-entity-type TOML documents, one
//! `<entity_type>.toml` per file. This crate only reads them; editing the
//! configuration is the admin UI's job and out of scope here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gdpr_core::{
    FieldPolicy, PolicyCatalog, PolicyStore, RelationshipMode, RtaDisposition, RtfDisposition,
};

/// Raw field settings as written in a policy document. Every key is
/// optional; omitted keys get the unreviewed defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFieldPolicy {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub rta: RtaDisposition,

    #[serde(default)]
    pub rtf: RtfDisposition,

    #[serde(default)]
    pub relationship: RelationshipMode,

    #[serde(default)]
    pub sanitizer: Option<String>,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub sars_filename: Option<String>,
}

/// One policy document: all bundles of one entity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub entity_type: String,

    #[serde(default)]
    pub bundles: BTreeMap<String, BTreeMap<String, RawFieldPolicy>>,
}

impl PolicyDocument {
    pub fn into_store(self) -> PolicyStore {
        let mut store = PolicyStore::new(self.entity_type.clone());
        for (bundle, fields) in self.bundles {
            for (field_name, raw) in fields {
                store.insert(FieldPolicy {
                    entity_type: self.entity_type.clone(),
                    bundle: bundle.clone(),
                    field_name,
                    enabled: raw.enabled,
                    rta: raw.rta,
                    rtf: raw.rtf,
                    relationship: raw.relationship,
                    sanitizer: raw.sanitizer,
                    notes: raw.notes,
                    sars_filename: raw.sars_filename,
                });
            }
        }
        store
    }
}

/// Read-only access to the policy configuration directory.
pub struct PolicyConfigStore {
    dir: PathBuf,
}

impl PolicyConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default policy directory (`<config dir>/policies`).
    pub fn default_dir() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("org", "gdpr", "gdpr") {
            dirs.config_dir().join("policies")
        } else {
            PathBuf::from("~/.gdpr/policies")
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Policy store for one entity type; `Ok(None)` when the type has no
    /// document — absence means "not yet reviewed", not an error.
    pub fn load(&self, entity_type: &str) -> anyhow::Result<Option<PolicyStore>> {
        let path = self.dir.join(format!("{entity_type}.toml"));
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let document: PolicyDocument = toml::from_str(&content)?;
        Ok(Some(document.into_store()))
    }

    /// Loads every `*.toml` document in the directory into a catalog.
    pub fn load_all(&self) -> anyhow::Result<PolicyCatalog> {
        let mut catalog = PolicyCatalog::new();
        if !self.dir.exists() {
            return Ok(catalog);
        }
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let document: PolicyDocument = toml::from_str(&content)?;
            catalog.insert(document.into_store());
        }
        Ok(catalog)
    }
}
