//! Right to Access collection

use std::sync::Arc;

use gdpr_core::{
    AccessResult, AssetRef, Entity, EntityRepository, ExportRecord, FieldMeta, FieldPolicy,
    PolicyStore, Result,
};

use crate::traversal::NodeVisitor;

/// Traversal visitor assembling the structured export dataset. Purely
/// additive; performs no mutation anywhere.
pub struct AccessCollector {
    repository: Arc<dyn EntityRepository>,
    result: AccessResult,
}

impl AccessCollector {
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self {
            repository,
            result: AccessResult::new(),
        }
    }

    pub fn into_result(self) -> AccessResult {
        self.result
    }

    /// File references are not inlined. The record carries a logical asset
    /// path and the file id goes on the side list for the packaging step.
    fn file_asset_value(&mut self, entity: &Entity, meta: &FieldMeta) -> Result<String> {
        let Some(file_ref) = entity.references(&meta.name).first() else {
            return Ok(String::new());
        };
        let file = self
            .repository
            .load(&file_ref.target_type, &file_ref.target_id)?;
        let extension = file
            .as_ref()
            .and_then(|f| f.value("uri"))
            .and_then(|v| v.as_text())
            .and_then(|uri| uri.rsplit_once('.').map(|(_, ext)| ext.to_string()));
        let path = match extension {
            Some(ext) => format!("assets/{}.{}", file_ref.target_id, ext),
            None => format!("assets/{}", file_ref.target_id),
        };
        self.result.assets.push(AssetRef {
            file_id: file_ref.target_id.clone(),
            path: path.clone(),
        });
        Ok(path)
    }
}

impl NodeVisitor for AccessCollector {
    fn on_entity(
        &mut self,
        entity: &Entity,
        policies: &PolicyStore,
        fields: &[FieldMeta],
        row_id: &str,
        _parent: Option<&FieldPolicy>,
    ) -> Result<()> {
        for meta in fields {
            let policy = policies.get(&entity.bundle, &meta.name);
            if !policy.enabled || !policy.rta.exports() {
                continue;
            }

            let value = if meta.references_files() {
                self.file_asset_value(entity, meta)?
            } else {
                entity
                    .value(&meta.name)
                    .map(|v| v.display_string())
                    .unwrap_or_default()
            };

            let file = policy
                .sars_filename
                .clone()
                .or_else(|| meta.target_type.clone())
                .unwrap_or_else(|| entity.entity_type.clone());

            self.result.insert(ExportRecord {
                entity_type: entity.entity_type.clone(),
                bundle: entity.bundle.clone(),
                entity_id: entity.id.clone(),
                field_name: meta.name.clone(),
                file,
                row_id: row_id.to_string(),
                label: meta.label.clone(),
                value,
                notes: policy.notes.clone(),
                rta: policy.rta,
            });
        }
        Ok(())
    }
}
