use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;

use super::load_engine;

pub fn handle(root: &str, data: &Path, policies: Option<PathBuf>) -> Result<()> {
    let (engine, root_entity) = load_engine(root, data, policies)?;
    let outcome = engine.execute_forget(&root_entity)?;

    if !outcome.is_clean() {
        warn!(
            errors = outcome.errors.len(),
            "forget request failed, no data was altered"
        );
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
