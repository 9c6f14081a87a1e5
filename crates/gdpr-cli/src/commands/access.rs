use std::path::{Path, PathBuf};

use anyhow::Result;

use super::load_engine;

pub fn handle(root: &str, data: &Path, policies: Option<PathBuf>) -> Result<()> {
    let (engine, root_entity) = load_engine(root, data, policies)?;
    let result = engine.collect_for_access(&root_entity)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
