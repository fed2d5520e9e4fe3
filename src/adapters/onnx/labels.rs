use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Load a sidecar index→name table (`{"0": "등심", "1": "안심", ...}`).
/// `None` yields an empty table; grade labels then fall back to 1-based
/// indices.
pub fn load_label_table(path: Option<&Path>) -> Result<HashMap<usize, String>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading label table {}", path.display()))?;
    let table = serde_json::from_str(&raw)
        .with_context(|| format!("parsing label table {}", path.display()))?;
    Ok(table)
}
