//! Atomic JSON file writes shared by configs and generated maps.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// Writes `value` as pretty JSON to a sibling `.json.tmp` file, then renames
/// it over `path`. Missing parent directories are created.
pub fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
