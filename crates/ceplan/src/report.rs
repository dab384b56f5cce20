//! JSON artifact emission.
//!
//! Each metric is written as one flat JSON table with fixed column names so
//! a charting layer can consume it without re-deriving any statistic.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use serde::Serialize;

/// Write one artifact as pretty-printed JSON under `dir`.
pub fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    let file =
        File::create(&path).wrap_err_with(|| format!("creating artifact {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .wrap_err_with(|| format!("writing artifact {}", path.display()))?;
    tracing::debug!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![("a", 1.0), ("b", 2.0)];
        let path = write_json(dir.path(), "rows.json", &rows).unwrap();
        let text = fs::read_to_string(path).unwrap();
        let parsed: Vec<(String, f64)> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
    }
}
