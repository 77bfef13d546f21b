use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::ContentIndex;
use super::parse::parse_content_index;

/// Single-attempt load of the content index. Any failure aborts
/// initialization; there is no retry.
pub fn load_content_index(path: &Path) -> Result<ContentIndex> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read content index at {}", path.display()))?;
    parse_content_index(&raw)
        .with_context(|| format!("failed to parse content index at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_index_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "notes/a": {{ "links": [] }} }}"#).unwrap();

        let index = load_content_index(file.path()).unwrap();
        assert!(index.contains("notes/a"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = load_content_index(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{error:#}").contains("failed to read content index"));
    }
}
