use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

const STORE_DIR: &str = "notegraph";
const STORE_FILE: &str = "visited.json";

/// Durable set of item ids the user has navigated to, kept under a fixed
/// namespaced path. `add` writes through; read failures degrade to an empty
/// set rather than aborting.
pub(crate) struct VisitedStore {
    path: Option<PathBuf>,
    ids: BTreeSet<String>,
}

impl VisitedStore {
    pub fn open_default() -> Self {
        match default_store_path() {
            Some(path) => Self::open(path),
            None => {
                warn!("no data directory available, visited set will not persist");
                Self {
                    path: None,
                    ids: BTreeSet::new(),
                }
            }
        }
    }

    pub fn open(path: PathBuf) -> Self {
        let ids = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(ids) => ids,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "visited store is corrupt, starting empty"
                    );
                    BTreeSet::new()
                }
            },
            // Missing file is the normal first run.
            Err(_) => BTreeSet::new(),
        };

        Self {
            path: Some(path),
            ids,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn add(&mut self, id: &str) {
        if self.ids.insert(id.to_string()) {
            self.save();
        }
    }

    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent()
            && let Err(error) = fs::create_dir_all(parent)
        {
            warn!(path = %path.display(), error = %error, "failed to create visited store directory");
            return;
        }

        match serde_json::to_string_pretty(&self.ids) {
            Ok(raw) => {
                if let Err(error) = fs::write(path, raw) {
                    warn!(path = %path.display(), error = %error, "failed to write visited store");
                }
            }
            Err(error) => warn!(error = %error, "failed to serialize visited store"),
        }
    }
}

fn default_store_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
        .or_else(|| {
            std::env::var_os("HOME").map(|home| Path::new(&home).join(".local").join("share"))
        })?;
    Some(base.join(STORE_DIR).join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("visited.json");

        let mut store = VisitedStore::open(path.clone());
        assert!(!store.contains("notes/a"));
        store.add("notes/a");
        store.add("notes/a");
        assert_eq!(store.len(), 1);

        let reopened = VisitedStore::open(path);
        assert!(reopened.contains("notes/a"));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn corrupt_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visited.json");
        fs::write(&path, "definitely not json").unwrap();

        let store = VisitedStore::open(path);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn missing_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = VisitedStore::open(dir.path().join("visited.json"));
        assert_eq!(store.len(), 0);
    }
}
