//! Durable mapping from target key to last-observed fingerprint.
//!
//! The store is a hand-editable JSON object of strings. Runs load it once,
//! keep the loaded copy as an immutable snapshot, mutate a clone, and write the
//! clone back as a whole-file replacement. Writes go through a temporary file in
//! the same directory followed by a rename, so an interrupted write leaves the
//! previous complete store in place.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, WatchError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintStore {
    entries: BTreeMap<String, String>,
}

impl FingerprintStore {
    /// Read and parse the store at `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WatchError::StoreUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|source| WatchError::StoreCorrupt {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded {} store entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Replace the file at `path` with this store's contents.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let fail = |reason: String| WatchError::PersistFailed {
            path: path.to_path_buf(),
            reason,
        };

        let body = self.to_json().map_err(|e| fail(e.to_string()))?;

        // Write through a symlinked store so the link keeps pointing at the real file
        let resolved = match std::fs::canonicalize(path) {
            Ok(real) => real,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => path.to_path_buf(),
            Err(e) => return Err(fail(e.to_string())),
        };

        let dir = match resolved.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| fail(e.to_string()))?;
        tmp.write_all(&body).map_err(|e| fail(e.to_string()))?;
        tmp.as_file().sync_all().map_err(|e| fail(e.to_string()))?;

        // Keep the mode of the file being replaced; tempfiles are created 0600.
        if let Ok(meta) = std::fs::metadata(&resolved) {
            if let Err(e) = std::fs::set_permissions(tmp.path(), meta.permissions()) {
                warn!(
                    "Could not carry permissions over to {}: {}; store will be written with tempfile defaults",
                    resolved.display(),
                    e
                );
            }
        }

        tmp.persist(&resolved).map_err(|e| fail(e.error.to_string()))?;

        debug!("Persisted {} store entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Pretty JSON, four-space indent, keys sorted.
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Stored fingerprint for `key`; the empty string means never observed.
    pub fn get(&self, key: &str) -> &str {
        self.entries.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: &str, fingerprint: String) {
        self.entries.insert(key.to_string(), fingerprint);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys whose value differs from `original`, including keys absent there.
    pub fn changed_keys<'a>(&'a self, original: &FingerprintStore) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter(|(key, value)| original.entries.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FingerprintStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
