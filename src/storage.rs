//! Durable checkpoints for the hierarchy and the section list.
//!
//! [`LocalStore`] is a small key/value file standing in for browser local storage: each key
//! maps to an opaque JSON blob that is written and read back verbatim. Export documents bundle
//! both halves into one [`Envelope`] for moving work between machines.

use crate::error::Result;
use crate::sections::SectionList;
use crate::snapshot::{Envelope, Snapshot};
use crate::store::HierarchyStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Key under which the hierarchy snapshot is stored.
pub const STORE_KEY: &str = "johnnyDecimal";
/// Key under which the section list is stored.
pub const SECTIONS_KEY: &str = "paperSections";

#[derive(Debug, Clone)]
/// Key/value blobs backed by a single JSON file.
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store at `path`, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    #[must_use]
    /// File backing the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    /// The blob stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores a blob under `key` in memory; call [`LocalStore::flush`] to persist it.
    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    /// Forgets the blob under `key` in memory.
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Writes every entry to the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Restores the hierarchy saved under [`STORE_KEY`], if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved blob is not a valid snapshot.
    pub fn load_store(&self) -> Result<Option<HierarchyStore>> {
        self.get(STORE_KEY)
            .map(|blob| Snapshot::from_json(blob).map(HierarchyStore::restore))
            .transpose()
    }

    /// Restores the section list saved under [`SECTIONS_KEY`], if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved blob is not a valid section list.
    pub fn load_sections(&self) -> Result<Option<SectionList>> {
        self.get(SECTIONS_KEY)
            .map(|blob| serde_json::from_str::<SectionList>(blob).map_err(Into::into))
            .transpose()
    }

    /// Checkpoints both the hierarchy and the section list and flushes to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn save(&mut self, store: &HierarchyStore, sections: &SectionList) -> Result<()> {
        self.set(STORE_KEY, serde_json::to_string(&store.serialize())?);
        self.set(SECTIONS_KEY, serde_json::to_string(sections)?);
        self.flush()?;
        info!(path = %self.path.display(), "saved local store");
        Ok(())
    }
}

/// Writes an export document holding both the section list and the hierarchy.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn export_document(path: &Path, store: &HierarchyStore, sections: &SectionList) -> Result<()> {
    let envelope = Envelope {
        paper_sections: sections.clone(),
        johnny_decimal: store.serialize(),
    };
    fs::write(path, envelope.to_json()?)?;
    info!(path = %path.display(), "exported document");
    Ok(())
}

/// Reads an export document back into a store and a section list.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid export document.
pub fn import_document(path: &Path) -> Result<(HierarchyStore, SectionList)> {
    let envelope = Envelope::from_json(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), "imported document");
    Ok((
        HierarchyStore::restore(envelope.johnny_decimal),
        envelope.paper_sections,
    ))
}

#[cfg(test)]
#[path = "tests/storage.rs"]
mod tests;
