use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::BuilderConfig;
use crate::element::Element;

/// Fixed id of the single persisted page.
pub const CURRENT_PAGE_ID: &str = "current-page";

/// The persisted page blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub id: String,
    pub title: String,
    pub elements: Vec<Element>,
    pub last_modified: DateTime<Utc>,
}

/// Lenient decoding shape: every field may be missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPage {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    elements: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
}

impl PageData {
    /// Snapshot of the current document, stamped now.
    pub fn new(title: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            id: CURRENT_PAGE_ID.into(),
            title: title.into(),
            elements,
            last_modified: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize page")
    }

    /// Parses a stored blob. Returns `None` if the blob is not valid JSON or
    /// does not match the page shape. Missing `title`/`elements` are filled
    /// independently (`default_title`, no elements). Elements that fail to
    /// decode are dropped one by one so the rest of the page survives.
    pub fn from_json(json: &str, default_title: &str) -> Option<Self> {
        let stored: StoredPage = match serde_json::from_str(json) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Discarding malformed page data: {e}");
                return None;
            }
        };
        Some(Self {
            id: CURRENT_PAGE_ID.into(),
            title: stored
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| default_title.to_string()),
            elements: decode_elements(stored.elements.unwrap_or_default()),
            last_modified: stored.last_modified.unwrap_or_else(Utc::now),
        })
    }
}

fn decode_elements(values: Vec<serde_json::Value>) -> Vec<Element> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Element>(value) {
            Ok(element) => Some(element),
            Err(e) => {
                warn!("Skipping unreadable element at position {index}: {e}");
                None
            }
        })
        .collect()
}

/// A single-slot key-value store for the current page.
///
/// `load` never errors: missing or unreadable data reads as `None`.
pub trait PageStorage: Send {
    fn load(&self) -> Option<PageData>;
    fn save(&self, page: &PageData) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Stores the page as one JSON file. Every save overwrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    default_title: String,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>, default_title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_title: default_title.into(),
        }
    }

    /// Storage at the path derived from `config` (`~/.vitrine/<storage_key>.json`).
    pub fn from_config(config: &BuilderConfig) -> Result<Self> {
        BuilderConfig::ensure_dirs()?;
        Ok(Self::new(config.page_path()?, config.default_title.clone()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageStorage for FileStorage {
    fn load(&self) -> Option<PageData> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No saved page at {}: {e}", self.path.display());
                return None;
            }
        };
        PageData::from_json(&content, &self.default_title)
    }

    fn save(&self, page: &PageData) -> Result<()> {
        let content = page.to_json()?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to save page: {}", self.path.display()))?;
        debug!(
            "Saved page '{}' ({} elements) to {}",
            page.title,
            page.elements.len(),
            self.path.display()
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove page: {}", self.path.display()))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process storage holding the serialized blob, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
    default_title: String,
}

impl MemoryStorage {
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(None),
            default_title: default_title.into(),
        }
    }

    /// Seeds the slot with a raw blob, valid or not.
    pub fn with_raw(self, raw: impl Into<String>) -> Self {
        *self.slot.lock() = Some(raw.into());
        self
    }

    /// Raw blob currently stored.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl PageStorage for MemoryStorage {
    fn load(&self) -> Option<PageData> {
        let raw = self.slot.lock().clone()?;
        PageData::from_json(&raw, &self.default_title)
    }

    fn save(&self, page: &PageData) -> Result<()> {
        let content = page.to_json()?;
        *self.slot.lock() = Some(content);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

impl<S: PageStorage + Sync + ?Sized> PageStorage for std::sync::Arc<S> {
    fn load(&self) -> Option<PageData> {
        (**self).load()
    }

    fn save(&self, page: &PageData) -> Result<()> {
        (**self).save(page)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_element;
    use tempfile::TempDir;

    const TITLE: &str = "Página sem título";

    fn sample_page() -> PageData {
        PageData::new(
            "Monitor 27\"",
            vec![
                create_element("product-section", None).unwrap(),
                create_element("cta-button", None).unwrap(),
            ],
        )
    }

    #[test]
    fn page_json_uses_wire_names() {
        let value: serde_json::Value =
            serde_json::from_str(&sample_page().to_json().unwrap()).unwrap();
        assert_eq!(value["id"], "current-page");
        assert_eq!(value["title"], "Monitor 27\"");
        assert!(value["lastModified"].is_string());
        assert_eq!(value["elements"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn from_json_malformed_is_none() {
        assert!(PageData::from_json("not json", TITLE).is_none());
        assert!(PageData::from_json("[1,2,3]", TITLE).is_none());
        assert!(PageData::from_json(r#"{"elements": 5}"#, TITLE).is_none());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let page = PageData::from_json("{}", TITLE).unwrap();
        assert_eq!(page.title, TITLE);
        assert!(page.elements.is_empty());
        assert_eq!(page.id, CURRENT_PAGE_ID);

        let page = PageData::from_json(r#"{"title": "Fone"}"#, TITLE).unwrap();
        assert_eq!(page.title, "Fone");
    }

    #[test]
    fn from_json_skips_only_unreadable_elements() {
        let page = PageData::from_json(
            r#"{"title": "Fone", "elements": [
                {"id": "a", "type": "cta-button", "style": {"margin": {"top": -8}}},
                {"type": "cta-button"},
                {"id": "c", "type": "cta-button", "style": {"padding": {"top": "big"}}},
                {"id": "d", "type": "product-section"}
            ]}"#,
            TITLE,
        )
        .unwrap();
        let ids: Vec<_> = page.elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "d"]);
        assert_eq!(page.elements[0].style.as_ref().unwrap().margin.unwrap().top, Some(-8));
    }

    #[test]
    fn file_storage_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("page.json"), TITLE);
        let page = sample_page();

        storage.save(&page).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded, page);
    }

    #[test]
    fn file_storage_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("page.json"), TITLE);
        assert!(storage.load().is_none());
    }

    #[test]
    fn file_storage_corrupt_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.json");
        std::fs::write(&path, "{{{{").unwrap();
        assert!(FileStorage::new(&path, TITLE).load().is_none());
    }

    #[test]
    fn file_storage_save_overwrites() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("page.json"), TITLE);
        storage.save(&sample_page()).unwrap();
        storage.save(&PageData::new("Segunda", Vec::new())).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.title, "Segunda");
        assert!(loaded.elements.is_empty());
    }

    #[test]
    fn file_storage_clear_removes_file() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("page.json"), TITLE);
        storage.save(&sample_page()).unwrap();
        storage.clear().unwrap();
        assert!(!storage.path().exists());
        // Clearing twice is fine.
        storage.clear().unwrap();
    }

    #[test]
    fn memory_storage_round_trip_and_clear() {
        let storage = MemoryStorage::new(TITLE);
        assert!(storage.load().is_none());

        let page = sample_page();
        storage.save(&page).unwrap();
        assert_eq!(storage.load().unwrap(), page);

        storage.clear().unwrap();
        assert!(storage.raw().is_none());
    }

    #[test]
    fn memory_storage_seeded_with_garbage_is_none() {
        let storage = MemoryStorage::new(TITLE).with_raw("<<garbage>>");
        assert!(storage.load().is_none());
    }
}
