use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::catalog::create_element;
use crate::config::BuilderConfig;
use crate::element::{Element, ElementUpdate};
use crate::error::BuilderError;
use crate::history::{History, HistoryEntry};
use crate::storage::{PageData, PageStorage};
use crate::template::{apply_template, ProductTemplate};

// ---------------------------------------------------------------------------
// Canvas mode
// ---------------------------------------------------------------------------

/// Responsive preview width of the editing canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl CanvasMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Tablet => "Tablet",
            Self::Mobile => "Mobile",
        }
    }

    /// Maximum canvas width in pixels; `None` means full width.
    pub fn max_width_px(&self) -> Option<u32> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(768),
            Self::Mobile => Some(384),
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Desktop, Self::Tablet, Self::Mobile]
    }
}

// ---------------------------------------------------------------------------
// PageBuilder
// ---------------------------------------------------------------------------

/// The editable document: ordered elements, selection, title and undo history.
///
/// Owned by the application context and passed to whoever needs it. Every
/// element mutation records a history snapshot; selection, title and canvas
/// mode changes do not. When storage is attached and autosave is on, the page
/// is written after every change that touches elements or title.
///
/// Operations on ids that do not exist never fail:
/// - `update_element`/`delete_element` leave the document unchanged but still
///   record a snapshot,
/// - `duplicate_element` does nothing and records nothing,
/// - `select_element` keeps the previous selection.
pub struct PageBuilder {
    elements: Vec<Element>,
    selected_element_id: Option<String>,
    title: String,
    history: History,
    canvas_mode: CanvasMode,
    storage: Option<Box<dyn PageStorage>>,
    autosave: bool,
    /// Every copy id handed out, so undo or delete never frees one for reuse.
    issued_copy_ids: HashSet<String>,
}

impl PageBuilder {
    /// Creates an empty, unsaved document with default settings.
    pub fn new() -> Self {
        Self::with_config(&BuilderConfig::default())
    }

    /// Creates an empty document using `config` for title, history limit and
    /// canvas mode. No storage is attached.
    pub fn with_config(config: &BuilderConfig) -> Self {
        Self {
            elements: Vec::new(),
            selected_element_id: None,
            title: config.default_title.clone(),
            history: History::with_limit(config.history_limit),
            canvas_mode: config.canvas_mode,
            storage: None,
            autosave: config.autosave,
            issued_copy_ids: HashSet::new(),
        }
    }

    /// Opens the document saved in `storage`, or an empty one if nothing
    /// usable is stored. History starts empty either way.
    pub fn open(config: &BuilderConfig, storage: Box<dyn PageStorage>) -> Self {
        let mut builder = Self::with_config(config);
        match storage.load() {
            Some(page) => {
                info!(
                    "Restored page '{}' with {} elements",
                    page.title,
                    page.elements.len()
                );
                builder.title = page.title;
                builder.elements = dedupe_by_id(page.elements);
            }
            None => debug!("No saved page, starting empty"),
        }
        builder.storage = Some(storage);
        builder
    }

    // -----------------------------------------------------------------------
    // Element mutations
    // -----------------------------------------------------------------------

    /// Appends a new element of `element_type` and selects it. Returns the new id.
    ///
    /// Unknown types fail with [`BuilderError::UnknownElementType`] and leave
    /// the document and history untouched.
    pub fn add_element(
        &mut self,
        element_type: &str,
        parent_id: Option<String>,
    ) -> Result<String, BuilderError> {
        let element = create_element(element_type, parent_id)?;
        let id = element.id.clone();

        self.elements.push(element);
        self.selected_element_id = Some(id.clone());
        debug!("Added {} element {}", element_type, id);

        self.commit();
        Ok(id)
    }

    /// Applies `update` to the element with `id`. Returns whether it exists.
    pub fn update_element(&mut self, id: &str, update: ElementUpdate) -> bool {
        let found = match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                update.apply_to(element);
                debug!("Updated element {}", id);
                true
            }
            None => {
                debug!("Update ignored, no element {}", id);
                false
            }
        };
        self.commit();
        found
    }

    /// Removes the element with `id`, clearing the selection if it pointed at
    /// it. Returns whether anything was removed.
    pub fn delete_element(&mut self, id: &str) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        let removed = self.elements.len() != before;

        if self.selected_element_id.as_deref() == Some(id) {
            self.selected_element_id = None;
        }
        if removed {
            debug!("Deleted element {}", id);
        }
        self.commit();
        removed
    }

    /// Appends a copy of the element with `id` under a new id and selects it.
    /// Returns the copy's id, or `None` if `id` does not exist.
    pub fn duplicate_element(&mut self, id: &str) -> Option<String> {
        let original = self.elements.iter().find(|e| e.id == id)?.clone();
        let copy_id = self.unique_copy_id(id);
        let copy = Element {
            id: copy_id.clone(),
            ..original
        };

        self.elements.push(copy);
        self.selected_element_id = Some(copy_id.clone());
        debug!("Duplicated element {} as {}", id, copy_id);

        self.commit();
        Some(copy_id)
    }

    /// Replaces the whole document with fresh copies of the template's
    /// elements and clears the selection.
    pub fn apply_template(&mut self, template: &ProductTemplate) {
        self.elements = apply_template(template);
        self.selected_element_id = None;
        info!("Applied template {}", template.id);
        self.commit();
    }

    // -----------------------------------------------------------------------
    // Selection and view state
    // -----------------------------------------------------------------------

    /// Selects an element, or clears the selection with `None`. An id that
    /// is not in the document is ignored and the selection is left as is.
    pub fn select_element(&mut self, id: Option<&str>) -> bool {
        match id {
            None => {
                self.selected_element_id = None;
                true
            }
            Some(id) if self.elements.iter().any(|e| e.id == id) => {
                self.selected_element_id = Some(id.to_string());
                true
            }
            Some(id) => {
                debug!("Selection ignored, no element {}", id);
                false
            }
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.persist();
    }

    pub fn set_canvas_mode(&mut self, mode: CanvasMode) {
        self.canvas_mode = mode;
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Restores the previous snapshot. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(entry);
        debug!("Undo to history index {:?}", self.history.index());
        true
    }

    /// Re-applies the next snapshot. Returns `false` if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(entry);
        debug!("Redo to history index {:?}", self.history.index());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history.index()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected_element_id.as_deref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected_element_id
            .as_deref()
            .and_then(|id| self.element(id))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn canvas_mode(&self) -> CanvasMode {
        self.canvas_mode
    }

    /// Current `{elements, selection}` as a history entry.
    pub fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            elements: self.elements.clone(),
            selected_element_id: self.selected_element_id.clone(),
        }
    }

    /// Current document as a persistable page blob.
    pub fn page_data(&self) -> PageData {
        PageData::new(self.title.clone(), self.elements.clone())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Records a snapshot of the current state and persists it.
    fn commit(&mut self) {
        self.history.push(self.snapshot());
        self.persist();
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.elements = entry.elements;
        self.selected_element_id = entry.selected_element_id;
        self.persist();
    }

    /// Writes the page to storage. Failures are logged, never returned.
    fn persist(&self) {
        if !self.autosave {
            return;
        }
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        if let Err(e) = storage.save(&self.page_data()) {
            warn!("Failed to persist page: {e:#}");
        }
    }

    /// `<id>_copy_<millis>`, with a counter appended if that id is live or
    /// was issued earlier in this session.
    fn unique_copy_id(&mut self, id: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let base = format!("{id}_copy_{millis}");
        let mut candidate = base.clone();
        let mut n = 1;
        while self.issued_copy_ids.contains(&candidate)
            || self.elements.iter().any(|e| e.id == candidate)
        {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        self.issued_copy_ids.insert(candidate.clone());
        candidate
    }
}

/// Keeps the first element for each id. Later duplicates are dropped.
fn dedupe_by_id(elements: Vec<Element>) -> Vec<Element> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter(|element| {
            let first = seen.insert(element.id.clone());
            if !first {
                warn!("Dropping restored element with duplicate id {}", element.id);
            }
            first
        })
        .collect()
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
