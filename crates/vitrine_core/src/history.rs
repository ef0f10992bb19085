use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::Element;

/// Maximum number of snapshots kept by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Immutable snapshot of the undoable part of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub elements: Vec<Element>,
    pub selected_element_id: Option<String>,
}

/// Linear undo/redo buffer.
///
/// Pushing after an undo discards every redo entry; there is no redo tree.
/// When the buffer grows past its limit the oldest entries are evicted and
/// the cursor stays on the entry just pushed.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the current entry. Meaningless while `entries` is empty.
    index: usize,
    limit: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a history keeping at most `limit` entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(entry);

        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(..overflow);
            debug!("History full, evicted {} oldest entries", overflow);
        }
        self.index = self.entries.len() - 1;
    }

    /// Steps back one entry and returns it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Steps forward one entry and returns it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index < self.entries.len() - 1
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    /// Cursor position, or `None` when nothing has been recorded.
    pub fn index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    /// Snapshot holding `n` placeholder elements, so entries are distinguishable.
    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            elements: (0..n)
                .map(|i| Element::new(format!("el-{i}"), ElementType::CtaButton))
                .collect(),
            selected_element_id: None,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let h = History::new();
        assert!(h.is_empty());
        assert_eq!(h.index(), None);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.current().is_none());
        assert_eq!(h.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn push_advances_cursor() {
        let mut h = History::new();
        h.push(entry(1));
        assert_eq!(h.index(), Some(0));
        assert!(!h.can_undo());

        h.push(entry(2));
        assert_eq!(h.len(), 2);
        assert_eq!(h.index(), Some(1));
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn undo_and_redo_walk_the_buffer() {
        let mut h = History::new();
        h.push(entry(1));
        h.push(entry(2));
        h.push(entry(3));

        assert_eq!(h.undo().unwrap(), &entry(2));
        assert_eq!(h.undo().unwrap(), &entry(1));
        assert!(h.undo().is_none());
        assert_eq!(h.index(), Some(0));

        assert_eq!(h.redo().unwrap(), &entry(2));
        assert_eq!(h.redo().unwrap(), &entry(3));
        assert!(h.redo().is_none());
        assert_eq!(h.index(), Some(2));
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut h = History::new();
        h.push(entry(1));
        h.push(entry(2));
        h.push(entry(3));
        h.undo();
        h.undo();

        h.push(entry(7));
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(h.current().unwrap(), &entry(7));
        assert_eq!(h.undo().unwrap(), &entry(1));
    }

    #[test]
    fn overflow_evicts_oldest_and_rebases_cursor() {
        let mut h = History::new();
        for n in 0..(DEFAULT_HISTORY_LIMIT + 10) {
            h.push(entry(n));
            assert!(h.len() <= DEFAULT_HISTORY_LIMIT);
            assert!(!h.can_redo());
        }
        assert_eq!(h.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(h.index(), Some(DEFAULT_HISTORY_LIMIT - 1));
        assert_eq!(h.current().unwrap(), &entry(DEFAULT_HISTORY_LIMIT + 9));

        // Oldest surviving entry is the 11th pushed.
        while h.undo().is_some() {}
        assert_eq!(h.current().unwrap(), &entry(10));
    }

    #[test]
    fn custom_limit_is_respected() {
        let mut h = History::with_limit(3);
        for n in 0..5 {
            h.push(entry(n));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.current().unwrap(), &entry(4));
    }

    #[test]
    fn zero_limit_is_clamped() {
        let mut h = History::with_limit(0);
        h.push(entry(1));
        h.push(entry(2));
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().unwrap(), &entry(2));
    }

    #[test]
    fn clear_resets() {
        let mut h = History::new();
        h.push(entry(1));
        h.push(entry(2));
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.index(), None);
    }
}
