//! Bounded undo/redo stacks.
//!
//! The stacks only store entries; applying an entry to the grid is the
//! document's job (see `Document::undo`/`Document::redo`).

use std::collections::VecDeque;

use etab_engine::engine::CellRef;

/// A single-cell edit: the cell's raw text before and after.
#[derive(Clone, Debug, PartialEq)]
pub struct CellDelta {
    pub cell_ref: CellRef,
    pub old_text: String,
    pub new_text: String,
}

/// Raw text of every non-empty cell plus the grid bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Row-major, no empty texts.
    pub cells: Vec<(CellRef, String)>,
}

impl GridSnapshot {
    pub fn text(&self, cell_ref: &CellRef) -> &str {
        self.cells
            .binary_search_by(|(r, _)| r.cmp(cell_ref))
            .map(|idx| self.cells[idx].1.as_str())
            .unwrap_or("")
    }

    /// Replace one cell's text, keeping the row-major order.
    pub fn set(&mut self, cell_ref: CellRef, text: &str) {
        match self.cells.binary_search_by(|(r, _)| r.cmp(&cell_ref)) {
            Ok(idx) if text.is_empty() => {
                self.cells.remove(idx);
            }
            Ok(idx) => self.cells[idx].1 = text.to_string(),
            Err(_) if text.is_empty() => {}
            Err(idx) => self.cells.insert(idx, (cell_ref, text.to_string())),
        }
    }
}

/// A reversible record of one accepted edit.
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryEntry {
    Cell(CellDelta),
    Snapshot {
        before: GridSnapshot,
        after: GridSnapshot,
    },
}

/// Linear undo/redo history with a fixed depth per stack.
#[derive(Clone, Debug)]
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            undo: VecDeque::with_capacity(capacity),
            redo: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a new edit. Invalidates the redo future.
    pub fn record(&mut self, entry: HistoryEntry) {
        push_bounded(&mut self.undo, entry, self.capacity);
        self.redo.clear();
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop_back()
    }

    /// Move an undone entry onto the redo stack.
    pub fn push_redo(&mut self, entry: HistoryEntry) {
        push_bounded(&mut self.redo, entry, self.capacity);
    }

    /// Move a redone entry back onto the undo stack (redo stack is kept).
    pub fn push_undo(&mut self, entry: HistoryEntry) {
        push_bounded(&mut self.undo, entry, self.capacity);
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, capacity: usize) {
    if capacity == 0 {
        return;
    }
    stack.push_back(entry);
    while stack.len() > capacity {
        stack.pop_front();
    }
}
