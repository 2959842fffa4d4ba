//! Cell data structures for the spreadsheet grid.
//!
//! - [`Cell`] - Raw text as typed, plus the derived display text and style
//! - [`Grid`] - Sparse cell storage (backed by `DashMap`) with row/column bounds
//! - [`FormulaRegistry`] - Formula text by address, iterated in row-major order

use dashmap::DashMap;
use dashmap::mapref::one::{Ref, RefMut};
use std::collections::BTreeMap;

use super::cell_ref::CellRef;
use super::deps::extract_dependencies;
use super::format::Style;

/// Marker that turns a cell's text into a formula.
pub const FORMULA_MARKER: char = '=';

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Text as entered by the user (or written by the shell).
    pub raw: String,
    /// Raw text as of the last accepted edit. Used as the "old" side of
    /// history deltas when the shell writes `raw` before notifying.
    pub committed: String,
    /// Derived text shown in the grid.
    pub display: String,
    pub style: Style,
}

impl Cell {
    /// A committed cell whose display is its own text.
    pub fn new_text(text: &str) -> Cell {
        Cell {
            raw: text.to_string(),
            committed: text.to_string(),
            display: text.to_string(),
            style: Style::default(),
        }
    }

    /// Formula body (without the leading `=`), if this is a formula cell.
    pub fn formula(&self) -> Option<&str> {
        self.raw.strip_prefix(FORMULA_MARKER)
    }

    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }

    /// True when nothing about the cell is worth keeping in sparse storage.
    pub fn is_blank(&self) -> bool {
        self.raw.is_empty() && self.committed.is_empty() && self.display.is_empty()
    }
}

/// Sparse grid storage with monotonic row/column bounds.
///
/// Missing entries read as an empty cell with text `""` and numeric value 0.
#[derive(Debug, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: DashMap<CellRef, Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Grid {
        Grid {
            rows,
            cols,
            cells: DashMap::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Append one empty row.
    pub fn add_row(&mut self) {
        self.rows += 1;
    }

    /// Append one empty column.
    pub fn add_column(&mut self) {
        self.cols += 1;
    }

    /// Grow the bounds (never shrink) so they contain `cell_ref`.
    pub fn ensure_contains(&mut self, cell_ref: &CellRef) {
        self.rows = self.rows.max(cell_ref.row + 1);
        self.cols = self.cols.max(cell_ref.col + 1);
    }

    /// Grow the bounds (never shrink) to at least `rows` x `cols`.
    pub fn ensure_size(&mut self, rows: usize, cols: usize) {
        self.rows = self.rows.max(rows);
        self.cols = self.cols.max(cols);
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<Ref<'_, CellRef, Cell>> {
        self.cells.get(cell_ref)
    }

    pub fn get_mut(&self, cell_ref: &CellRef) -> Option<RefMut<'_, CellRef, Cell>> {
        self.cells.get_mut(cell_ref)
    }

    /// Raw text of a cell ("" when absent).
    pub fn raw(&self, cell_ref: &CellRef) -> String {
        self.cells
            .get(cell_ref)
            .map(|c| c.raw.clone())
            .unwrap_or_default()
    }

    /// Display text of a cell ("" when absent).
    pub fn display(&self, cell_ref: &CellRef) -> String {
        self.cells
            .get(cell_ref)
            .map(|c| c.display.clone())
            .unwrap_or_default()
    }

    /// Store new raw text for a cell, as a shell edit would.
    /// Display and committed text are left for the recalculation step.
    pub fn write_raw(&mut self, cell_ref: CellRef, text: &str) {
        self.ensure_contains(&cell_ref);
        self.cells.entry(cell_ref).or_default().raw = text.to_string();
    }

    pub fn insert(&mut self, cell_ref: CellRef, cell: Cell) {
        self.ensure_contains(&cell_ref);
        self.cells.insert(cell_ref, cell);
    }

    pub fn remove(&mut self, cell_ref: &CellRef) -> Option<Cell> {
        self.cells.remove(cell_ref).map(|(_, cell)| cell)
    }

    /// Drop all cells (bounds are kept).
    pub fn clear_cells(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cell positions in row-major order.
    pub fn cell_refs(&self) -> Vec<CellRef> {
        let mut refs: Vec<CellRef> = self.cells.iter().map(|e| *e.key()).collect();
        refs.sort();
        refs
    }

    /// Non-empty raw texts in row-major order.
    pub fn raw_texts(&self) -> Vec<(CellRef, String)> {
        let mut texts: Vec<(CellRef, String)> = self
            .cells
            .iter()
            .filter(|e| !e.raw.is_empty())
            .map(|e| (*e.key(), e.raw.clone()))
            .collect();
        texts.sort_by(|a, b| a.0.cmp(&b.0));
        texts
    }
}

/// Formula text by address, kept so formulas can be re-evaluated after any
/// referenced cell changes. Iteration is row-major.
#[derive(Clone, Debug, Default)]
pub struct FormulaRegistry {
    formulas: BTreeMap<CellRef, String>,
}

impl FormulaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or unregister a cell depending on whether `raw` is a formula.
    pub fn sync(&mut self, cell_ref: CellRef, raw: &str) {
        if raw.starts_with(FORMULA_MARKER) {
            self.formulas.insert(cell_ref, raw.to_string());
        } else {
            self.formulas.remove(&cell_ref);
        }
    }

    /// Formula text (including the leading `=`).
    pub fn get(&self, cell_ref: &CellRef) -> Option<&str> {
        self.formulas.get(cell_ref).map(String::as_str)
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.formulas.contains_key(cell_ref)
    }

    pub fn remove(&mut self, cell_ref: &CellRef) -> Option<String> {
        self.formulas.remove(cell_ref)
    }

    pub fn clear(&mut self) {
        self.formulas.clear();
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &str)> {
        self.formulas.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Formula cells in row-major order.
    pub fn cell_refs(&self) -> Vec<CellRef> {
        self.formulas.keys().copied().collect()
    }

    /// Cells referenced by the formula at `cell_ref` (empty for non-formula cells).
    pub fn dependencies(&self, cell_ref: &CellRef) -> Vec<CellRef> {
        self.formulas
            .get(cell_ref)
            .and_then(|f| f.strip_prefix(FORMULA_MARKER))
            .map(extract_dependencies)
            .unwrap_or_default()
    }
}
