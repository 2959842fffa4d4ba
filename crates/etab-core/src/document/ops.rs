use std::collections::BTreeSet;

use super::history::{CellDelta, GridSnapshot, HistoryEntry};
use super::{Document, EditOutcome};
use crate::config::{ERROR_MARKER, ErrorDisplay, HistoryMode, RecalcStrategy};
use crate::error::{EtabError, Result};
use etab_engine::engine::{
    CellRef, EvalContext, EvalError, FORMULA_MARKER, Style, classify, detect_cycle, evaluate,
    format_currency, format_number, parse_number,
};

impl Document {
    /// Notify the document that the shell finished editing a cell.
    ///
    /// The new text must already be stored with [`etab_engine::engine::Grid::write_raw`].
    /// Call exactly once per completed edit.
    pub fn on_cell_edited(&mut self, row: usize, col: usize) -> EditOutcome {
        if self.applying_internal_update {
            return EditOutcome::Suppressed;
        }

        let cell_ref = CellRef::new(row, col);
        let Some((old_text, new_text)) = self
            .grid
            .get(&cell_ref)
            .map(|c| (c.committed.clone(), c.raw.clone()))
        else {
            return EditOutcome::Unchanged;
        };

        if old_text == new_text {
            if self.grid.get(&cell_ref).is_some_and(|c| c.is_blank()) {
                self.grid.remove(&cell_ref);
            }
            // Retyping a formula refreshes a stale result without a history entry.
            if new_text.starts_with(FORMULA_MARKER) {
                return self.with_internal_update(|doc| doc.commit_cell(cell_ref));
            }
            return EditOutcome::Unchanged;
        }

        log::debug!("edit {}: {:?} -> {:?}", cell_ref, old_text, new_text);
        let entry = match self.config.history_mode {
            HistoryMode::Delta => HistoryEntry::Cell(CellDelta {
                cell_ref,
                old_text,
                new_text,
            }),
            HistoryMode::Snapshot => {
                let after = self.snapshot();
                let mut before = after.clone();
                before.set(cell_ref, &old_text);
                HistoryEntry::Snapshot { before, after }
            }
        };
        self.history.record(entry);
        self.modified = true;

        self.with_internal_update(|doc| {
            let outcome = doc.commit_cell(cell_ref);
            if doc.config.recalc == RecalcStrategy::Sweep {
                doc.sweep();
            }
            outcome
        })
    }

    /// Store `text` in a cell and process it as a completed user edit.
    pub fn set_cell_text(&mut self, cell_ref: CellRef, text: &str) -> EditOutcome {
        if self.applying_internal_update {
            return EditOutcome::Suppressed;
        }
        self.grid.write_raw(cell_ref, text);
        self.on_cell_edited(cell_ref.row, cell_ref.col)
    }

    /// Clear a cell as a user edit.
    pub fn clear_cell(&mut self, cell_ref: CellRef) -> EditOutcome {
        self.set_cell_text(cell_ref, "")
    }

    /// Display text and style of a cell (empty and neutral when absent).
    pub fn get_display(&self, row: usize, col: usize) -> (String, Style) {
        self.grid
            .get(&CellRef::new(row, col))
            .map(|c| (c.display.clone(), c.style))
            .unwrap_or_default()
    }

    /// Append one empty row. Rows are never removed.
    pub fn add_row(&mut self) {
        self.grid.add_row();
        self.modified = true;
    }

    /// Append one empty column. Columns are never removed.
    pub fn add_column(&mut self) {
        self.grid.add_column();
        self.modified = true;
    }

    /// Re-evaluate every formula cell regardless of the configured strategy.
    /// Returns the number of sweep passes used.
    pub fn recompute_all(&mut self) -> usize {
        self.with_internal_update(|doc| doc.sweep())
    }

    /// Change the currency symbol and re-derive what depends on it.
    pub fn set_currency_symbol(&mut self, symbol: &str) {
        if self.config.currency_symbol == symbol {
            return;
        }
        self.config.currency_symbol = symbol.to_string();
        self.with_internal_update(|doc| {
            for cell_ref in doc.grid.cell_refs() {
                if !doc.formulas.contains(&cell_ref) {
                    doc.refresh_cell(&cell_ref);
                }
            }
            if doc.config.recalc == RecalcStrategy::Sweep {
                doc.sweep();
            }
        });
    }

    /// Rewrite a numeric cell in currency form (`1234.5` -> `1,234.50 ₺`),
    /// recorded as a normal edit. Formula cells are left alone.
    /// Returns whether the cell changed.
    pub fn format_currency_at(&mut self, cell_ref: CellRef) -> Result<bool> {
        let raw = self.grid.raw(&cell_ref);
        if raw.starts_with(FORMULA_MARKER) {
            return Ok(false);
        }
        let value = parse_number(&raw, &self.config.currency_symbol)
            .ok_or_else(|| EtabError::NotNumeric(raw.clone()))?;
        let formatted = format_currency(value, &self.config.currency_symbol);
        if formatted == raw {
            return Ok(false);
        }
        Ok(self.set_cell_text(cell_ref, &formatted) == EditOutcome::Applied)
    }

    /// Numeric values of a column, top to bottom, skipping non-numeric cells.
    /// This is the series the chart view plots.
    pub fn numeric_column(&self, col: usize) -> Vec<f64> {
        (0..self.grid.rows())
            .filter_map(|row| {
                self.grid
                    .get(&CellRef::new(row, col))
                    .and_then(|c| parse_number(&c.display, &self.config.currency_symbol))
            })
            .collect()
    }

    /// Raw text of the whole grid.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            cells: self.grid.raw_texts(),
        }
    }

    /// Undo the last edit
    pub fn undo(&mut self) -> Result<()> {
        let entry = self.history.pop_undo().ok_or(EtabError::NothingToUndo)?;
        log::debug!("undo ({} left)", self.history.undo_len());
        self.with_internal_update(|doc| doc.apply_history_entry(&entry, false));
        self.history.push_redo(entry);
        self.modified = true;
        Ok(())
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> Result<()> {
        let entry = self.history.pop_redo().ok_or(EtabError::NothingToRedo)?;
        log::debug!("redo ({} left)", self.history.redo_len());
        self.with_internal_update(|doc| doc.apply_history_entry(&entry, true));
        self.history.push_undo(entry);
        self.modified = true;
        Ok(())
    }

    fn apply_history_entry(&mut self, entry: &HistoryEntry, forward: bool) {
        match entry {
            HistoryEntry::Cell(delta) => {
                let text = if forward {
                    &delta.new_text
                } else {
                    &delta.old_text
                };
                self.restore_cell(delta.cell_ref, text);
            }
            HistoryEntry::Snapshot { before, after } => {
                self.restore_snapshot(if forward { after } else { before });
            }
        }
        if self.config.recalc == RecalcStrategy::Sweep {
            self.sweep();
        }
    }

    fn restore_cell(&mut self, cell_ref: CellRef, text: &str) {
        self.grid.write_raw(cell_ref, text);
        self.commit_cell(cell_ref);
    }

    fn restore_snapshot(&mut self, snapshot: &GridSnapshot) {
        self.grid.ensure_size(snapshot.rows, snapshot.cols);
        let mut targets: BTreeSet<CellRef> = self.grid.cell_refs().into_iter().collect();
        targets.extend(snapshot.cells.iter().map(|(cell_ref, _)| *cell_ref));
        for cell_ref in targets {
            let text = snapshot.text(&cell_ref);
            if self.grid.raw(&cell_ref) != text {
                self.restore_cell(cell_ref, text);
            }
        }
    }

    /// Accept a cell's raw text: sync the formula registry and refresh its display.
    pub(crate) fn commit_cell(&mut self, cell_ref: CellRef) -> EditOutcome {
        let raw = self.grid.raw(&cell_ref);
        self.formulas.sync(cell_ref, &raw);
        if raw.is_empty() {
            self.grid.remove(&cell_ref);
            return EditOutcome::Applied;
        }
        if let Some(mut cell) = self.grid.get_mut(&cell_ref) {
            cell.committed = raw;
        }
        self.refresh_cell(&cell_ref)
    }

    /// Recompute display text and style of one cell from its raw text.
    pub(crate) fn refresh_cell(&mut self, cell_ref: &CellRef) -> EditOutcome {
        let Some(raw) = self.grid.get(cell_ref).map(|c| c.raw.clone()) else {
            return EditOutcome::Unchanged;
        };

        let (display, style, outcome) = match raw.strip_prefix(FORMULA_MARKER) {
            None => {
                let style = classify(parse_number(&raw, &self.config.currency_symbol));
                (raw.clone(), style, EditOutcome::Applied)
            }
            Some(body) => match self.evaluate_cell(cell_ref, body) {
                Ok(value) => (format_number(value), classify(Some(value)), EditOutcome::Applied),
                Err(err) => {
                    log::warn!("formula in {} failed: {}", cell_ref, err);
                    match self.config.error_display {
                        ErrorDisplay::Keep => return EditOutcome::Failed(err),
                        ErrorDisplay::Marker => (
                            ERROR_MARKER.to_string(),
                            Style::default(),
                            EditOutcome::Failed(err),
                        ),
                    }
                }
            },
        };

        if let Some(mut cell) = self.grid.get_mut(cell_ref) {
            cell.display = display;
            cell.style = style;
        }
        outcome
    }

    fn evaluate_cell(&self, cell_ref: &CellRef, body: &str) -> std::result::Result<f64, EvalError> {
        if let Some(path) = detect_cycle(cell_ref, &self.formulas) {
            return Err(EvalError::CircularReference(path));
        }
        let ctx = EvalContext::new(&self.grid, &self.config.currency_symbol)
            .with_policy(self.config.references);
        evaluate(body, &ctx)
    }

    /// Re-evaluate every registered formula in row-major order, repeating
    /// until no display changes. Returns the number of passes.
    ///
    /// Cyclic formulas fail on every pass without changing their display, so
    /// the loop settles; the pass cap only guards against that invariant
    /// breaking.
    pub(crate) fn sweep(&mut self) -> usize {
        let order = self.formulas.cell_refs();
        let max_passes = order.len() + 1;
        for pass in 1..=max_passes {
            let mut changed = false;
            for cell_ref in &order {
                let before = self.grid.display(cell_ref);
                self.refresh_cell(cell_ref);
                if self.grid.display(cell_ref) != before {
                    changed = true;
                }
            }
            if !changed {
                log::debug!("sweep settled after {} pass(es) over {} formulas", pass, order.len());
                return pass;
            }
        }
        max_passes
    }
}
