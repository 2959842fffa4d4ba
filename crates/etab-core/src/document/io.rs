use super::Document;
use crate::config::RecalcStrategy;
use crate::error::{EtabError, Result};
use crate::storage::{formulas_path, parse_etab, parse_formulas, write_etab, write_formulas};
use etab_engine::engine::{FormulaRegistry, classify, parse_number};
use std::path::{Path, PathBuf};

impl Document {
    /// Save display texts to `path`, with formulas in the sidecar file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        write_etab(path, &self.grid)?;

        let sidecar = formulas_path(path);
        if self.formulas.is_empty() {
            if sidecar.exists() {
                std::fs::remove_file(&sidecar)?;
            }
        } else {
            write_formulas(&sidecar, &self.formulas)?;
        }

        log::info!(
            "saved {} ({}x{}, {} formulas)",
            path.display(),
            self.grid.rows(),
            self.grid.cols(),
            self.formulas.len()
        );
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(EtabError::NoFilePath);
        };
        self.save(&path)?;
        Ok(path)
    }

    /// Replace the document with the contents of `path`.
    ///
    /// Nothing changes when the file or its formula sidecar fails to parse.
    /// History is cleared on success.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let mut grid = parse_etab(path)?;
        let sidecar = formulas_path(path);
        let entries = if sidecar.exists() {
            parse_formulas(&sidecar)?
        } else {
            Vec::new()
        };

        let mut formulas = FormulaRegistry::new();
        for (cell_ref, text) in entries {
            formulas.sync(cell_ref, &text);
            let mut cell = grid.remove(&cell_ref).unwrap_or_default();
            cell.raw = text.clone();
            cell.committed = text;
            grid.insert(cell_ref, cell);
        }

        self.grid = grid;
        self.formulas = formulas;
        self.history.clear();

        self.with_internal_update(|doc| {
            for cell_ref in doc.grid.cell_refs() {
                if doc.formulas.contains(&cell_ref) {
                    // Keep the saved display until the formula is re-evaluated.
                    let style = doc.grid.get(&cell_ref).map(|c| {
                        classify(parse_number(&c.display, &doc.config.currency_symbol))
                    });
                    if let (Some(style), Some(mut cell)) = (style, doc.grid.get_mut(&cell_ref)) {
                        cell.style = style;
                    }
                } else {
                    doc.refresh_cell(&cell_ref);
                }
            }
            if doc.config.recalc == RecalcStrategy::Sweep {
                doc.sweep();
            }
        });

        log::info!(
            "loaded {} ({}x{}, {} formulas)",
            path.display(),
            self.grid.rows(),
            self.grid.cols(),
            self.formulas.len()
        );
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}
