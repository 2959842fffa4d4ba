use super::history::History;
use crate::config::{EngineConfig, RecalcStrategy};
use etab_engine::engine::{EvalError, FormulaRegistry, Grid};
use std::path::{Path, PathBuf};

/// Result of notifying the document about an edited cell.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    /// The text matched the last committed text of a non-formula cell; nothing was recorded.
    Unchanged,
    /// The edit was recorded and the cell's display updated.
    Applied,
    /// The edit was recorded but its formula failed; the display was not updated
    /// (or shows the error marker, depending on configuration).
    Failed(EvalError),
    /// The notification arrived while the document was writing cells itself.
    Suppressed,
}

/// UI-agnostic document state for the spreadsheet.
pub struct Document {
    /// Raw text, display text and style of every cell
    pub(crate) grid: Grid,
    /// Formula text by address, for sweep recomputation and cycle checks
    pub(crate) formulas: FormulaRegistry,
    /// Undo/redo stacks
    pub(crate) history: History,
    pub(crate) config: EngineConfig,
    /// Set while the document writes cells itself (recompute, undo/redo, load).
    /// Edit notifications received meanwhile are ignored.
    pub(crate) applying_internal_update: bool,
    /// Current file path
    pub(crate) file_path: Option<PathBuf>,
    /// Whether the grid has been modified since the last save/load
    pub(crate) modified: bool,
}

impl Document {
    /// Create a new document with default settings.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Document {
            grid: Grid::new(config.initial_rows, config.initial_cols),
            formulas: FormulaRegistry::new(),
            history: History::new(config.history_depth),
            config,
            applying_internal_update: false,
            file_path: None,
            modified: false,
        }
    }

    /// Create a new document and load a file if provided.
    pub fn with_file(path: Option<&Path>, config: EngineConfig) -> crate::Result<Self> {
        let mut doc = Self::with_config(config);
        if let Some(p) = path {
            if p.exists() {
                doc.load(p)?;
            } else {
                doc.file_path = Some(p.to_path_buf());
            }
        }
        Ok(doc)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for the shell to store typed text with
    /// [`Grid::write_raw`] before calling [`Document::on_cell_edited`].
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn formulas(&self) -> &FormulaRegistry {
        &self.formulas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    pub fn recalc_strategy(&self) -> RecalcStrategy {
        self.config.recalc
    }

    pub fn set_recalc_strategy(&mut self, strategy: RecalcStrategy) {
        self.config.recalc = strategy;
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_applying_internal_update(&self) -> bool {
        self.applying_internal_update
    }

    /// Run `f` with edit notifications suspended, restoring the previous
    /// state afterwards (nested calls are fine).
    pub(crate) fn with_internal_update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.applying_internal_update, true);
        let result = f(self);
        self.applying_internal_update = previous;
        result
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
