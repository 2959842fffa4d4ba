//! etab-core - UI-agnostic document model + storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::{EngineConfig, ErrorDisplay, HistoryMode, RecalcStrategy};
pub use document::{CellDelta, Document, EditOutcome, GridSnapshot, History, HistoryEntry};
pub use error::{EtabError, Result};

pub use etab_engine::engine::{CellRef, EvalError, Style};
