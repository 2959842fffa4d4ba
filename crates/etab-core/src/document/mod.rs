//! Document state and logic (UI-agnostic).

mod history;
mod io;
mod ops;
mod state;

pub use history::{CellDelta, GridSnapshot, History, HistoryEntry};
pub use state::{Document, EditOutcome};
