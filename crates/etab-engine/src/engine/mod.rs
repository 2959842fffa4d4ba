//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`Grid`], [`FormulaRegistry`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`detect_cycle`] - Circular dependency detection
//! - [`extract_dependencies`] - Parse formula dependencies
//! - [`evaluate`] - Substitute references and evaluate arithmetic
//! - [`classify`], [`format_currency`], [`parse_number`] - Display formatting

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
pub mod expr;
mod format;

pub use cell::{Cell, FORMULA_MARKER, FormulaRegistry, Grid};
pub use cell_ref::CellRef;
pub use cycle::detect_cycle;
pub use deps::{extract_dependencies, reference_tokens};
pub use error::EvalError;
pub use eval::{EvalContext, ReferencePolicy, evaluate, substitute_references};
pub use format::{
    Alignment, Background, POSITIVE_THRESHOLD, Style, classify, format_currency, format_number,
    parse_number,
};
