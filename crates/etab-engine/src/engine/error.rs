//! Formula evaluation errors.

use thiserror::Error;

use super::cell_ref::CellRef;

/// Errors produced while resolving or evaluating a formula.
///
/// All of these are recoverable: the caller keeps the cell's raw text and
/// decides how the display reflects the failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid cell reference: {0}")]
    InvalidAddress(String),

    #[error("Syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result is not a finite number")]
    NonFinite,

    #[error("Empty formula")]
    EmptyFormula,

    #[error("Circular reference: {}", format_cycle(.0))]
    CircularReference(Vec<CellRef>),
}

fn format_cycle(path: &[CellRef]) -> String {
    path.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
