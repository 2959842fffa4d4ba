//! Formula evaluation.
//!
//! A formula body is evaluated in two steps: every cell reference token is
//! replaced by the referenced cell's numeric value, then the resulting text
//! is parsed and evaluated as a plain arithmetic expression (see [`super::expr`]).

use serde::{Deserialize, Serialize};

use super::cell::Grid;
use super::cell_ref::CellRef;
use super::deps::reference_tokens;
use super::error::EvalError;
use super::expr;
use super::format::parse_number;

/// What to do with a reference-shaped token that does not decode (e.g. `A0`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Treat the token as the value 0.
    #[default]
    Lenient,
    /// Fail the whole formula with [`EvalError::InvalidAddress`].
    Strict,
}

/// Read-only inputs a formula needs.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub grid: &'a Grid,
    pub currency_symbol: &'a str,
    pub policy: ReferencePolicy,
}

impl<'a> EvalContext<'a> {
    pub fn new(grid: &'a Grid, currency_symbol: &'a str) -> Self {
        EvalContext {
            grid,
            currency_symbol,
            policy: ReferencePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Numeric value of a cell: 0 when absent or non-numeric.
    pub fn cell_value(&self, cell_ref: &CellRef) -> f64 {
        self.grid
            .get(cell_ref)
            .and_then(|cell| parse_number(&cell.display, self.currency_symbol))
            .unwrap_or(0.0)
    }
}

/// Replace every reference token in `body` with the referenced value.
///
/// Values are parenthesised so a negative value cannot merge with a
/// neighbouring operator.
pub fn substitute_references(body: &str, ctx: &EvalContext<'_>) -> Result<String, EvalError> {
    let upper = body.to_ascii_uppercase();
    let mut out = String::with_capacity(upper.len());
    let mut last = 0;

    for (range, token) in reference_tokens(&upper) {
        let value = match CellRef::from_str(token) {
            Some(cell_ref) => ctx.cell_value(&cell_ref),
            None => match ctx.policy {
                ReferencePolicy::Lenient => {
                    log::debug!("treating undecodable reference {} as 0", token);
                    0.0
                }
                ReferencePolicy::Strict => {
                    return Err(EvalError::InvalidAddress(token.to_string()));
                }
            },
        };
        out.push_str(&upper[last..range.start]);
        out.push('(');
        out.push_str(&value.to_string());
        out.push(')');
        last = range.end;
    }
    out.push_str(&upper[last..]);

    Ok(out)
}

/// Evaluate a formula body (the text after `=`) against the grid.
pub fn evaluate(body: &str, ctx: &EvalContext<'_>) -> Result<f64, EvalError> {
    if body.trim().is_empty() {
        return Err(EvalError::EmptyFormula);
    }
    let substituted = substitute_references(body, ctx)?;
    expr::parse(&substituted)?.evaluate()
}
