//! Circular dependency detection for formula cells.
//!
//! Before a formula cell is evaluated we verify that following its
//! references through other formula cells never leads back to a cell
//! already on the path (e.g., A1 references B1, B1 references A1).

use std::collections::HashSet;

use super::{CellRef, FormulaRegistry};

/// Detect circular dependencies starting from a cell.
/// Returns Some(cycle_path) if a cycle is found, None otherwise.
pub fn detect_cycle(start: &CellRef, formulas: &FormulaRegistry) -> Option<Vec<CellRef>> {
    let mut visiting = HashSet::new();
    let mut finished = HashSet::new();
    let mut path = Vec::new();

    if detect_cycle_dfs(start, formulas, &mut visiting, &mut finished, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn detect_cycle_dfs(
    current: &CellRef,
    formulas: &FormulaRegistry,
    visiting: &mut HashSet<CellRef>,
    finished: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    if visiting.contains(current) {
        path.push(*current);
        return true;
    }
    if finished.contains(current) || !formulas.contains(current) {
        return false;
    }

    visiting.insert(*current);
    path.push(*current);

    for dep in formulas.dependencies(current) {
        if detect_cycle_dfs(&dep, formulas, visiting, finished, path) {
            return true;
        }
    }

    path.pop();
    visiting.remove(current);
    finished.insert(*current);
    false
}
