//! Formula sidecar next to a `.etab` file.
//!
//! `.etab` stores display text only, so formulas are kept in
//! `<stem>.formulas.toml`:
//!
//! ```toml
//! [formulas]
//! A1 = "=B1+1"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EtabError, Result};
use etab_engine::engine::{CellRef, FORMULA_MARKER, FormulaRegistry};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FormulasFile {
    #[serde(default)]
    formulas: BTreeMap<String, String>,
}

/// Sidecar path for a grid file (`sheet.etab` -> `sheet.formulas.toml`).
pub fn formulas_path(path: &Path) -> PathBuf {
    path.with_extension("formulas.toml")
}

/// Read a sidecar file into `(cell, formula text)` pairs, row-major.
pub fn parse_formulas(path: &Path) -> Result<Vec<(CellRef, String)>> {
    let content = fs::read_to_string(path)?;
    parse_formulas_content(&content)
}

pub fn parse_formulas_content(content: &str) -> Result<Vec<(CellRef, String)>> {
    let file: FormulasFile = toml::from_str(content)?;
    let mut entries = Vec::with_capacity(file.formulas.len());
    for (name, text) in file.formulas {
        let cell_ref = CellRef::from_str(&name).ok_or_else(|| EtabError::InvalidFormulaEntry {
            cell: name.clone(),
            message: "not a cell address".to_string(),
        })?;
        if !text.starts_with(FORMULA_MARKER) {
            return Err(EtabError::InvalidFormulaEntry {
                cell: name,
                message: format!("formula must start with '{}'", FORMULA_MARKER),
            });
        }
        entries.push((cell_ref, text));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Write every registered formula to a sidecar file
pub fn write_formulas(path: &Path, formulas: &FormulaRegistry) -> Result<()> {
    let content = write_formulas_content(formulas)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn write_formulas_content(formulas: &FormulaRegistry) -> Result<String> {
    let file = FormulasFile {
        formulas: formulas
            .iter()
            .map(|(cell_ref, text)| (cell_ref.to_string(), text.to_string()))
            .collect(),
    };
    Ok(toml::to_string(&file)?)
}
