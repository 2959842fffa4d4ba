//! Error types for etab core.

use thiserror::Error;

use etab_engine::engine::EvalError;

/// Errors that can occur in the etab document model
#[derive(Error, Debug)]
pub enum EtabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Formula error: {0}")]
    Eval(#[from] EvalError),

    #[error("Invalid formula entry {cell}: {message}")]
    InvalidFormulaEntry { cell: String, message: String },

    #[error("Not a number: {0:?}")]
    NotNumeric(String),

    #[error("No file path set")]
    NoFilePath,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, EtabError>;
