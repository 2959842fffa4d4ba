//! File formats.

mod etab;
mod formulas;

pub use etab::{parse_etab, parse_etab_content, write_etab, write_etab_content};
pub use formulas::{
    formulas_path, parse_formulas, parse_formulas_content, write_formulas,
    write_formulas_content,
};
