//! Cell reference scanning in formula text.
//!
//! A reference token is a run of uppercase letters followed by a run of
//! digits. Formula bodies are uppercased before scanning, so `a1` and `A1`
//! name the same cell. Tokens that match the pattern but do not decode
//! (e.g. `A0`, `B01`) are still reported by [`reference_tokens`] so the
//! evaluator can apply its reference policy to them.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// Find every reference-shaped token in an (already uppercased) formula body,
/// left to right.
pub fn reference_tokens(body: &str) -> Vec<(Range<usize>, &str)> {
    reference_re()
        .find_iter(body)
        .map(|m| (m.range(), m.as_str()))
        .collect()
}

/// Extract all decodable cell references from a formula body as dependencies.
/// Duplicates are kept, in order of appearance.
pub fn extract_dependencies(body: &str) -> Vec<CellRef> {
    let upper = body.to_ascii_uppercase();
    reference_tokens(&upper)
        .into_iter()
        .filter_map(|(_, token)| CellRef::from_str(token))
        .collect()
}

pub(crate) fn reference_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"[A-Z]+[0-9]+").expect("reference token regex must compile")
    })
}
