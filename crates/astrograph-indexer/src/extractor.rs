//! Shared code-unit extraction policy (§4.3), factored out of the
//! tree-sitter and LSP plugin implementations so both apply it identically:
//! overlapping-range dedup (first occurrence wins) and the import-only
//! filter.

use astrograph_core::CodeUnit;

/// Deduplicate by `(kind, start_line, end_line, name)` — grammar oddities
/// sometimes emit the same region twice; the first occurrence wins.
pub fn dedup_units(raw: Vec<CodeUnit>) -> Vec<CodeUnit> {
    let mut seen = std::collections::HashSet::new();
    let mut units = Vec::with_capacity(raw.len());
    for unit in raw {
        if seen.insert(unit.dedup_key()) {
            units.push(unit);
        }
    }
    units
}

/// Drop units whose `extracted_code` begins (after leading whitespace)
/// with `import ` or `from ` — LSP-surfaced module-wiring boilerplate that
/// is not an actionable duplication signal.
pub fn filter_import_only(units: Vec<CodeUnit>) -> Vec<CodeUnit> {
    units.into_iter().filter(|u| !u.is_import_only()).collect()
}
