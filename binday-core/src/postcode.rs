//! UK postcode normalization and validation.

use std::sync::LazyLock;

use regex::Regex;

// Outward + inward code with all whitespace already removed.
static POSTCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[A-Z]{1,2}[0-9][A-Z0-9]?[0-9][A-Z]{2}$").expect("postcode pattern compiles")
});

/// Strip all whitespace and uppercase the input.
///
/// Pure and total; applying it twice gives the same result as once.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|character| !character.is_whitespace())
        .map(|character| character.to_ascii_uppercase())
        .collect()
}

/// Check whether the input is a plausible UK postcode.
///
/// Empty and whitespace-only input is rejected before the pattern runs.
#[must_use]
pub fn is_valid(raw: &str) -> bool {
    let compact = normalize(raw);
    if compact.is_empty() {
        return false;
    }
    POSTCODE_PATTERN.is_match(&compact)
}
