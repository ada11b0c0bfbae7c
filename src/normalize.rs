//! Canonical-form normalization for market labels.
//!
//! Every comparison in the resolution cascade runs on the output of
//! [`normalize`]; mapping keys are normalized once at build time so both
//! sides of a lookup agree on the canonical form.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize a raw label: decompose diacritics (NFD) and drop the
/// combining marks, keep only letters, digits, whitespace, commas,
/// parentheses and hyphens, lowercase, trim.
///
/// Total and idempotent: always returns a string (possibly empty), and
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.nfd() {
        if unicode_normalization::char::is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() || ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | '-')
        {
            for lc in ch.to_lowercase() {
                out.push(lc);
            }
        }
    }
    out.trim().to_string()
}
