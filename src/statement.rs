//! Pure builders for SQL predicate fragments.
//!
//! Each function maps a comparison intent to canonical predicate text, column
//! name excluded — the caller prefixes the column (typically through
//! [`Filters`](crate::Filters) or [`SelectQuery`](crate::SelectQuery)).
//!
//! Every function is deterministic and side-effect-free: identical inputs
//! always produce byte-identical output, so results are safely cacheable by
//! callers. No function validates or escapes its operands — untrusted values
//! must be sanitized before they reach this module, since the output is
//! concatenated directly into SQL text.

use std::fmt::Display;

use crate::value::SqlValue;

/// `== 'val'` — equality against a quoted literal.
///
/// # Examples
///
/// ```
/// use litewrap::statement;
///
/// assert_eq!(statement::eq("ada"), "== 'ada'");
/// assert_eq!(statement::eq(5), "== '5'");
/// ```
#[must_use]
pub fn eq(value: impl Display) -> String {
    format!("== '{value}'")
}

/// `!= 'val'` — inequality against a quoted literal.
#[must_use]
pub fn neq(value: impl Display) -> String {
    format!("!= '{value}'")
}

/// `< 'val'` — less-than against a quoted numeric literal.
#[must_use]
pub fn lt(value: impl Display) -> String {
    format!("< '{value}'")
}

/// `> 'val'` — greater-than against a quoted numeric literal.
#[must_use]
pub fn gt(value: impl Display) -> String {
    format!("> '{value}'")
}

/// `<= 'val'` — less-than-or-equal against a quoted numeric literal.
#[must_use]
pub fn lte(value: impl Display) -> String {
    format!("<= '{value}'")
}

/// `>= 'val'` — greater-than-or-equal against a quoted numeric literal.
#[must_use]
pub fn gte(value: impl Display) -> String {
    format!(">= '{value}'")
}

/// `[NOT ]IN (v1, v2, …)` — membership against typed literals.
///
/// Requires at least one value; an empty slice renders `IN ()`, which the
/// engine rejects at execution time.
///
/// # Examples
///
/// ```
/// use litewrap::{SqlValue, statement};
///
/// let frag = statement::is_in(&["a".into(), 2.into()], false);
/// assert_eq!(frag, "IN ('a', 2)");
/// ```
#[must_use]
pub fn is_in(values: &[SqlValue], negate: bool) -> String {
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("{}IN ({})", not_prefix(negate), rendered.join(", "))
}

/// `[NOT ]BETWEEN 'lower' AND 'upper'` — range check.
///
/// Bounds are caller-ordered and not validated.
#[must_use]
pub fn between(lower: impl Display, upper: impl Display, negate: bool) -> String {
    format!("{}BETWEEN '{lower}' AND '{upper}'", not_prefix(negate))
}

/// `[NOT ]LIKE 'pattern'` — pattern match; the pattern passes through
/// verbatim, wildcards included.
#[must_use]
pub fn like(pattern: &str, negate: bool) -> String {
    format!("{}LIKE '{pattern}'", not_prefix(negate))
}

/// `IS [NOT ]NULL` — nullness check, no operand.
#[must_use]
pub const fn is_null(negate: bool) -> &'static str {
    if negate { "IS NOT NULL" } else { "IS NULL" }
}

const fn not_prefix(negate: bool) -> &'static str {
    if negate { "NOT " } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_fragments() {
        assert_eq!(eq("x"), "== 'x'");
        assert_eq!(neq(false), "!= 'false'");
        assert_eq!(lt(3), "< '3'");
        assert_eq!(gt(3.5), "> '3.5'");
        assert_eq!(lte(0), "<= '0'");
        assert_eq!(gte(-1), ">= '-1'");
    }

    #[test]
    fn test_membership() {
        assert_eq!(is_in(&[1.into(), 2.into()], false), "IN (1, 2)");
        assert_eq!(is_in(&["a".into()], true), "NOT IN ('a')");
    }

    #[test]
    fn test_range() {
        assert_eq!(between(1, 9, false), "BETWEEN '1' AND '9'");
        assert_eq!(between("a", "f", true), "NOT BETWEEN 'a' AND 'f'");
    }

    #[test]
    fn test_pattern_passes_through_verbatim() {
        assert_eq!(like("%ada%", false), "LIKE '%ada%'");
        assert_eq!(like("a_c", true), "NOT LIKE 'a_c'");
    }

    #[test]
    fn test_nullness() {
        assert_eq!(is_null(false), "IS NULL");
        assert_eq!(is_null(true), "IS NOT NULL");
    }

    #[test]
    fn test_repeated_calls_are_byte_identical() {
        assert_eq!(eq(42), eq(42));
        assert_eq!(is_in(&[1.into()], true), is_in(&[1.into()], true));
        assert_eq!(between(1, 2, false), between(1, 2, false));
        assert_eq!(like("p", false), like("p", false));
    }
}
