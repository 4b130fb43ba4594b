//! Property-based tests for the statement library and query assembly.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Statement builders are deterministic (byte-identical repeated output)
//! - Fragment shapes always match their canonical form
//! - `SelectQuery::build` output has a fixed, well-formed shape

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use litewrap::{OrderDir, SelectQuery, SqlValue, statement};
use proptest::prelude::*;

proptest! {
    /// Property: repeated calls return byte-identical fragments.
    #[test]
    fn prop_statement_builders_are_deterministic(s in "[a-zA-Z0-9 ]{0,40}", n in any::<i64>()) {
        prop_assert_eq!(statement::eq(&s), statement::eq(&s));
        prop_assert_eq!(statement::neq(n), statement::neq(n));
        prop_assert_eq!(statement::lt(n), statement::lt(n));
        prop_assert_eq!(statement::between(n, &s, true), statement::between(n, &s, true));
        prop_assert_eq!(statement::like(&s, false), statement::like(&s, false));
    }

    /// Property: comparison fragments always quote the operand.
    #[test]
    fn prop_comparison_fragments_quote_operand(s in "[a-zA-Z0-9]{0,30}") {
        prop_assert_eq!(statement::eq(&s), format!("== '{s}'"));
        prop_assert_eq!(statement::neq(&s), format!("!= '{s}'"));
        prop_assert_eq!(statement::gte(&s), format!(">= '{s}'"));
    }

    /// Property: membership renders every value, comma-separated, with the
    /// negate flag controlling the NOT prefix.
    #[test]
    fn prop_membership_shape(values in prop::collection::vec(any::<i64>(), 1..8), negate in any::<bool>()) {
        let typed: Vec<SqlValue> = values.iter().copied().map(SqlValue::from).collect();
        let fragment = statement::is_in(&typed, negate);

        let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
        let expected = format!(
            "{}IN ({})",
            if negate { "NOT " } else { "" },
            rendered.join(", ")
        );
        prop_assert_eq!(fragment, expected);
    }

    /// Property: the built SELECT always has the canonical clause order and
    /// never contains doubled spaces or trailing whitespace before the
    /// semicolon.
    #[test]
    fn prop_select_shape_is_well_formed(
        table in "[a-z][a-z0-9_]{0,10}",
        column in "[a-z][a-z0-9_]{0,10}",
        filtered in any::<bool>(),
        ordered in any::<bool>(),
    ) {
        let mut query = SelectQuery::table(&table).column(&column);
        if filtered {
            query = query.filter(&column, statement::is_null(false));
        }
        if ordered {
            query = query.order_by(&column, OrderDir::Desc);
        }
        let sql = query.build();

        let expected_prefix = format!("SELECT {column} FROM {table}");
        prop_assert!(sql.starts_with(&expected_prefix));
        prop_assert!(sql.ends_with(';'));
        prop_assert!(!sql.contains("  "));
        prop_assert!(!sql.contains(" ;"));
        prop_assert_eq!(sql.contains("WHERE"), filtered);
        prop_assert_eq!(sql.contains("ORDER BY"), ordered);
        if filtered && ordered {
            let where_at = sql.find("WHERE").unwrap();
            let order_at = sql.find("ORDER BY").unwrap();
            prop_assert!(where_at < order_at);
        }
    }

    /// Property: the COUNT form shares the WHERE clause with the SELECT form.
    #[test]
    fn prop_count_shares_where_clause(table in "[a-z][a-z0-9_]{0,10}", value in any::<i64>()) {
        let query = SelectQuery::table(&table).filter("id", statement::eq(value));
        let select = query.build();
        let count = query.build_count();

        let where_clause = format!("WHERE id == '{value}'");
        prop_assert!(select.contains(&where_clause));
        prop_assert!(count.contains(&where_clause));
        let expected_prefix = format!("SELECT COUNT(*) FROM {table}");
        prop_assert!(count.starts_with(&expected_prefix));
    }
}
