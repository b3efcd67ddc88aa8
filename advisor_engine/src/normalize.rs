//! Dialect type-normalization tables.
//!
//! Column types arrive in two spellings: the introspector's (`"int(11)"`)
//! and the migration author's (`"INT"`). Normalization folds a dialect's
//! display-width defaults so the two compare equal. The table is the MySQL
//! family's; other dialects fall through to lowercase comparison.

use regex::Regex;

use crate::types::Dialect;

/// MySQL integer types and the display width each defaults to.
const MYSQL_WIDTH_DEFAULTS: &[(&str, &str)] = &[
    ("tinyint", "tinyint(4)"),
    ("tinyint unsigned", "tinyint(4) unsigned"),
    ("smallint", "smallint(6)"),
    ("smallint unsigned", "smallint(6) unsigned"),
    ("mediumint", "mediumint(9)"),
    ("mediumint unsigned", "mediumint(9) unsigned"),
    ("int", "int(11)"),
    ("int unsigned", "int(11) unsigned"),
    ("bigint", "bigint(20)"),
    ("bigint unsigned", "bigint(20) unsigned"),
];

/// Normalize a column type string for comparison under the given dialect.
///
/// For the MySQL family a bare integer type gains its default display
/// width, so `INT` ≡ `int(11)` and `BIGINT UNSIGNED` ≡ `bigint(20)
/// unsigned`. Everything else is compared lowercase with collapsed
/// whitespace.
#[must_use]
pub fn normalize_column_type(dialect: Dialect, column_type: &str) -> String {
    let folded = collapse_whitespace(&column_type.to_lowercase());
    if !dialect.is_mysql_family() {
        return folded;
    }
    for &(bare, with_width) in MYSQL_WIDTH_DEFAULTS {
        if folded == bare {
            return with_width.to_owned();
        }
    }
    folded
}

/// Whether two type spellings denote the same type under the dialect.
#[must_use]
pub fn same_column_type(dialect: Dialect, left: &str, right: &str) -> bool {
    normalize_column_type(dialect, left) == normalize_column_type(dialect, right)
}

fn collapse_whitespace(value: &str) -> String {
    let spaces = Regex::new(r"\s+").expect("whitespace pattern regex is valid");
    spaces.replace_all(value.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_width_defaults_fold() {
        assert_eq!(normalize_column_type(Dialect::MySql, "INT"), "int(11)");
        assert_eq!(normalize_column_type(Dialect::MySql, "int(11)"), "int(11)");
        assert_eq!(
            normalize_column_type(Dialect::MySql, "BIGINT UNSIGNED"),
            "bigint(20) unsigned"
        );
        assert_eq!(
            normalize_column_type(Dialect::TiDb, "smallint"),
            "smallint(6)"
        );
    }

    #[test]
    fn test_non_integer_types_lowercase_only() {
        assert_eq!(
            normalize_column_type(Dialect::MySql, "VARCHAR(255)"),
            "varchar(255)"
        );
        assert_eq!(
            normalize_column_type(Dialect::MySql, "DECIMAL(10, 2)"),
            "decimal(10, 2)"
        );
    }

    #[test]
    fn test_no_width_folding_outside_mysql_family() {
        assert_eq!(normalize_column_type(Dialect::Postgres, "INT"), "int");
    }

    #[test]
    fn test_same_column_type() {
        assert!(same_column_type(Dialect::MySql, "int", "INT(11)"));
        assert!(!same_column_type(Dialect::MySql, "int", "bigint"));
        assert!(same_column_type(Dialect::Postgres, "TEXT", "text"));
    }
}
