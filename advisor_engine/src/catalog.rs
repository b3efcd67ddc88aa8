//! Schema catalog snapshot and the Finder used for semantic lookups.
//!
//! The catalog is built once per plan-check-run from persisted schema
//! metadata and is read-only for its whole life; checkers never write back.
//! Two construction modes exist:
//!
//! - **full** ([`Finder::new`]) — built from a [`DatabaseMetadata`]
//!   snapshot, with integrity checking enabled when the caller requires
//!   lookups to be answerable;
//! - **empty/permissive** ([`Finder::empty`]) — used when no committed
//!   schema should constrain the check (declarative schema workflows).
//!
//! Lookup-miss policy is per rule; each checker documents whether a miss is
//! skipped or reported.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Dialect;

/// Persisted metadata of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,

    /// Column type as stored by the introspector, e.g. `"int(11)"`.
    #[serde(rename = "type")]
    pub column_type: String,

    /// Whether the column is nullable.
    #[serde(default)]
    pub nullable: bool,

    /// Column comment, if any.
    #[serde(default)]
    pub comment: Option<String>,

    /// Default expression, if any.
    #[serde(default)]
    pub default: Option<String>,
}

/// Persisted metadata of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name.
    pub name: String,

    /// Columns in definition order.
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,

    /// Names of the primary-key columns, in key order.
    #[serde(default)]
    pub primary_key: Vec<String>,
}

/// Persisted metadata of one database, as handed over by the store layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    /// Database name.
    #[serde(default)]
    pub name: String,

    /// Tables of the database.
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

/// Construction-time options of a [`Finder`].
#[derive(Debug, Clone, Copy)]
pub struct FinderContext {
    /// Whether lookups are expected to be answerable. Rules that report
    /// missing objects (e.g. `table.exists`) only fire when this is set.
    pub check_integrity: bool,

    /// Dialect the snapshot was introspected from.
    pub dialect: Dialect,
}

/// Read-only index over a [`DatabaseMetadata`] snapshot.
pub struct Finder {
    database: DatabaseMetadata,
    table_index: HashMap<String, usize>,
    column_index: HashMap<(String, String), (usize, usize)>,
    context: FinderContext,
}

impl Finder {
    /// Build a full-mode finder over a metadata snapshot.
    #[must_use]
    pub fn new(database: DatabaseMetadata, context: FinderContext) -> Self {
        let mut table_index = HashMap::new();
        let mut column_index = HashMap::new();
        for (table_idx, table) in database.tables.iter().enumerate() {
            table_index.insert(table.name.clone(), table_idx);
            for (column_idx, column) in table.columns.iter().enumerate() {
                column_index.insert(
                    (table.name.clone(), column.name.clone()),
                    (table_idx, column_idx),
                );
            }
        }
        Self {
            database,
            table_index,
            column_index,
            context,
        }
    }

    /// Build the permissive empty finder: no tables, no integrity checking.
    #[must_use]
    pub fn empty(dialect: Dialect) -> Self {
        Self::new(
            DatabaseMetadata::default(),
            FinderContext {
                check_integrity: false,
                dialect,
            },
        )
    }

    /// Whether this finder was built with integrity checking.
    #[must_use]
    pub fn check_integrity(&self) -> bool {
        self.context.check_integrity
    }

    /// Dialect of the underlying snapshot.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.context.dialect
    }

    /// Look up a table by name.
    #[must_use]
    pub fn find_table(&self, table: &str) -> Option<&TableMetadata> {
        self.table_index
            .get(table)
            .map(|&idx| &self.database.tables[idx])
    }

    /// Look up a column by table and column name.
    #[must_use]
    pub fn find_column(&self, table: &str, column: &str) -> Option<&ColumnMetadata> {
        self.column_index
            .get(&(table.to_owned(), column.to_owned()))
            .map(|&(t, c)| &self.database.tables[t].columns[c])
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// The mock database the advisor tests run against: one table
    /// `tech_book(id int, name varchar(255))` with primary key `id`.
    pub fn mock_mysql_finder() -> Finder {
        let metadata = DatabaseMetadata {
            name: "test".to_owned(),
            tables: vec![TableMetadata {
                name: "tech_book".to_owned(),
                columns: vec![
                    ColumnMetadata {
                        name: "id".to_owned(),
                        column_type: "int(11)".to_owned(),
                        nullable: false,
                        comment: None,
                        default: None,
                    },
                    ColumnMetadata {
                        name: "name".to_owned(),
                        column_type: "varchar(255)".to_owned(),
                        nullable: true,
                        comment: None,
                        default: None,
                    },
                ],
                primary_key: vec!["id".to_owned()],
            }],
        };
        Finder::new(
            metadata,
            FinderContext {
                check_integrity: true,
                dialect: Dialect::MySql,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::mock_mysql_finder;
    use super::*;

    #[test]
    fn test_find_column_hit_and_miss() {
        let finder = mock_mysql_finder();
        let column = finder.find_column("tech_book", "id").unwrap();
        assert_eq!(column.column_type, "int(11)");
        assert!(finder.find_column("tech_book", "missing").is_none());
        assert!(finder.find_column("missing", "id").is_none());
    }

    #[test]
    fn test_empty_finder_is_permissive() {
        let finder = Finder::empty(Dialect::Postgres);
        assert!(!finder.check_integrity());
        assert!(finder.find_table("anything").is_none());
    }

    #[test]
    fn test_metadata_deserializes_from_store_json() {
        let json = r#"{
            "name": "app",
            "tables": [
                {"name": "users", "columns": [{"name": "id", "type": "bigint(20)"}]}
            ]
        }"#;
        let metadata: DatabaseMetadata = serde_json::from_str(json).unwrap();
        let finder = Finder::new(
            metadata,
            FinderContext {
                check_integrity: true,
                dialect: Dialect::MySql,
            },
        );
        assert_eq!(
            finder.find_column("users", "id").unwrap().column_type,
            "bigint(20)"
        );
    }
}
