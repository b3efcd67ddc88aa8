//! Helpers shared by the per-dialect checkers.
//!
//! One normalization/lookup vocabulary serves every checker family, so the
//! per-dialect modules stay focused on rule semantics.

use std::borrow::Cow;
use std::collections::HashMap;

use sqlparser::ast::{
    ColumnDef, ColumnOption, DataType, Expr, IndexColumn, ObjectName, ObjectNamePart,
    TableConstraint, TableObject,
};

use crate::context::AdvisorContext;
use crate::parser::{parse_or_advice, ParsedStatement};
use crate::types::Advice;

/// Guarantee the non-empty result invariant: a checker that found nothing
/// reports the single synthesized `Ok` entry.
#[must_use]
pub fn finalize_advice(mut advice: Vec<Advice>) -> Vec<Advice> {
    if advice.is_empty() {
        advice.push(Advice::ok());
    }
    advice
}

/// Obtain the script's statements, reusing the caller's pre-parsed AST when
/// the context carries one.
///
/// # Errors
///
/// The `Err` arm is the ready-to-return syntax-error advice list.
pub fn statements_or_advice<'a>(
    ctx: &AdvisorContext<'a>,
    statement: &str,
) -> Result<Cow<'a, [ParsedStatement]>, Vec<Advice>> {
    match ctx.ast {
        Some(statements) => Ok(Cow::Borrowed(statements)),
        None => parse_or_advice(ctx.dialect, statement).map(Cow::Owned),
    }
}

/// Unqualified name of an object, e.g. the table name of `db.t`.
#[must_use]
pub fn object_name(name: &ObjectName) -> String {
    name.0.last().map_or_else(String::new, |part| match part {
        ObjectNamePart::Identifier(ident) => ident.value.clone(),
        other => other.to_string(),
    })
}

/// Table name of an INSERT target, when it is a plain table.
#[must_use]
pub fn insert_target_name(table: &TableObject) -> Option<String> {
    match table {
        TableObject::TableName(name) => Some(object_name(name)),
        _ => None,
    }
}

/// Type label used by the primary-key type rule: integer types collapse to
/// their bare keyword regardless of display width, everything else keeps
/// its rendered spelling.
#[must_use]
pub fn pk_type_label(data_type: &DataType) -> String {
    match data_type {
        DataType::Int(_) | DataType::Integer(_) => "INT".to_owned(),
        DataType::BigInt(_) => "BIGINT".to_owned(),
        other => other.to_string(),
    }
}

/// Whether a column definition carries an inline PRIMARY KEY option.
#[must_use]
pub fn has_inline_primary_key(column: &ColumnDef) -> bool {
    column.options.iter().any(|opt| {
        matches!(
            opt.option,
            ColumnOption::Unique {
                is_primary: true,
                ..
            }
        )
    })
}

/// The column's COMMENT option, when present.
#[must_use]
pub fn column_comment(column: &ColumnDef) -> Option<String> {
    column.options.iter().find_map(|opt| match &opt.option {
        ColumnOption::Comment(comment) => Some(comment.clone()),
        _ => None,
    })
}

/// Column names of an out-of-line PRIMARY KEY constraint; `None` for any
/// other constraint kind.
#[must_use]
pub fn primary_key_columns(constraint: &TableConstraint) -> Option<Vec<String>> {
    match constraint {
        TableConstraint::PrimaryKey { columns, .. } => {
            Some(columns.iter().filter_map(index_column_name).collect())
        }
        _ => None,
    }
}

/// Simple column name of an index column expression, skipping anything that
/// is not a plain identifier.
#[must_use]
pub fn index_column_name(index_col: &IndexColumn) -> Option<String> {
    match &index_col.column.expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|ident| ident.value.clone()),
        _ => None,
    }
}

/// Pending-edit state: columns declared by earlier statements of the same
/// script, keyed by table then column, holding the resolved type label.
///
/// Owned by exactly one checker instance and discarded with it; the
/// committed catalog is only consulted when a column is absent here.
#[derive(Debug, Default)]
pub struct TableNewColumns {
    tables: HashMap<String, HashMap<String, String>>,
}

impl TableNewColumns {
    /// Record a column declared in-script.
    pub fn set(&mut self, table: &str, column: &str, type_label: String) {
        self.tables
            .entry(table.to_owned())
            .or_default()
            .insert(column.to_owned(), type_label);
    }

    /// Resolve a column declared earlier in the script.
    #[must_use]
    pub fn get(&self, table: &str, column: &str) -> Option<&str> {
        self.tables
            .get(table)
            .and_then(|columns| columns.get(column))
            .map(String::as_str)
    }

    /// Forget a column, e.g. when a CHANGE COLUMN renames it.
    pub fn remove(&mut self, table: &str, column: &str) {
        if let Some(columns) = self.tables.get_mut(table) {
            columns.remove(column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statements;
    use crate::types::Dialect;
    use sqlparser::ast::Statement;

    fn first_create_table(sql: &str) -> sqlparser::ast::CreateTable {
        let statements = parse_statements(Dialect::MySql, sql).unwrap();
        match statements.into_iter().next().unwrap().ast {
            Statement::CreateTable(create) => create,
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_primary_key_detection() {
        let create = first_create_table("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(10))");
        assert!(has_inline_primary_key(&create.columns[0]));
        assert!(!has_inline_primary_key(&create.columns[1]));
    }

    #[test]
    fn test_pk_type_labels() {
        let create = first_create_table(
            "CREATE TABLE t (a INT, b INTEGER, c BIGINT, d INT(11), e VARCHAR(10))",
        );
        let labels: Vec<String> = create
            .columns
            .iter()
            .map(|c| pk_type_label(&c.data_type))
            .collect();
        assert_eq!(labels, ["INT", "INT", "BIGINT", "INT", "VARCHAR(10)"]);
    }

    #[test]
    fn test_out_of_line_primary_key_columns() {
        let create =
            first_create_table("CREATE TABLE t (a INT, b INT, PRIMARY KEY (a, b), UNIQUE (b))");
        let mut found = None;
        for constraint in &create.constraints {
            if let Some(columns) = primary_key_columns(constraint) {
                found = Some(columns);
            }
        }
        assert_eq!(found.unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_column_comment_extraction() {
        let create =
            first_create_table("CREATE TABLE t (id INT COMMENT 'the id', name VARCHAR(10))");
        assert_eq!(column_comment(&create.columns[0]).unwrap(), "the id");
        assert!(column_comment(&create.columns[1]).is_none());
    }

    #[test]
    fn test_pending_edit_map() {
        let mut map = TableNewColumns::default();
        map.set("t", "a", "INT".to_owned());
        assert_eq!(map.get("t", "a"), Some("INT"));
        map.remove("t", "a");
        assert_eq!(map.get("t", "a"), None);
        assert_eq!(map.get("missing", "a"), None);
    }
}
