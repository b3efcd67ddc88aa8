//! Statement summaries behind the statement-type and statement-report
//! check kinds.
//!
//! Pure AST walks: no catalog, no driver. The executor turns these
//! summaries into results for dialects that support the corresponding
//! check kind.

use serde::{Deserialize, Serialize};
use sqlparser::ast::{FromTable, ObjectType, Statement, TableFactor};

use crate::advisors::common::{insert_target_name, object_name};
use crate::parser::ParsedStatement;

/// Coarse kind of one SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    AlterTable,
    DropTable,
    CreateIndex,
    Truncate,
    Begin,
    Commit,
    Rollback,
    Other,
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::CreateTable => "CREATE TABLE",
            Self::AlterTable => "ALTER TABLE",
            Self::DropTable => "DROP TABLE",
            Self::CreateIndex => "CREATE INDEX",
            Self::Truncate => "TRUNCATE",
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
            Self::Other => "OTHER",
        };
        write!(f, "{name}")
    }
}

/// Whether a statement kind modifies data rather than schema.
#[must_use]
pub fn is_dml(kind: StatementKind) -> bool {
    matches!(
        kind,
        StatementKind::Insert | StatementKind::Update | StatementKind::Delete
    )
}

/// Classify one statement.
#[must_use]
pub fn classify_statement(statement: &Statement) -> StatementKind {
    match statement {
        Statement::Query(_) => StatementKind::Select,
        Statement::Insert(_) => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete(_) => StatementKind::Delete,
        Statement::CreateTable(_) => StatementKind::CreateTable,
        Statement::AlterTable { .. } => StatementKind::AlterTable,
        Statement::Drop {
            object_type: ObjectType::Table,
            ..
        } => StatementKind::DropTable,
        Statement::CreateIndex(_) => StatementKind::CreateIndex,
        Statement::Truncate { .. } => StatementKind::Truncate,
        Statement::StartTransaction { .. } => StatementKind::Begin,
        Statement::Commit { .. } => StatementKind::Commit,
        Statement::Rollback { .. } => StatementKind::Rollback,
        _ => StatementKind::Other,
    }
}

/// Tables a script touches with DDL or DML, deduplicated, in first-mention
/// order.
#[must_use]
pub fn affected_tables(statements: &[ParsedStatement]) -> Vec<String> {
    let mut tables = Vec::new();
    let mut push = |name: String| {
        if !name.is_empty() && !tables.contains(&name) {
            tables.push(name);
        }
    };

    for parsed in statements {
        match &parsed.ast {
            Statement::Insert(insert) => {
                if let Some(name) = insert_target_name(&insert.table) {
                    push(name);
                }
            }
            Statement::Update { table, .. } => {
                if let TableFactor::Table { name, .. } = &table.relation {
                    push(object_name(name));
                }
            }
            Statement::Delete(delete) => {
                let from = match &delete.from {
                    FromTable::WithFromKeyword(from) | FromTable::WithoutKeyword(from) => from,
                };
                for table in from {
                    if let TableFactor::Table { name, .. } = &table.relation {
                        push(object_name(name));
                    }
                }
            }
            Statement::CreateTable(create) => push(object_name(&create.name)),
            Statement::AlterTable { name, .. } => push(object_name(name)),
            Statement::Drop {
                object_type: ObjectType::Table,
                names,
                ..
            } => {
                for name in names {
                    push(object_name(name));
                }
            }
            _ => {}
        }
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statements;
    use crate::types::Dialect;

    #[test]
    fn test_classification() {
        let script = "SELECT 1; INSERT INTO t (a) VALUES (1); CREATE TABLE u (id INT); COMMIT;";
        let statements = parse_statements(Dialect::MySql, script).unwrap();
        let kinds: Vec<StatementKind> = statements
            .iter()
            .map(|s| classify_statement(&s.ast))
            .collect();
        assert_eq!(
            kinds,
            [
                StatementKind::Select,
                StatementKind::Insert,
                StatementKind::CreateTable,
                StatementKind::Commit,
            ]
        );
    }

    #[test]
    fn test_is_dml() {
        assert!(is_dml(StatementKind::Update));
        assert!(!is_dml(StatementKind::CreateTable));
        assert!(!is_dml(StatementKind::Select));
    }

    #[test]
    fn test_affected_tables_dedup_in_first_mention_order() {
        let script = "INSERT INTO b (x) VALUES (1); UPDATE a SET x = 2 WHERE id = 1; DELETE FROM b WHERE id = 3;";
        let statements = parse_statements(Dialect::MySql, script).unwrap();
        assert_eq!(affected_tables(&statements), ["b", "a"]);
    }

    #[test]
    fn test_select_does_not_affect_tables() {
        let statements = parse_statements(Dialect::MySql, "SELECT * FROM t").unwrap();
        assert!(affected_tables(&statements).is_empty());
    }
}
