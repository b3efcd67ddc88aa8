//! `index.pk-type` — primary-key columns must be INT or BIGINT.
//!
//! Out-of-line primary keys reference columns by name, so the checker
//! resolves each referenced column's type first from the pending-edit map
//! (columns declared earlier in the same script) and only then from the
//! committed catalog. A column that resolves nowhere is skipped.

use sqlparser::ast::{AlterTableOperation, ColumnDef, ColumnOption, DataType, Statement, TableConstraint};

use crate::advisors::common::{
    finalize_advice, has_inline_primary_key, object_name, pk_type_label, primary_key_columns,
    statements_or_advice, TableNewColumns,
};
use crate::advisors::Advisor;
use crate::catalog::Finder;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::normalize::normalize_column_type;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus, Dialect};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor checking the type of primary-key columns.
pub struct IndexPkTypeAdvisor;

impl Advisor for IndexPkTypeAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = IndexPkTypeChecker {
            advice: Vec::new(),
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
            dialect: ctx.dialect,
            finder: ctx.finder,
            new_columns: TableNewColumns::default(),
        };
        walk_statements(&mut checker, &statements);

        Ok(finalize_advice(checker.advice))
    }
}

/// One primary-key column whose resolved type is not INT/BIGINT.
struct PkData {
    table: String,
    column: String,
    column_type: String,
    line: usize,
}

struct IndexPkTypeChecker<'a> {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
    dialect: Dialect,
    finder: &'a Finder,
    new_columns: TableNewColumns,
}

impl IndexPkTypeChecker<'_> {
    /// Record a newly declared column; flag it when it is an inline primary
    /// key of a non-integer type.
    fn add_new_column(&mut self, table: &str, line: usize, column: &ColumnDef) -> Vec<PkData> {
        let label = pk_type_label(&column.data_type);
        let mut flagged = Vec::new();
        if has_inline_primary_key(column) && label != "INT" && label != "BIGINT" {
            flagged.push(PkData {
                table: table.to_owned(),
                column: column.name.value.clone(),
                column_type: label.clone(),
                line,
            });
        }
        self.new_columns.set(table, &column.name.value, label);
        flagged
    }

    /// Re-declare a column via CHANGE/MODIFY: the old name is forgotten,
    /// the new definition takes its place.
    fn change_column(
        &mut self,
        table: &str,
        old_column: &str,
        new_column: &str,
        data_type: &DataType,
        options: &[ColumnOption],
        line: usize,
    ) -> Vec<PkData> {
        self.new_columns.remove(table, old_column);
        let label = pk_type_label(data_type);
        let mut flagged = Vec::new();
        let inline_pk = options.iter().any(|option| {
            matches!(
                option,
                ColumnOption::Unique {
                    is_primary: true,
                    ..
                }
            )
        });
        if inline_pk && label != "INT" && label != "BIGINT" {
            flagged.push(PkData {
                table: table.to_owned(),
                column: new_column.to_owned(),
                column_type: label.clone(),
                line,
            });
        }
        self.new_columns.set(table, new_column, label);
        flagged
    }

    /// Check the referenced columns of an out-of-line PRIMARY KEY.
    fn add_constraint(
        &mut self,
        table: &str,
        line: usize,
        constraint: &TableConstraint,
    ) -> Vec<PkData> {
        let Some(columns) = primary_key_columns(constraint) else {
            return Vec::new();
        };
        let mut flagged = Vec::new();
        for column in columns {
            // Unresolvable columns are skipped: the statement references a
            // column this run cannot see.
            let Some(column_type) = self.resolve_column_type(table, &column) else {
                continue;
            };
            if column_type != "INT" && column_type != "BIGINT" {
                flagged.push(PkData {
                    table: table.to_owned(),
                    column,
                    column_type,
                    line,
                });
            }
        }
        flagged
    }

    /// Pending-edit map first, committed catalog second.
    fn resolve_column_type(&self, table: &str, column: &str) -> Option<String> {
        if let Some(label) = self.new_columns.get(table, column) {
            return Some(label.to_owned());
        }
        let metadata = self.finder.find_column(table, column)?;
        Some(catalog_pk_label(self.dialect, &metadata.column_type))
    }
}

/// Fold a catalog type spelling into the rule's label vocabulary, so a
/// stored `int(11)` compares equal to a declared `INT`.
fn catalog_pk_label(dialect: Dialect, column_type: &str) -> String {
    let normalized = normalize_column_type(dialect, column_type);
    match normalized.as_str() {
        "int(11)" | "int(11) unsigned" | "int" => "INT".to_owned(),
        "bigint(20)" | "bigint(20) unsigned" | "bigint" => "BIGINT".to_owned(),
        _ => column_type.to_owned(),
    }
}

impl StatementVisitor for IndexPkTypeChecker<'_> {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        let mut flagged = Vec::new();
        match &statement.ast {
            Statement::CreateTable(create) => {
                let table = object_name(&create.name);
                for column in &create.columns {
                    flagged.extend(self.add_new_column(&table, statement.line, column));
                }
                for constraint in &create.constraints {
                    flagged.extend(self.add_constraint(&table, statement.line, constraint));
                }
            }
            Statement::AlterTable {
                name, operations, ..
            } => {
                let table = object_name(name);
                for operation in operations {
                    match operation {
                        AlterTableOperation::AddColumn { column_def, .. } => {
                            flagged.extend(self.add_new_column(
                                &table,
                                statement.line,
                                column_def,
                            ));
                        }
                        AlterTableOperation::AddConstraint { constraint, .. } => {
                            flagged.extend(self.add_constraint(
                                &table,
                                statement.line,
                                constraint,
                            ));
                        }
                        AlterTableOperation::ChangeColumn {
                            old_name,
                            new_name,
                            data_type,
                            options,
                            ..
                        } => {
                            flagged.extend(self.change_column(
                                &table,
                                &old_name.value,
                                &new_name.value,
                                data_type,
                                options,
                                statement.line,
                            ));
                        }
                        AlterTableOperation::ModifyColumn {
                            col_name,
                            data_type,
                            options,
                            ..
                        } => {
                            let column = col_name.value.clone();
                            flagged.extend(self.change_column(
                                &table,
                                &column,
                                &column,
                                data_type,
                                options,
                                statement.line,
                            ));
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }

        for pk in flagged {
            self.advice.push(Advice {
                status: self.status,
                code: AdviceCode::IndexPkType,
                title: self.title.clone(),
                content: format!(
                    "Columns in primary key must be INT/BIGINT but `{}`.`{}` is {}",
                    pk.table, pk.column, pk.column_type
                ),
                line: pk.line,
            });
        }
        Descent::Skip
    }
}
