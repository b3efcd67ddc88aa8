//! `column.disallow-changing-type` — CHANGE/MODIFY may not alter a
//! column's type.
//!
//! The prior type is resolved first from columns declared earlier in the
//! same script, then from the committed catalog; comparison runs through
//! the dialect's normalization table so `int` ≡ `int(11)`. A column that
//! resolves nowhere is treated as "no change" and skipped.

use sqlparser::ast::{AlterTableOperation, Statement};

use crate::advisors::common::{
    finalize_advice, object_name, statements_or_advice, TableNewColumns,
};
use crate::advisors::Advisor;
use crate::catalog::Finder;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::normalize::same_column_type;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus, Dialect};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor forbidding column type changes.
pub struct ColumnDisallowChangingTypeAdvisor;

impl Advisor for ColumnDisallowChangingTypeAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = ChangingTypeChecker {
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

struct ChangingTypeChecker<'a> {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
    dialect: Dialect,
    finder: &'a Finder,
    new_columns: TableNewColumns,
}

impl ChangingTypeChecker<'_> {
    /// Whether redeclaring `column` as `new_type` changes its type.
    fn changes_type(&self, table: &str, column: &str, new_type: &str) -> bool {
        let current = match self.new_columns.get(table, column) {
            Some(pending) => pending.to_owned(),
            None => match self.finder.find_column(table, column) {
                Some(metadata) => metadata.column_type.clone(),
                None => return false,
            },
        };
        !same_column_type(self.dialect, &current, new_type)
    }
}

impl StatementVisitor for ChangingTypeChecker<'_> {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        match &statement.ast {
            Statement::CreateTable(create) => {
                // Track in-script declarations so a later CHANGE sees them.
                let table = object_name(&create.name);
                for column in &create.columns {
                    self.new_columns.set(
                        &table,
                        &column.name.value,
                        column.data_type.to_string(),
                    );
                }
            }
            Statement::AlterTable {
                name, operations, ..
            } => {
                let table = object_name(name);
                let mut changed = false;
                for operation in operations {
                    match operation {
                        AlterTableOperation::ChangeColumn {
                            old_name,
                            new_name,
                            data_type,
                            ..
                        } => {
                            let new_type = data_type.to_string();
                            changed = self.changes_type(&table, &old_name.value, &new_type);
                            self.new_columns.remove(&table, &old_name.value);
                            self.new_columns.set(&table, &new_name.value, new_type);
                        }
                        AlterTableOperation::ModifyColumn {
                            col_name,
                            data_type,
                            ..
                        } => {
                            let new_type = data_type.to_string();
                            changed = self.changes_type(&table, &col_name.value, &new_type);
                            self.new_columns.set(&table, &col_name.value, new_type);
                        }
                        _ => {}
                    }
                    if changed {
                        break;
                    }
                }
                if changed {
                    self.advice.push(Advice {
                        status: self.status,
                        code: AdviceCode::ChangeColumnType,
                        title: self.title.clone(),
                        content: format!("\"{}\" changes column type", statement.text),
                        line: statement.line,
                    });
                }
            }
            _ => {}
        }
        Descent::Skip
    }
}
