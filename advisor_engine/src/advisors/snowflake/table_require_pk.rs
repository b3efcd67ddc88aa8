//! `table.require-pk` — every table must end the script with a primary key.
//!
//! Tracks per-table PK presence across the whole script: CREATE TABLE seeds
//! the tracking, ALTER TABLE ADD/DROP PRIMARY KEY toggles it, DROP TABLE
//! forgets the table. Advice is emitted once per table still lacking a key
//! after the last statement, in first-seen order so repeated runs are
//! identical. Unquoted Snowflake identifiers fold to uppercase.

use std::collections::BTreeMap;

use sqlparser::ast::{AlterTableOperation, ObjectType, Statement};

use crate::advisors::common::{
    finalize_advice, has_inline_primary_key, object_name, primary_key_columns,
    statements_or_advice,
};
use crate::advisors::Advisor;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor requiring a primary key on every table.
pub struct TableRequirePkAdvisor;

impl Advisor for TableRequirePkAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = RequirePkChecker {
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
            tables: BTreeMap::new(),
            seen_order: Vec::new(),
        };
        walk_statements(&mut checker, &statements);

        Ok(finalize_advice(checker.generate_advice()))
    }
}

/// Tracking record of one table.
struct TableState {
    has_primary_key: bool,
    original_name: String,
    line: usize,
}

struct RequirePkChecker {
    status: AdviceStatus,
    title: String,
    /// Keyed by normalized (uppercased) table name.
    tables: BTreeMap<String, TableState>,
    /// Normalized names in first-seen order, for deterministic emission.
    seen_order: Vec<String>,
}

impl RequirePkChecker {
    fn normalize(name: &str) -> String {
        name.to_uppercase()
    }

    fn track(&mut self, normalized: String, state: TableState) {
        if !self.tables.contains_key(&normalized) {
            self.seen_order.push(normalized.clone());
        }
        self.tables.insert(normalized, state);
    }

    fn generate_advice(&self) -> Vec<Advice> {
        let mut advice = Vec::new();
        for normalized in &self.seen_order {
            let Some(state) = self.tables.get(normalized) else {
                continue; // dropped later in the script
            };
            if !state.has_primary_key {
                advice.push(Advice {
                    status: self.status,
                    code: AdviceCode::TableNoPk,
                    title: self.title.clone(),
                    content: format!("Table {} requires PRIMARY KEY.", state.original_name),
                    line: state.line,
                });
            }
        }
        advice
    }
}

impl StatementVisitor for RequirePkChecker {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        match &statement.ast {
            Statement::CreateTable(create) => {
                let original = object_name(&create.name);
                let has_primary_key = create.columns.iter().any(has_inline_primary_key)
                    || create
                        .constraints
                        .iter()
                        .any(|constraint| primary_key_columns(constraint).is_some());
                self.track(
                    Self::normalize(&original),
                    TableState {
                        has_primary_key,
                        original_name: original,
                        line: statement.line,
                    },
                );
            }
            Statement::AlterTable {
                name, operations, ..
            } => {
                let original = object_name(name);
                let normalized = Self::normalize(&original);
                for operation in operations {
                    match operation {
                        AlterTableOperation::AddConstraint { constraint, .. } => {
                            if primary_key_columns(constraint).is_some() {
                                self.track(
                                    normalized.clone(),
                                    TableState {
                                        has_primary_key: true,
                                        original_name: original.clone(),
                                        line: statement.line,
                                    },
                                );
                            }
                        }
                        AlterTableOperation::DropPrimaryKey => {
                            // Only tables this script already tracks can lose
                            // their key here.
                            if let Some(state) = self.tables.get_mut(&normalized) {
                                state.has_primary_key = false;
                                state.line = statement.line;
                            }
                        }
                        _ => {}
                    }
                }
            }
            Statement::Drop {
                object_type: ObjectType::Table,
                names,
                ..
            } => {
                for name in names {
                    self.tables.remove(&Self::normalize(&object_name(name)));
                }
            }
            _ => {}
        }
        Descent::Skip
    }
}
