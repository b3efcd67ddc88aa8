//! `column.comment.convention` — comments on new and changed columns.
//!
//! Two independent checks share the rule payload: a required-comment check
//! (`required = true`) and a length cap (`max_length >= 0`). Both may fire
//! for the same column.

use sqlparser::ast::{AlterTableOperation, ColumnOption, Statement};

use crate::advisors::common::{column_comment, finalize_advice, object_name, statements_or_advice};
use crate::advisors::Advisor;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::parser::ParsedStatement;
use crate::rule::CommentConventionPayload;
use crate::types::{Advice, AdviceCode, AdviceStatus};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor checking the column comment convention.
pub struct ColumnCommentConventionAdvisor;

impl Advisor for ColumnCommentConventionAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let payload = CommentConventionPayload::from_rule(&ctx.rule)?;
        let mut checker = CommentConventionChecker {
            advice: Vec::new(),
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
            required: payload.required,
            max_length: payload.max_length,
        };
        walk_statements(&mut checker, &statements);

        Ok(finalize_advice(checker.advice))
    }
}

/// One column observed with (or without) a comment.
struct ColumnCommentData {
    exists: bool,
    comment: String,
    table: String,
    column: String,
    line: usize,
}

struct CommentConventionChecker {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
    required: bool,
    max_length: i64,
}

impl CommentConventionChecker {
    fn collect(statement: &ParsedStatement) -> Vec<ColumnCommentData> {
        let mut columns = Vec::new();
        match &statement.ast {
            Statement::CreateTable(create) => {
                let table = object_name(&create.name);
                for column in &create.columns {
                    let comment = column_comment(column);
                    columns.push(ColumnCommentData {
                        exists: comment.is_some(),
                        comment: comment.unwrap_or_default(),
                        table: table.clone(),
                        column: column.name.value.clone(),
                        line: statement.line,
                    });
                }
            }
            Statement::AlterTable {
                name, operations, ..
            } => {
                let table = object_name(name);
                for operation in operations {
                    match operation {
                        AlterTableOperation::AddColumn { column_def, .. } => {
                            let comment = column_comment(column_def);
                            columns.push(ColumnCommentData {
                                exists: comment.is_some(),
                                comment: comment.unwrap_or_default(),
                                table: table.clone(),
                                column: column_def.name.value.clone(),
                                line: statement.line,
                            });
                        }
                        AlterTableOperation::ChangeColumn {
                            new_name, options, ..
                        } => {
                            let comment = options_comment(options);
                            columns.push(ColumnCommentData {
                                exists: comment.is_some(),
                                comment: comment.unwrap_or_default(),
                                table: table.clone(),
                                column: new_name.value.clone(),
                                line: statement.line,
                            });
                        }
                        AlterTableOperation::ModifyColumn {
                            col_name, options, ..
                        } => {
                            let comment = options_comment(options);
                            columns.push(ColumnCommentData {
                                exists: comment.is_some(),
                                comment: comment.unwrap_or_default(),
                                table: table.clone(),
                                column: col_name.value.clone(),
                                line: statement.line,
                            });
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        columns
    }
}

/// Comment carried by a CHANGE/MODIFY option list.
fn options_comment(options: &[ColumnOption]) -> Option<String> {
    options.iter().find_map(|option| match option {
        ColumnOption::Comment(comment) => Some(comment.clone()),
        _ => None,
    })
}

impl StatementVisitor for CommentConventionChecker {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        for column in Self::collect(statement) {
            if self.required && !column.exists {
                self.advice.push(Advice {
                    status: self.status,
                    code: AdviceCode::NoColumnComment,
                    title: self.title.clone(),
                    content: format!(
                        "Column `{}`.`{}` requires comments",
                        column.table, column.column
                    ),
                    line: column.line,
                });
            }
            if self.max_length >= 0 && column.comment.chars().count() as i64 > self.max_length {
                self.advice.push(Advice {
                    status: self.status,
                    code: AdviceCode::ColumnCommentTooLong,
                    title: self.title.clone(),
                    content: format!(
                        "The length of column `{}`.`{}` comment should be within {} characters",
                        column.table, column.column, self.max_length
                    ),
                    line: column.line,
                });
            }
        }
        Descent::Skip
    }
}
