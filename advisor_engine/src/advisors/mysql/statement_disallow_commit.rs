//! `statement.disallow-commit` — no COMMIT inside a migration script.

use sqlparser::ast::Statement;

use crate::advisors::common::{finalize_advice, statements_or_advice};
use crate::advisors::Advisor;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor checking that the script never commits explicitly.
pub struct StatementDisallowCommitAdvisor;

impl Advisor for StatementDisallowCommitAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = DisallowCommitChecker {
            advice: Vec::new(),
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
        };
        walk_statements(&mut checker, &statements);

        Ok(finalize_advice(checker.advice))
    }
}

struct DisallowCommitChecker {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
}

impl StatementVisitor for DisallowCommitChecker {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        if matches!(statement.ast, Statement::Commit { .. }) {
            self.advice.push(Advice {
                status: self.status,
                code: AdviceCode::StatementDisallowCommit,
                title: self.title.clone(),
                content: format!(
                    "Commit is not allowed, related statement: \"{}\"",
                    statement.text
                ),
                line: statement.line,
            });
        }
        Descent::Skip
    }
}
