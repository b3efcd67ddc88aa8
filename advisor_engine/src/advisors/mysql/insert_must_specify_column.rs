//! `insert.must-specify-column` — INSERT statements must list their columns.

use sqlparser::ast::Statement;

use crate::advisors::common::{finalize_advice, statements_or_advice};
use crate::advisors::Advisor;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor enforcing an explicit column list on every INSERT.
pub struct InsertMustSpecifyColumnAdvisor;

impl Advisor for InsertMustSpecifyColumnAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = InsertColumnChecker {
            advice: Vec::new(),
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
        };
        walk_statements(&mut checker, &statements);

        Ok(finalize_advice(checker.advice))
    }
}

struct InsertColumnChecker {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
}

impl StatementVisitor for InsertColumnChecker {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        if let Statement::Insert(insert) = &statement.ast {
            if insert.columns.is_empty() {
                self.advice.push(Advice {
                    status: self.status,
                    code: AdviceCode::InsertNotSpecifyColumn,
                    title: self.title.clone(),
                    content: format!(
                        "The INSERT statement must specify columns but \"{}\" does not",
                        statement.text
                    ),
                    line: statement.line,
                });
            }
        }
        Descent::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Finder;
    use crate::rule::{RuleLevel, RuleType, SqlReviewRule};
    use crate::types::Dialect;

    fn run(script: &str) -> Vec<Advice> {
        let finder = Finder::empty(Dialect::MySql);
        let ctx = AdvisorContext::new(
            Dialect::MySql,
            SqlReviewRule::new(RuleType::InsertMustSpecifyColumn, RuleLevel::Warning),
            &finder,
        );
        InsertMustSpecifyColumnAdvisor.check(&ctx, script).unwrap()
    }

    #[test]
    fn test_bare_insert_is_flagged() {
        let advice = run("INSERT INTO t VALUES (1)");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::InsertNotSpecifyColumn);
        assert_eq!(
            advice[0].content,
            "The INSERT statement must specify columns but \"INSERT INTO t VALUES (1)\" does not"
        );
        assert_eq!(advice[0].line, 1);
    }

    #[test]
    fn test_insert_with_columns_is_ok() {
        let advice = run("INSERT INTO t (a) VALUES (1)");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_each_bare_insert_flagged_once() {
        let advice = run("INSERT INTO t VALUES (1); INSERT INTO t (a) VALUES (2); INSERT INTO u VALUES (3);");
        let flagged: Vec<_> = advice
            .iter()
            .filter(|a| a.code == AdviceCode::InsertNotSpecifyColumn)
            .collect();
        assert_eq!(flagged.len(), 2);
    }
}
