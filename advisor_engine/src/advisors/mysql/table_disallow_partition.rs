//! `table.disallow-partition` — no partitioned tables, no partition
//! management.
//!
//! Detection combines the AST's `PARTITION BY` clause (where the grammar
//! models it) with a conservative keyword scan over the statement's raw
//! text, so partition spellings the AST does not carry are still caught.
//! One advice is emitted per offending statement.

use regex::Regex;
use sqlparser::ast::Statement;

use crate::advisors::common::{finalize_advice, statements_or_advice};
use crate::advisors::Advisor;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor forbidding table partitioning.
pub struct TableDisallowPartitionAdvisor;

impl Advisor for TableDisallowPartitionAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = DisallowPartitionChecker {
            advice: Vec::new(),
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
            partition_by: Regex::new(r"(?i)\bPARTITION\s+BY\b")
                .expect("partition-by pattern regex is valid"),
            partition_manage: Regex::new(
                r"(?i)\b(ADD|DROP|TRUNCATE|COALESCE|REORGANIZE|EXCHANGE|REBUILD|ANALYZE|OPTIMIZE|REPAIR|DISCARD|IMPORT)\s+PARTITION\b|\bREMOVE\s+PARTITIONING\b",
            )
            .expect("partition-management pattern regex is valid"),
        };
        walk_statements(&mut checker, &statements);

        Ok(finalize_advice(checker.advice))
    }
}

struct DisallowPartitionChecker {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
    partition_by: Regex,
    partition_manage: Regex,
}

impl DisallowPartitionChecker {
    fn offending(&self, statement: &ParsedStatement) -> bool {
        match &statement.ast {
            Statement::CreateTable(create) => {
                create.partition_by.is_some() || self.partition_by.is_match(&statement.text)
            }
            Statement::AlterTable { .. } => {
                self.partition_by.is_match(&statement.text)
                    || self.partition_manage.is_match(&statement.text)
            }
            _ => false,
        }
    }
}

impl StatementVisitor for DisallowPartitionChecker {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        if self.offending(statement) {
            self.advice.push(Advice {
                status: self.status,
                code: AdviceCode::CreateTablePartition,
                title: self.title.clone(),
                content: format!(
                    "Table partition is forbidden, but \"{}\" creates",
                    statement.text
                ),
                line: statement.line,
            });
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
            SqlReviewRule::new(RuleType::TableDisallowPartition, RuleLevel::Error),
            &finder,
        );
        TableDisallowPartitionAdvisor.check(&ctx, script).unwrap()
    }

    #[test]
    fn test_alter_partition_management_is_flagged() {
        let advice = run("ALTER TABLE t DROP PARTITION (p0)");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::CreateTablePartition);
        assert_eq!(advice[0].status, AdviceStatus::Error);
        assert_eq!(advice[0].line, 1);
    }

    #[test]
    fn test_plain_ddl_is_ok() {
        let advice = run("CREATE TABLE t (id INT); ALTER TABLE t ADD COLUMN a INT;");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_one_advice_per_offending_statement() {
        let advice = run("ALTER TABLE t DROP PARTITION (p0); ALTER TABLE t DROP PARTITION (p1);");
        assert_eq!(advice.len(), 2);
        assert!(advice
            .iter()
            .all(|a| a.code == AdviceCode::CreateTablePartition));
    }

    #[test]
    fn test_partition_mention_in_dml_is_ignored() {
        // Only DDL statements are in scope for this rule.
        let advice = run("INSERT INTO t (a) VALUES ('PARTITION BY RANGE')");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }
}
