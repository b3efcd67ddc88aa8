//! `table.exists` — referenced tables must exist in the catalog or be
//! created earlier in the same script.
//!
//! Checked references are INSERT targets, ALTER TABLE targets, and the
//! source of `CREATE TABLE … LIKE`. Query sources (including CTAS) are out
//! of scope. The rule only fires on a finder built with integrity
//! checking; the permissive empty catalog never warns.

use sqlparser::ast::{AlterTableOperation, Statement};
use std::collections::HashSet;

use crate::advisors::common::{
    finalize_advice, insert_target_name, object_name, statements_or_advice,
};
use crate::advisors::Advisor;
use crate::catalog::Finder;
use crate::context::AdvisorContext;
use crate::error::AdvisorError;
use crate::parser::ParsedStatement;
use crate::types::{Advice, AdviceCode, AdviceStatus};
use crate::visitor::{walk_statements, Descent, StatementVisitor};

/// Advisor checking that referenced tables exist.
pub struct TableExistsAdvisor;

impl Advisor for TableExistsAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let mut checker = TableExistsChecker {
            advice: Vec::new(),
            status: ctx.rule.level.advice_status()?,
            title: ctx.rule.rule_type.to_string(),
            finder: ctx.finder,
            created: HashSet::new(),
        };
        if ctx.finder.check_integrity() {
            walk_statements(&mut checker, &statements);
        }

        Ok(finalize_advice(checker.advice))
    }
}

struct TableExistsChecker<'a> {
    advice: Vec<Advice>,
    status: AdviceStatus,
    title: String,
    finder: &'a Finder,
    /// Tables brought into existence by earlier statements of this script.
    created: HashSet<String>,
}

impl TableExistsChecker<'_> {
    fn exists(&self, table: &str) -> bool {
        self.created.contains(table) || self.finder.find_table(table).is_some()
    }

    fn require(&mut self, table: &str, statement: &ParsedStatement) {
        if !self.exists(table) {
            self.advice.push(Advice {
                status: self.status,
                code: AdviceCode::TableNotExists,
                title: self.title.clone(),
                content: format!(
                    "Table `{}` not exists, related statement: \"{}\"",
                    table, statement.text
                ),
                line: statement.line,
            });
        }
    }
}

impl StatementVisitor for TableExistsChecker<'_> {
    fn enter(&mut self, statement: &ParsedStatement) -> Descent {
        match &statement.ast {
            Statement::CreateTable(create) => {
                if let Some(like) = &create.like {
                    let source = object_name(like);
                    self.require(&source, statement);
                }
                self.created.insert(object_name(&create.name));
            }
            Statement::AlterTable {
                name, operations, ..
            } => {
                let table = object_name(name);
                self.require(&table, statement);
                for operation in operations {
                    if let AlterTableOperation::RenameTable { table_name } = operation {
                        self.created.insert(object_name(table_name));
                    }
                }
            }
            Statement::Insert(insert) => {
                if let Some(table) = insert_target_name(&insert.table) {
                    self.require(&table, statement);
                }
            }
            _ => {}
        }
        Descent::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::mock_mysql_finder;
    use crate::rule::{RuleLevel, RuleType, SqlReviewRule};
    use crate::types::Dialect;
    use indoc::indoc;

    fn run(script: &str) -> Vec<Advice> {
        let finder = mock_mysql_finder();
        let ctx = AdvisorContext::new(
            Dialect::MySql,
            SqlReviewRule::new(RuleType::TableExists, RuleLevel::Warning),
            &finder,
        );
        TableExistsAdvisor.check(&ctx, script).unwrap()
    }

    #[test]
    fn test_insert_into_catalog_table_is_ok() {
        let advice = run("INSERT INTO tech_book values (1)");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_insert_into_missing_table_warns() {
        let advice = run("INSERT INTO t values (1)");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::TableNotExists);
        assert_eq!(advice[0].status, AdviceStatus::Warning);
        assert_eq!(
            advice[0].content,
            "Table `t` not exists, related statement: \"INSERT INTO t values (1)\""
        );
        assert_eq!(advice[0].line, 1);
    }

    #[test]
    fn test_alter_missing_table_warns() {
        let advice = run("ALTER TABLE t ADD COLUMN a int");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::TableNotExists);
    }

    #[test]
    fn test_create_like_missing_source_warns() {
        let advice = run("CREATE TABLE t_copy LIKE t");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::TableNotExists);
        assert!(advice[0].content.starts_with("Table `t` not exists"));
    }

    #[test]
    fn test_create_like_catalog_source_is_ok() {
        let advice = run("CREATE TABLE tech_book_copy LIKE tech_book");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_ctas_source_is_not_checked() {
        let advice = run("CREATE TABLE tech_book_copy AS SELECT * from t");
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_same_script_creation_is_visible() {
        let script = indoc! {"
            CREATE TABLE t (id int);
            INSERT INTO t values (1);
        "};
        let advice = run(script);
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_permissive_catalog_never_warns() {
        let finder = Finder::empty(Dialect::MySql);
        let ctx = AdvisorContext::new(
            Dialect::MySql,
            SqlReviewRule::new(RuleType::TableExists, RuleLevel::Warning),
            &finder,
        );
        let advice = TableExistsAdvisor
            .check(&ctx, "INSERT INTO nowhere values (1)")
            .unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }
}
