//! `statement.dml-dry-run` — EXPLAIN every DML statement through the
//! caller's live connection.
//!
//! A probe failure becomes one advice for that statement; the remaining
//! statements are still probed. Cancellation aborts the remaining probes
//! promptly. Without a driver in the context the check is a no-op.

use sqlparser::ast::Statement;

use crate::advisors::common::{finalize_advice, statements_or_advice};
use crate::advisors::Advisor;
use crate::context::AdvisorContext;
use crate::error::{AdvisorError, DriverError};
use crate::types::{Advice, AdviceCode};

/// Advisor dry-running DML statements.
pub struct StatementDmlDryRunAdvisor;

impl Advisor for StatementDmlDryRunAdvisor {
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError> {
        let statements = match statements_or_advice(ctx, statement) {
            Ok(statements) => statements,
            Err(advice) => return Ok(advice),
        };

        let status = ctx.rule.level.advice_status()?;
        let title = ctx.rule.rule_type.to_string();
        let mut advice = Vec::new();

        if let Some(driver) = ctx.driver {
            for parsed in statements.iter() {
                if ctx.cancel.is_cancelled() {
                    break;
                }
                if !matches!(
                    parsed.ast,
                    Statement::Insert(_) | Statement::Update { .. } | Statement::Delete(_)
                ) {
                    continue;
                }
                let probe = format!("EXPLAIN {}", parsed.text);
                match driver.explain(&ctx.cancel, &probe) {
                    Ok(()) => {}
                    Err(DriverError::Cancelled) => break,
                    Err(DriverError::Probe(message)) => {
                        advice.push(Advice {
                            status,
                            code: AdviceCode::StatementDmlDryRunFailed,
                            title: title.clone(),
                            content: format!(
                                "\"{}\" dry runs failed: {}",
                                parsed.text, message
                            ),
                            line: parsed.line,
                        });
                    }
                }
            }
        }

        Ok(finalize_advice(advice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Finder;
    use crate::driver::{CancelToken, Driver};
    use crate::rule::{RuleLevel, RuleType, SqlReviewRule};
    use crate::types::{AdviceStatus, Dialect};
    use std::cell::RefCell;

    /// Records probes; fails statements that target the `broken` table.
    struct ScriptedDriver {
        probes: RefCell<Vec<String>>,
        cancel_after: Option<usize>,
    }

    impl Driver for ScriptedDriver {
        fn explain(&self, cancel: &CancelToken, statement: &str) -> Result<(), DriverError> {
            let mut probes = self.probes.borrow_mut();
            probes.push(statement.to_owned());
            if let Some(limit) = self.cancel_after {
                if probes.len() >= limit {
                    cancel.cancel();
                }
            }
            if statement.contains("broken") {
                return Err(DriverError::Probe("relation \"broken\" does not exist".to_owned()));
            }
            Ok(())
        }
    }

    fn ctx_with_driver<'a>(
        finder: &'a Finder,
        driver: &'a ScriptedDriver,
    ) -> AdvisorContext<'a> {
        let mut ctx = AdvisorContext::new(
            Dialect::Postgres,
            SqlReviewRule::new(RuleType::StatementDmlDryRun, RuleLevel::Error),
            finder,
        );
        ctx.driver = Some(driver);
        ctx
    }

    #[test]
    fn test_without_driver_reports_ok() {
        let finder = Finder::empty(Dialect::Postgres);
        let ctx = AdvisorContext::new(
            Dialect::Postgres,
            SqlReviewRule::new(RuleType::StatementDmlDryRun, RuleLevel::Error),
            &finder,
        );
        let advice = StatementDmlDryRunAdvisor
            .check(&ctx, "DELETE FROM t WHERE id = 1")
            .unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }

    #[test]
    fn test_probe_failure_becomes_advice_and_run_continues() {
        let finder = Finder::empty(Dialect::Postgres);
        let driver = ScriptedDriver {
            probes: RefCell::new(Vec::new()),
            cancel_after: None,
        };
        let ctx = ctx_with_driver(&finder, &driver);
        let script = "INSERT INTO broken (a) VALUES (1); UPDATE t SET a = 2 WHERE id = 1;";
        let advice = StatementDmlDryRunAdvisor.check(&ctx, script).unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::StatementDmlDryRunFailed);
        assert_eq!(advice[0].status, AdviceStatus::Error);
        assert!(advice[0].content.contains("dry runs failed"));
        // Both DML statements were probed despite the first failure.
        assert_eq!(driver.probes.borrow().len(), 2);
        assert!(driver.probes.borrow()[0].starts_with("EXPLAIN "));
    }

    #[test]
    fn test_ddl_statements_are_not_probed() {
        let finder = Finder::empty(Dialect::Postgres);
        let driver = ScriptedDriver {
            probes: RefCell::new(Vec::new()),
            cancel_after: None,
        };
        let ctx = ctx_with_driver(&finder, &driver);
        let advice = StatementDmlDryRunAdvisor
            .check(&ctx, "CREATE TABLE t (id INT); INSERT INTO t (id) VALUES (1);")
            .unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
        assert_eq!(driver.probes.borrow().len(), 1);
    }

    #[test]
    fn test_cancellation_stops_remaining_probes() {
        let finder = Finder::empty(Dialect::Postgres);
        let driver = ScriptedDriver {
            probes: RefCell::new(Vec::new()),
            cancel_after: Some(1),
        };
        let ctx = ctx_with_driver(&finder, &driver);
        let script = "DELETE FROM t WHERE id = 1; DELETE FROM t WHERE id = 2; DELETE FROM t WHERE id = 3;";
        let advice = StatementDmlDryRunAdvisor.check(&ctx, script).unwrap();
        assert_eq!(driver.probes.borrow().len(), 1);
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].code, AdviceCode::Ok);
    }
}
