//! Plan check executor — drives one advisor invocation per plan-check-run.
//!
//! The executor is invoked by an external scheduler, potentially once per
//! run concurrently across many runs; each invocation is independent and
//! side-effect-free except for its own result. Every advisor dispatch is
//! wrapped in `catch_unwind` so a defect in one checker emits a single
//! internal-error result instead of taking down the scheduler.
//!
//! No retries happen here: a failed run is reported and the scheduler
//! decides whether to re-enqueue it.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::advisors::Registry;
use crate::context::AdvisorContext;
use crate::error::ExecutorError;
use crate::parser::parse_or_advice;
use crate::report::{affected_tables, classify_statement, is_dml};
use crate::result::CheckRunResult;
use crate::types::{Advice, AdviceCode, AdviceStatus, Dialect};

/// Kind of check a plan-check-run requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanCheckRunType {
    /// Full SQL review under the configured rule.
    SqlReview,
    /// Per-statement kind classification.
    StatementType,
    /// Single-rule advise pass.
    StatementAdvise,
    /// Affected-object summary.
    StatementReport,
    /// EXPLAIN dry-run of DML statements.
    DmlDryRun,
}

/// Payload of one plan-check-run: the script plus its target identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCheckPayload {
    /// The migration script under review.
    pub statement: String,

    /// Target database identifier, recorded for the caller's bookkeeping.
    #[serde(default)]
    pub database: String,
}

/// Lifecycle of one run. The executor moves a run `Pending → Running →
/// {Succeeded | Failed}`; re-enqueueing a failed run is the scheduler's
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Created, not yet picked up.
    Pending,
    /// Executing.
    Running,
    /// Finished with results.
    Succeeded,
    /// Finished with a configuration or engine error.
    Failed,
}

/// One unit of plan-check work, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCheckRun {
    /// Caller-assigned identifier.
    pub id: i64,

    /// Requested check kind.
    pub run_type: PlanCheckRunType,

    /// Script and target identifiers.
    pub payload: PlanCheckPayload,

    /// Lifecycle state, updated by [`run_once`].
    pub state: RunState,
}

impl PlanCheckRun {
    /// A fresh pending run.
    #[must_use]
    pub fn new(id: i64, run_type: PlanCheckRunType, statement: impl Into<String>) -> Self {
        Self {
            id,
            run_type,
            payload: PlanCheckPayload {
                statement: statement.into(),
                database: String::new(),
            },
            state: RunState::Pending,
        }
    }
}

/// Whether the statement-type check kind is supported for a dialect.
#[must_use]
pub fn is_statement_type_check_supported(dialect: Dialect) -> bool {
    matches!(
        dialect,
        Dialect::Postgres | Dialect::TiDb | Dialect::MySql | Dialect::MariaDb | Dialect::OceanBase
    )
}

/// Whether the advise check kinds are supported for a dialect.
#[must_use]
pub fn is_statement_advise_supported(dialect: Dialect) -> bool {
    matches!(
        dialect,
        Dialect::MySql
            | Dialect::TiDb
            | Dialect::MariaDb
            | Dialect::Postgres
            | Dialect::OceanBase
            | Dialect::Snowflake
    )
}

/// Whether the statement-report check kind is supported for a dialect.
#[must_use]
pub fn is_statement_report_supported(dialect: Dialect) -> bool {
    matches!(
        dialect,
        Dialect::Postgres | Dialect::MySql | Dialect::OceanBase
    )
}

/// Whether the DML dry-run check kind is supported for a dialect.
#[must_use]
pub fn is_dml_dry_run_supported(dialect: Dialect) -> bool {
    matches!(dialect, Dialect::Postgres)
}

fn is_supported(run_type: PlanCheckRunType, dialect: Dialect) -> bool {
    match run_type {
        PlanCheckRunType::StatementType => is_statement_type_check_supported(dialect),
        PlanCheckRunType::SqlReview | PlanCheckRunType::StatementAdvise => {
            is_statement_advise_supported(dialect)
        }
        PlanCheckRunType::StatementReport => is_statement_report_supported(dialect),
        PlanCheckRunType::DmlDryRun => is_dml_dry_run_supported(dialect),
    }
}

/// Execute one plan-check-run.
///
/// Unsupported (check kind, dialect) combinations are skipped with empty
/// results rather than attempted. A panicking checker is recovered into a
/// single internal-error result; the process keeps serving runs.
///
/// # Errors
///
/// Returns [`ExecutorError::AdvisorNotFound`] when no advisor is registered
/// for the run's (dialect, rule type) pair, and [`ExecutorError::Advisor`]
/// when the advisor rejects its configuration. Both mark the run Failed.
pub fn run_once(
    registry: &Registry,
    ctx: &AdvisorContext<'_>,
    run: &mut PlanCheckRun,
) -> Result<Vec<CheckRunResult>, ExecutorError> {
    run.state = RunState::Running;

    if !is_supported(run.run_type, ctx.dialect) {
        log::debug!(
            "plan check run {}: {:?} not supported for {}, skipping",
            run.id,
            run.run_type,
            ctx.dialect
        );
        run.state = RunState::Succeeded;
        return Ok(Vec::new());
    }

    let outcome = match run.run_type {
        PlanCheckRunType::StatementType => Ok(statement_type_results(ctx, &run.payload.statement)),
        PlanCheckRunType::StatementReport => {
            Ok(statement_report_results(ctx, &run.payload.statement))
        }
        PlanCheckRunType::SqlReview
        | PlanCheckRunType::StatementAdvise
        | PlanCheckRunType::DmlDryRun => advise_results(registry, ctx, run),
    };

    match outcome {
        Ok(results) => {
            run.state = RunState::Succeeded;
            Ok(results)
        }
        Err(err) => {
            run.state = RunState::Failed;
            Err(err)
        }
    }
}

/// Dispatch through the registry under a recoverable-fault boundary.
fn advise_results(
    registry: &Registry,
    ctx: &AdvisorContext<'_>,
    run: &PlanCheckRun,
) -> Result<Vec<CheckRunResult>, ExecutorError> {
    let advisor = registry
        .get(ctx.dialect, ctx.rule.rule_type)
        .ok_or(ExecutorError::AdvisorNotFound {
            dialect: ctx.dialect,
            rule_type: ctx.rule.rule_type,
        })?;

    let invocation =
        catch_unwind(AssertUnwindSafe(|| advisor.check(ctx, &run.payload.statement)));

    match invocation {
        Ok(Ok(advice)) => Ok(vec![CheckRunResult::from_advice(advice)]),
        Ok(Err(err)) => Err(err.into()),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                (*s).to_owned()
            } else {
                "unknown panic".to_owned()
            };
            log::error!(
                "plan check run {}: checker for ({}, {}) panicked: {}",
                run.id,
                ctx.dialect,
                ctx.rule.rule_type,
                panic_msg
            );
            Ok(vec![CheckRunResult::from_advice(vec![Advice {
                status: AdviceStatus::Error,
                code: AdviceCode::Internal,
                title: ctx.rule.rule_type.to_string(),
                content: format!("encounter internal error when executing check: {panic_msg}"),
                line: 0,
            }])])
        }
    }
}

/// Per-statement kind classification for the statement-type check kind.
fn statement_type_results(ctx: &AdvisorContext<'_>, statement: &str) -> Vec<CheckRunResult> {
    let statements = match parse_or_advice(ctx.dialect, statement) {
        Ok(statements) => statements,
        Err(advice) => return vec![CheckRunResult::from_advice(advice)],
    };

    let advice: Vec<Advice> = statements
        .iter()
        .map(|parsed| Advice {
            status: AdviceStatus::Success,
            code: AdviceCode::Ok,
            title: "statement.type".to_owned(),
            content: format!(
                "{}: \"{}\"",
                classify_statement(&parsed.ast),
                parsed.text
            ),
            line: parsed.line,
        })
        .collect();

    vec![CheckRunResult::from_advice(
        crate::advisors::common::finalize_advice(advice),
    )]
}

/// Affected-object summary for the statement-report check kind.
fn statement_report_results(ctx: &AdvisorContext<'_>, statement: &str) -> Vec<CheckRunResult> {
    let statements = match parse_or_advice(ctx.dialect, statement) {
        Ok(statements) => statements,
        Err(advice) => return vec![CheckRunResult::from_advice(advice)],
    };

    let tables = affected_tables(&statements);
    let dml_count = statements
        .iter()
        .filter(|parsed| is_dml(classify_statement(&parsed.ast)))
        .count();
    let content = if tables.is_empty() {
        format!(
            "{} statement(s), {} DML, no affected tables",
            statements.len(),
            dml_count
        )
    } else {
        format!(
            "{} statement(s), {} DML, affected tables: {}",
            statements.len(),
            dml_count,
            tables.join(", ")
        )
    };

    vec![CheckRunResult::from_advice(vec![Advice {
        status: AdviceStatus::Success,
        code: AdviceCode::Ok,
        title: "statement.report".to_owned(),
        content,
        line: 0,
    }])]
}
