//! SQL review advisor engine.
//!
//! Statically analyzes pending schema/data migration statements against
//! configurable review rules before they are allowed to run, across
//! multiple SQL dialects. Advisors are registered per (dialect, rule type)
//! at process start; the plan check executor dispatches one advisor per
//! run, isolates checker faults, and aggregates findings into
//! severity-ranked results.
//!
//! ```
//! use sqlreview_advisor_engine::advisors::build_registry;
//! use sqlreview_advisor_engine::catalog::Finder;
//! use sqlreview_advisor_engine::context::AdvisorContext;
//! use sqlreview_advisor_engine::executor::{run_once, PlanCheckRun, PlanCheckRunType};
//! use sqlreview_advisor_engine::rule::{RuleLevel, RuleType, SqlReviewRule};
//! use sqlreview_advisor_engine::types::Dialect;
//!
//! let registry = build_registry().expect("built-in advisors wire cleanly");
//! let finder = Finder::empty(Dialect::MySql);
//! let ctx = AdvisorContext::new(
//!     Dialect::MySql,
//!     SqlReviewRule::new(RuleType::StatementDisallowCommit, RuleLevel::Error),
//!     &finder,
//! );
//! let mut run = PlanCheckRun::new(1, PlanCheckRunType::SqlReview, "COMMIT;");
//! let results = run_once(&registry, &ctx, &mut run).unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod advisors;
pub mod catalog;
pub mod context;
pub mod driver;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod result;
pub mod rule;
pub mod types;
pub mod visitor;

pub use advisors::{build_registry, Advisor, Registry};
pub use context::AdvisorContext;
pub use result::CheckRunResult;
pub use types::{Advice, AdviceCode, AdviceStatus, Dialect};
