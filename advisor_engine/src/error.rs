//! Error taxonomy of the advisor engine.
//!
//! Input/config errors ([`AdvisorError`], [`RegistryError`],
//! [`ExecutorError`]) surface to the caller immediately. Parse errors and
//! probe failures never appear here — they are converted into advice by the
//! advisors themselves.

use thiserror::Error;

use crate::rule::RuleType;
use crate::types::Dialect;

/// An error returned by an advisor invocation.
///
/// Anything that reaches the caller through this type is a configuration or
/// engine defect, not a review finding.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A disabled rule was dispatched.
    #[error("rule is disabled and must not be dispatched")]
    DisabledRule,

    /// The rule payload blob could not be decoded.
    #[error("invalid payload for rule {rule_type}: {reason}")]
    InvalidPayload {
        /// The rule whose payload failed to decode.
        rule_type: RuleType,
        /// Decoder message.
        reason: String,
    },

    /// The context is missing something this advisor requires
    /// (e.g. a pre-parsed AST of the wrong dialect).
    #[error("invalid advisor context: {0}")]
    InvalidContext(String),
}

/// An error raised while wiring the advisor registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The same (dialect, rule type) pair was registered twice.
    #[error("advisor already registered for ({dialect}, {rule_type})")]
    Duplicate {
        /// Dialect of the colliding registration.
        dialect: Dialect,
        /// Rule type of the colliding registration.
        rule_type: RuleType,
    },
}

/// An error returned by the plan check executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// No advisor is registered for the requested (dialect, rule type) pair.
    /// This is a caller configuration error, distinct from a checker fault.
    #[error("no advisor registered for ({dialect}, {rule_type})")]
    AdvisorNotFound {
        /// Requested dialect.
        dialect: Dialect,
        /// Requested rule type.
        rule_type: RuleType,
    },

    /// The advisor reported a configuration problem.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

/// A failure reported by the caller-supplied live connection.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The probe was aborted because the run was cancelled.
    #[error("probe cancelled")]
    Cancelled,

    /// The backend rejected the probe statement.
    #[error("{0}")]
    Probe(String),
}
