//! Per-invocation advisor context.

use crate::catalog::Finder;
use crate::driver::{CancelToken, Driver};
use crate::parser::ParsedStatement;
use crate::rule::SqlReviewRule;
use crate::types::Dialect;

/// Everything one `Advisor::check` call may consult.
///
/// Constructed fresh per invocation and never shared across calls. The
/// catalog finder and the optional driver are borrowed from the caller; the
/// engine only reads through them.
pub struct AdvisorContext<'a> {
    /// Dialect of the statements under review.
    pub dialect: Dialect,

    /// Session default charset recorded by the caller. Adapters that derive
    /// parser behavior from it read it here; the sqlparser-backed adapter
    /// does not need it.
    pub charset: String,

    /// Session default collation, same contract as `charset`.
    pub collation: String,

    /// The rule being enforced.
    pub rule: SqlReviewRule,

    /// Read-only schema snapshot for semantic lookups.
    pub finder: &'a Finder,

    /// Live connection for dry-run probes, when the caller supplies one.
    pub driver: Option<&'a dyn Driver>,

    /// Pre-parsed statements, when the caller already parsed the script.
    /// Advisors reuse this instead of parsing again.
    pub ast: Option<&'a [ParsedStatement]>,

    /// Cancellation flag propagated into blocking probes.
    pub cancel: CancelToken,
}

impl<'a> AdvisorContext<'a> {
    /// A context with no driver, no pre-parsed AST, and default session
    /// charset/collation.
    #[must_use]
    pub fn new(dialect: Dialect, rule: SqlReviewRule, finder: &'a Finder) -> Self {
        Self {
            dialect,
            charset: String::new(),
            collation: String::new(),
            rule,
            finder,
            driver: None,
            ast: None,
            cancel: CancelToken::new(),
        }
    }
}
