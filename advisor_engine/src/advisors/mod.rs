//! Advisor trait definition and the (dialect, rule) registry.
//!
//! Every advisor implements the [`Advisor`] trait and is stateless: all
//! mutable traversal state lives in the checker it constructs per
//! invocation. The registry is wired once at process start by
//! [`build_registry`] and is read-only thereafter, so concurrent lookups
//! need no locking.

pub mod common;
pub mod mysql;
pub mod pg;
pub mod snowflake;

use std::collections::HashMap;

use crate::context::AdvisorContext;
use crate::error::{AdvisorError, RegistryError};
use crate::rule::RuleType;
use crate::types::{Advice, Dialect};

/// A stateless rule implementation bound to one (dialect, rule-type) pair.
///
/// Implementations must be reentrant: the registry hands out the same
/// instance to every run.
pub trait Advisor: Send + Sync {
    /// Review one script under the rule carried by the context.
    ///
    /// The returned list is never empty: when nothing is found, the single
    /// synthesized `Ok` entry is returned instead.
    ///
    /// # Errors
    ///
    /// Only configuration problems (disabled rule, malformed payload,
    /// unusable context) are errors; parse failures and findings are
    /// advice.
    fn check(
        &self,
        ctx: &AdvisorContext<'_>,
        statement: &str,
    ) -> Result<Vec<Advice>, AdvisorError>;
}

/// Immutable map from (dialect, rule type) to its advisor.
#[derive(Default)]
pub struct Registry {
    advisors: HashMap<(Dialect, RuleType), Box<dyn Advisor>>,
}

impl Registry {
    /// An empty registry, for callers wiring a custom advisor set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an advisor for a (dialect, rule type) pair.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the pair is already
    /// taken — accidental collisions must fail at startup, not silently
    /// overwrite.
    pub fn register(
        &mut self,
        dialect: Dialect,
        rule_type: RuleType,
        advisor: Box<dyn Advisor>,
    ) -> Result<(), RegistryError> {
        match self.advisors.entry((dialect, rule_type)) {
            std::collections::hash_map::Entry::Occupied(_) => {
                Err(RegistryError::Duplicate { dialect, rule_type })
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(advisor);
                Ok(())
            }
        }
    }

    /// Look up the advisor for a (dialect, rule type) pair.
    #[must_use]
    pub fn get(&self, dialect: Dialect, rule_type: RuleType) -> Option<&dyn Advisor> {
        self.advisors
            .get(&(dialect, rule_type))
            .map(|advisor| &**advisor)
    }
}

/// Wire the built-in advisor set. Called once at process start.
///
/// # Errors
///
/// Returns [`RegistryError::Duplicate`] if the built-in wiring ever
/// registers a pair twice (an engine defect caught at startup).
pub fn build_registry() -> Result<Registry, RegistryError> {
    use Dialect::{MariaDb, MySql, OceanBase, Postgres, Snowflake, TiDb};

    let mut registry = Registry::new();

    for dialect in [MySql, TiDb, MariaDb, OceanBase] {
        registry.register(
            dialect,
            RuleType::ColumnCommentConvention,
            Box::new(mysql::column_comment_convention::ColumnCommentConventionAdvisor),
        )?;
        registry.register(
            dialect,
            RuleType::IndexPkType,
            Box::new(mysql::index_pk_type::IndexPkTypeAdvisor),
        )?;
        registry.register(
            dialect,
            RuleType::StatementDisallowCommit,
            Box::new(mysql::statement_disallow_commit::StatementDisallowCommitAdvisor),
        )?;
    }

    for dialect in [MySql, TiDb, MariaDb] {
        registry.register(
            dialect,
            RuleType::TableDisallowPartition,
            Box::new(mysql::table_disallow_partition::TableDisallowPartitionAdvisor),
        )?;
    }

    for dialect in [MySql, TiDb] {
        registry.register(
            dialect,
            RuleType::InsertMustSpecifyColumn,
            Box::new(mysql::insert_must_specify_column::InsertMustSpecifyColumnAdvisor),
        )?;
        registry.register(
            dialect,
            RuleType::ColumnDisallowChangingType,
            Box::new(mysql::column_disallow_changing_type::ColumnDisallowChangingTypeAdvisor),
        )?;
        registry.register(
            dialect,
            RuleType::TableExists,
            Box::new(mysql::table_exists::TableExistsAdvisor),
        )?;
    }

    registry.register(
        Postgres,
        RuleType::StatementDisallowCommit,
        Box::new(pg::statement_disallow_commit::StatementDisallowCommitAdvisor),
    )?;
    registry.register(
        Postgres,
        RuleType::StatementDmlDryRun,
        Box::new(pg::statement_dml_dry_run::StatementDmlDryRunAdvisor),
    )?;

    registry.register(
        Snowflake,
        RuleType::TableRequirePk,
        Box::new(snowflake::table_require_pk::TableRequirePkAdvisor),
    )?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_wires_builtins() {
        let registry = build_registry().unwrap();
        assert!(registry
            .get(Dialect::MySql, RuleType::IndexPkType)
            .is_some());
        assert!(registry
            .get(Dialect::OceanBase, RuleType::ColumnCommentConvention)
            .is_some());
        assert!(registry
            .get(Dialect::Postgres, RuleType::StatementDmlDryRun)
            .is_some());
        assert!(registry
            .get(Dialect::Snowflake, RuleType::TableRequirePk)
            .is_some());
        // OceanBase never got the partition rule.
        assert!(registry
            .get(Dialect::OceanBase, RuleType::TableDisallowPartition)
            .is_none());
    }

    #[test]
    fn test_duplicate_registration_is_an_error() {
        let mut registry = Registry::new();
        registry
            .register(
                Dialect::MySql,
                RuleType::StatementDisallowCommit,
                Box::new(mysql::statement_disallow_commit::StatementDisallowCommitAdvisor),
            )
            .unwrap();
        let err = registry
            .register(
                Dialect::MySql,
                RuleType::StatementDisallowCommit,
                Box::new(mysql::statement_disallow_commit::StatementDisallowCommitAdvisor),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                dialect: Dialect::MySql,
                rule_type: RuleType::StatementDisallowCommit,
            }
        );
    }
}
