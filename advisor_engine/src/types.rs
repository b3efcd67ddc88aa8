//! Core type definitions for the SQL review advisor engine.
//!
//! These types form the contract between the engine and its callers
//! (the plan-check scheduler and the policy store):
//!
//! - [`Dialect`] identifies a supported SQL engine family
//! - [`AdviceStatus`] is the severity of a finding
//! - [`AdviceCode`] is the stable diagnostic identifier
//! - [`Advice`] is the atomic unit of advisor output

use serde::{Deserialize, Serialize};

/// A supported SQL engine family, each with its own parser configuration.
///
/// Serialized values are lowercase strings: `"mysql"`, `"tidb"`, `"postgres"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL.
    MySql,
    /// TiDB (MySQL wire-compatible).
    TiDb,
    /// MariaDB (MySQL wire-compatible).
    MariaDb,
    /// OceanBase in MySQL mode.
    OceanBase,
    /// PostgreSQL.
    Postgres,
    /// Snowflake.
    Snowflake,
}

impl Dialect {
    /// Whether this dialect belongs to the MySQL family and shares its
    /// parser configuration and type-width defaults.
    #[must_use]
    pub fn is_mysql_family(self) -> bool {
        matches!(
            self,
            Self::MySql | Self::TiDb | Self::MariaDb | Self::OceanBase
        )
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MySql => write!(f, "mysql"),
            Self::TiDb => write!(f, "tidb"),
            Self::MariaDb => write!(f, "mariadb"),
            Self::OceanBase => write!(f, "oceanbase"),
            Self::Postgres => write!(f, "postgres"),
            Self::Snowflake => write!(f, "snowflake"),
        }
    }
}

/// Severity of a single piece of advice.
///
/// Ordered so that the overall status of a check run is simply the maximum
/// severity observed across its advice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceStatus {
    /// No finding.
    Success,
    /// Informational notice, no action required.
    Info,
    /// Issue that should be addressed but does not block.
    Warning,
    /// Issue that must be fixed before the migration may run.
    Error,
}

impl std::fmt::Display for AdviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic identifier, one per distinct condition.
///
/// The numeric values are part of the persisted result format and must
/// never be reused for a different condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdviceCode {
    /// No finding.
    Ok = 0,
    /// Unexpected fault inside a checker, recovered by the executor.
    Internal = 1,
    /// The statement text failed to parse under the run's dialect.
    SyntaxError = 201,
    /// A referenced table exists neither in the catalog nor earlier in the script.
    TableNotExists = 301,
    /// A new or changed column is missing a required comment.
    NoColumnComment = 401,
    /// A column comment exceeds the configured maximum length.
    ColumnCommentTooLong = 402,
    /// A primary-key column's resolved type is neither INT nor BIGINT.
    IndexPkType = 501,
    /// A COMMIT statement appears inside the migration script.
    StatementDisallowCommit = 601,
    /// A statement creates or manages table partitions.
    CreateTablePartition = 602,
    /// An INSERT statement omits its column list.
    InsertNotSpecifyColumn = 603,
    /// An ALTER TABLE changes a column to a different normalized type.
    ChangeColumnType = 604,
    /// A table is left without a primary key at the end of the script.
    TableNoPk = 605,
    /// An EXPLAIN dry-run probe failed for a DML statement.
    StatementDmlDryRunFailed = 606,
    /// The requested (dialect, rule) pair has no registered advisor.
    UnsupportedRule = 701,
}

impl std::fmt::Display for AdviceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ok => "Ok",
            Self::Internal => "Internal",
            Self::SyntaxError => "SyntaxError",
            Self::TableNotExists => "TableNotExists",
            Self::NoColumnComment => "NoColumnComment",
            Self::ColumnCommentTooLong => "ColumnCommentTooLong",
            Self::IndexPkType => "IndexPKType",
            Self::StatementDisallowCommit => "StatementDisallowCommit",
            Self::CreateTablePartition => "CreateTablePartition",
            Self::InsertNotSpecifyColumn => "InsertNotSpecifyColumn",
            Self::ChangeColumnType => "ChangeColumnType",
            Self::TableNoPk => "TableNoPK",
            Self::StatementDmlDryRunFailed => "StatementDMLDryRunFailed",
            Self::UnsupportedRule => "UnsupportedRule",
        };
        write!(f, "{name}")
    }
}

/// A single finding emitted by one checker invocation.
///
/// Produced in traversal order (= source order), never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// Severity of this finding.
    pub status: AdviceStatus,

    /// Stable diagnostic identifier.
    pub code: AdviceCode,

    /// Display label, conventionally the rule type string.
    pub title: String,

    /// Human-readable message naming the offending identifier(s).
    pub content: String,

    /// 1-based source line, 0 if unknown.
    pub line: usize,
}

impl Advice {
    /// The synthesized "no findings" entry appended when a checker produced
    /// nothing, so callers always persist a concrete record.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: AdviceStatus::Success,
            code: AdviceCode::Ok,
            title: "OK".to_owned(),
            content: String::new(),
            line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(AdviceStatus::Success < AdviceStatus::Info);
        assert!(AdviceStatus::Info < AdviceStatus::Warning);
        assert!(AdviceStatus::Warning < AdviceStatus::Error);
    }

    #[test]
    fn test_dialect_family() {
        assert!(Dialect::MySql.is_mysql_family());
        assert!(Dialect::OceanBase.is_mysql_family());
        assert!(!Dialect::Postgres.is_mysql_family());
        assert!(!Dialect::Snowflake.is_mysql_family());
    }

    #[test]
    fn test_dialect_serde_lowercase() {
        let json = serde_json::to_string(&Dialect::OceanBase).unwrap();
        assert_eq!(json, "\"oceanbase\"");
        let back: Dialect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Dialect::OceanBase);
    }

    #[test]
    fn test_advice_ok_entry() {
        let ok = Advice::ok();
        assert_eq!(ok.status, AdviceStatus::Success);
        assert_eq!(ok.code, AdviceCode::Ok);
        assert_eq!(ok.title, "OK");
        assert_eq!(ok.line, 0);
    }
}
