//! SQL review rule configuration.
//!
//! A [`SqlReviewRule`] is owned by the caller's policy store and read-only to
//! the engine. The `payload` field carries rule-specific configuration as a
//! JSON blob; each advisor that needs one deserializes its own payload type
//! and treats an empty blob as the defaults.

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::types::AdviceStatus;

/// Configured enforcement level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    /// The rule is switched off and must not be dispatched.
    Disabled,
    /// Findings are informational.
    Info,
    /// Findings should be addressed but do not block.
    Warning,
    /// Findings block the migration.
    Error,
}

impl RuleLevel {
    /// Map a rule level onto the advice status its findings carry.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::DisabledRule`] for [`RuleLevel::Disabled`] —
    /// dispatching a disabled rule is a caller configuration error.
    pub fn advice_status(self) -> Result<AdviceStatus, AdvisorError> {
        match self {
            Self::Disabled => Err(AdvisorError::DisabledRule),
            Self::Info => Ok(AdviceStatus::Info),
            Self::Warning => Ok(AdviceStatus::Warning),
            Self::Error => Ok(AdviceStatus::Error),
        }
    }
}

/// Identifier of a review check, matching the policy store's dotted names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// `column.comment.convention`
    #[serde(rename = "column.comment.convention")]
    ColumnCommentConvention,
    /// `column.disallow-changing-type`
    #[serde(rename = "column.disallow-changing-type")]
    ColumnDisallowChangingType,
    /// `index.pk-type`
    #[serde(rename = "index.pk-type")]
    IndexPkType,
    /// `insert.must-specify-column`
    #[serde(rename = "insert.must-specify-column")]
    InsertMustSpecifyColumn,
    /// `statement.disallow-commit`
    #[serde(rename = "statement.disallow-commit")]
    StatementDisallowCommit,
    /// `statement.dml-dry-run`
    #[serde(rename = "statement.dml-dry-run")]
    StatementDmlDryRun,
    /// `table.disallow-partition`
    #[serde(rename = "table.disallow-partition")]
    TableDisallowPartition,
    /// `table.exists`
    #[serde(rename = "table.exists")]
    TableExists,
    /// `table.require-pk`
    #[serde(rename = "table.require-pk")]
    TableRequirePk,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ColumnCommentConvention => "column.comment.convention",
            Self::ColumnDisallowChangingType => "column.disallow-changing-type",
            Self::IndexPkType => "index.pk-type",
            Self::InsertMustSpecifyColumn => "insert.must-specify-column",
            Self::StatementDisallowCommit => "statement.disallow-commit",
            Self::StatementDmlDryRun => "statement.dml-dry-run",
            Self::TableDisallowPartition => "table.disallow-partition",
            Self::TableExists => "table.exists",
            Self::TableRequirePk => "table.require-pk",
        };
        write!(f, "{name}")
    }
}

/// One configured check: what to look for and how loudly to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlReviewRule {
    /// Which check this rule configures.
    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Enforcement level.
    pub level: RuleLevel,

    /// Rule-specific configuration blob (JSON). Empty means defaults.
    #[serde(default)]
    pub payload: String,
}

impl SqlReviewRule {
    /// Build a rule with an empty payload.
    #[must_use]
    pub fn new(rule_type: RuleType, level: RuleLevel) -> Self {
        Self {
            rule_type,
            level,
            payload: String::new(),
        }
    }
}

/// Payload of `column.comment.convention`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentConventionPayload {
    /// Whether every new or changed column must carry a comment.
    #[serde(default)]
    pub required: bool,

    /// Maximum comment length; negative disables the length check.
    #[serde(default = "default_max_length")]
    pub max_length: i64,
}

fn default_max_length() -> i64 {
    64
}

impl Default for CommentConventionPayload {
    fn default() -> Self {
        Self {
            required: false,
            max_length: default_max_length(),
        }
    }
}

impl CommentConventionPayload {
    /// Decode the payload blob of a rule, treating an empty blob as defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidPayload`] when the blob is present but
    /// not valid JSON for this payload type.
    pub fn from_rule(rule: &SqlReviewRule) -> Result<Self, AdvisorError> {
        if rule.payload.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&rule.payload).map_err(|e| AdvisorError::InvalidPayload {
            rule_type: rule.rule_type,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_to_status() {
        assert_eq!(
            RuleLevel::Warning.advice_status().unwrap(),
            AdviceStatus::Warning
        );
        assert_eq!(
            RuleLevel::Error.advice_status().unwrap(),
            AdviceStatus::Error
        );
        assert!(RuleLevel::Disabled.advice_status().is_err());
    }

    #[test]
    fn test_rule_type_serde_dotted_names() {
        let json = serde_json::to_string(&RuleType::IndexPkType).unwrap();
        assert_eq!(json, "\"index.pk-type\"");
        let back: RuleType = serde_json::from_str("\"table.require-pk\"").unwrap();
        assert_eq!(back, RuleType::TableRequirePk);
    }

    #[test]
    fn test_comment_payload_defaults_on_empty() {
        let rule = SqlReviewRule::new(RuleType::ColumnCommentConvention, RuleLevel::Warning);
        let payload = CommentConventionPayload::from_rule(&rule).unwrap();
        assert!(!payload.required);
        assert_eq!(payload.max_length, 64);
    }

    #[test]
    fn test_comment_payload_decodes_blob() {
        let mut rule = SqlReviewRule::new(RuleType::ColumnCommentConvention, RuleLevel::Warning);
        rule.payload = r#"{"required":true,"maxLength":20}"#.to_owned();
        let payload = CommentConventionPayload::from_rule(&rule).unwrap();
        assert!(payload.required);
        assert_eq!(payload.max_length, 20);
    }

    #[test]
    fn test_comment_payload_rejects_garbage() {
        let mut rule = SqlReviewRule::new(RuleType::ColumnCommentConvention, RuleLevel::Warning);
        rule.payload = "{not json".to_owned();
        assert!(CommentConventionPayload::from_rule(&rule).is_err());
    }
}
