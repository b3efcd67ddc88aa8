//! Check run results: the unit the caller persists.

use serde::{Deserialize, Serialize};

use crate::types::{Advice, AdviceStatus};

/// Ordered advice of one check plus its derived overall status.
///
/// The overall status is the maximum severity observed; an empty or
/// all-Success list derives Success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunResult {
    /// Maximum severity across `advice`.
    pub status: AdviceStatus,

    /// Findings in source order.
    pub advice: Vec<Advice>,
}

impl CheckRunResult {
    /// Aggregate an advice list into a result.
    #[must_use]
    pub fn from_advice(advice: Vec<Advice>) -> Self {
        let status = advice
            .iter()
            .map(|a| a.status)
            .max()
            .unwrap_or(AdviceStatus::Success);
        Self { status, advice }
    }

    /// Serialize for persistence by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error message if serialization fails (should not happen
    /// for valid data).
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("JSON serialization failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdviceCode;

    fn advice(status: AdviceStatus) -> Advice {
        Advice {
            status,
            code: AdviceCode::Ok,
            title: "t".to_owned(),
            content: String::new(),
            line: 0,
        }
    }

    #[test]
    fn test_overall_status_is_max_severity() {
        let result = CheckRunResult::from_advice(vec![
            advice(AdviceStatus::Success),
            advice(AdviceStatus::Warning),
            advice(AdviceStatus::Info),
        ]);
        assert_eq!(result.status, AdviceStatus::Warning);
    }

    #[test]
    fn test_empty_list_derives_success() {
        let result = CheckRunResult::from_advice(Vec::new());
        assert_eq!(result.status, AdviceStatus::Success);
    }

    #[test]
    fn test_round_trips_through_json() {
        let result = CheckRunResult::from_advice(vec![advice(AdviceStatus::Error)]);
        let json = result.to_json().unwrap();
        let back: CheckRunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
