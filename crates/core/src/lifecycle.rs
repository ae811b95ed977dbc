//! Evaluation instance state machine.
//!
//! Two states only: `pending` on creation, `completed` on a successful
//! validated submission. Completed is terminal -- there is no reopen or
//! reject for an evaluation itself.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Pending,
    Completed,
}

impl EvaluationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationStatus::Pending => "pending",
            EvaluationStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == EvaluationStatus::Completed
    }
}

impl FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EvaluationStatus::Pending),
            "completed" => Ok(EvaluationStatus::Completed),
            other => Err(format!("Unknown evaluation status: {other}")),
        }
    }
}

/// Check whether a transition between two statuses is valid.
pub fn can_transition(from: EvaluationStatus, to: EvaluationStatus) -> bool {
    matches!(
        (from, to),
        (EvaluationStatus::Pending, EvaluationStatus::Completed)
    )
}

/// Validate a state transition, returning an error message for invalid ones.
pub fn validate_transition(from: EvaluationStatus, to: EvaluationStatus) -> Result<(), String> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(format!(
            "Invalid transition: {} -> {}",
            from.as_str(),
            to.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_to_completed_is_valid() {
        assert!(can_transition(
            EvaluationStatus::Pending,
            EvaluationStatus::Completed
        ));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(EvaluationStatus::Completed.is_terminal());
        assert!(!can_transition(
            EvaluationStatus::Completed,
            EvaluationStatus::Pending
        ));
        assert!(!can_transition(
            EvaluationStatus::Completed,
            EvaluationStatus::Completed
        ));
    }

    #[test]
    fn self_transition_from_pending_is_invalid() {
        assert!(!can_transition(
            EvaluationStatus::Pending,
            EvaluationStatus::Pending
        ));
    }

    #[test]
    fn validate_transition_names_both_states() {
        let err = validate_transition(EvaluationStatus::Completed, EvaluationStatus::Pending)
            .unwrap_err();
        assert!(err.contains("completed"));
        assert!(err.contains("pending"));
    }

    #[test]
    fn status_parses_from_storage_form() {
        assert_eq!(
            "pending".parse::<EvaluationStatus>().unwrap(),
            EvaluationStatus::Pending
        );
        assert_eq!(
            "completed".parse::<EvaluationStatus>().unwrap(),
            EvaluationStatus::Completed
        );
        assert!("reopened".parse::<EvaluationStatus>().is_err());
    }
}
