use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl WalkRequestStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WalkRequestStatus::Pending => "pending",
            WalkRequestStatus::Accepted => "accepted",
            WalkRequestStatus::Rejected => "rejected",
        }
    }

    /// Validate a response to a request currently in `self`.
    ///
    /// Only a pending request can be answered, and only with accept/reject.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] for any other move.
    pub fn transition_to(self, next: WalkRequestStatus) -> Result<WalkRequestStatus, CoreError> {
        match (self, next) {
            (
                WalkRequestStatus::Pending,
                WalkRequestStatus::Accepted | WalkRequestStatus::Rejected,
            ) => Ok(next),
            _ => Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            }),
        }
    }
}

impl std::fmt::Display for WalkRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalkRequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WalkRequestStatus::Pending),
            "accepted" => Ok(WalkRequestStatus::Accepted),
            "rejected" => Ok(WalkRequestStatus::Rejected),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Reject a walk request a user would send to themselves.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] when `from_user_id == to_user_id`.
pub fn validate_walk_parties(from_user_id: &str, to_user_id: &str) -> Result<(), CoreError> {
    if from_user_id == to_user_id {
        return Err(CoreError::Validation(
            "cannot request a walk with your own dog".to_string(),
        ));
    }
    Ok(())
}
