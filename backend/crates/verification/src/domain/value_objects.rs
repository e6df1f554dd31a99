//! Domain Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of an identity application. Absence of a row means the
/// user never submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    NeedsInfo,
}

impl ApplicationStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use ApplicationStatus::*;
        match self {
            Pending => "pending",
            Approved => "approved",
            Rejected => "rejected",
            NeedsInfo => "needs_info",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use ApplicationStatus::*;
        match code {
            "pending" => Some(Pending),
            "approved" => Some(Approved),
            "rejected" => Some(Rejected),
            "needs_info" => Some(NeedsInfo),
            _ => None,
        }
    }

    /// Whether a validator decision may be applied in this state.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, ApplicationStatus::Pending)
    }

    /// Whether the citizen may resubmit from this state.
    #[inline]
    pub const fn allows_resubmission(&self) -> bool {
        use ApplicationStatus::*;
        matches!(self, Rejected | NeedsInfo)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validator decision recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorActionKind {
    Approve,
    Reject,
    RequestInfo,
    Reopen,
}

impl ValidatorActionKind {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use ValidatorActionKind::*;
        match self {
            Approve => "approve",
            Reject => "reject",
            RequestInfo => "request_info",
            Reopen => "reopen",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use ValidatorActionKind::*;
        match code {
            "approve" => Some(Approve),
            "reject" => Some(Reject),
            "request_info" => Some(RequestInfo),
            "reopen" => Some(Reopen),
            _ => None,
        }
    }

    /// The application status this action moves the row to.
    #[inline]
    pub const fn resulting_status(&self) -> ApplicationStatus {
        use ValidatorActionKind::*;
        match self {
            Approve => ApplicationStatus::Approved,
            Reject => ApplicationStatus::Rejected,
            RequestInfo => ApplicationStatus::NeedsInfo,
            Reopen => ApplicationStatus::Pending,
        }
    }

    /// Only rejections stamp a rejection reason on the user record; every
    /// other action clears prior rejection metadata.
    #[inline]
    pub const fn stamps_rejection(&self) -> bool {
        matches!(self, ValidatorActionKind::Reject)
    }
}

impl fmt::Display for ValidatorActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
            ApplicationStatus::NeedsInfo,
        ] {
            assert_eq!(ApplicationStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ApplicationStatus::from_code("archived"), None);
    }

    #[test]
    fn test_resubmission_states() {
        assert!(!ApplicationStatus::Pending.allows_resubmission());
        assert!(!ApplicationStatus::Approved.allows_resubmission());
        assert!(ApplicationStatus::Rejected.allows_resubmission());
        assert!(ApplicationStatus::NeedsInfo.allows_resubmission());
    }

    #[test]
    fn test_action_resulting_status() {
        assert_eq!(
            ValidatorActionKind::Approve.resulting_status(),
            ApplicationStatus::Approved
        );
        assert_eq!(
            ValidatorActionKind::Reject.resulting_status(),
            ApplicationStatus::Rejected
        );
        assert_eq!(
            ValidatorActionKind::RequestInfo.resulting_status(),
            ApplicationStatus::NeedsInfo
        );
        assert_eq!(
            ValidatorActionKind::Reopen.resulting_status(),
            ApplicationStatus::Pending
        );
    }

    #[test]
    fn test_only_reject_stamps_rejection() {
        assert!(ValidatorActionKind::Reject.stamps_rejection());
        assert!(!ValidatorActionKind::Approve.stamps_rejection());
        assert!(!ValidatorActionKind::RequestInfo.stamps_rejection());
        assert!(!ValidatorActionKind::Reopen.stamps_rejection());
    }
}
