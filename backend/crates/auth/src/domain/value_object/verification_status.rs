use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity verification state carried on every user row.
///
/// `None` means the user never submitted an application. The remaining
/// states track the validator workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
    NeedsInfo,
}

impl VerificationStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use VerificationStatus::*;
        match self {
            None => "none",
            Pending => "pending",
            Approved => "approved",
            Rejected => "rejected",
            NeedsInfo => "needs_info",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use VerificationStatus::*;
        match code {
            "none" => Some(None),
            "pending" => Some(Pending),
            "approved" => Some(Approved),
            "rejected" => Some(Rejected),
            "needs_info" => Some(NeedsInfo),
            _ => Option::None,
        }
    }

    /// Only approved identities may use community features.
    #[inline]
    pub const fn grants_community_access(&self) -> bool {
        matches!(self, VerificationStatus::Approved)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
