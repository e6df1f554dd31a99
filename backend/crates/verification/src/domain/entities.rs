//! Domain Entities
//!
//! One application row per user; decisions append to an audit log.

use kernel::id::{ApplicationId, UserId, ValidatorActionId};

use crate::domain::value_objects::{ApplicationStatus, ValidatorActionKind};

/// Identity verification application
#[derive(Debug, Clone)]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub full_name: String,
    pub document_number: String,
    pub address: String,
    pub phone: Option<String>,
    /// Document image references (storage keys, not raw bytes)
    pub id_front_image: String,
    pub id_back_image: Option<String>,
    pub selfie_image: String,
    /// Optional machine-analysis payload attached at submission
    pub analysis: Option<serde_json::Value>,
    pub status: ApplicationStatus,
    pub submitted_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Submitted fields for a new or resubmitted application
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub user_id: UserId,
    pub full_name: String,
    pub document_number: String,
    pub address: String,
    pub phone: Option<String>,
    pub id_front_image: String,
    pub id_back_image: Option<String>,
    pub selfie_image: String,
    pub analysis: Option<serde_json::Value>,
}

/// One audit-log entry for a validator decision
#[derive(Debug, Clone)]
pub struct ValidatorActionRecord {
    pub id: ValidatorActionId,
    pub application_id: ApplicationId,
    pub validator_id: UserId,
    pub action: ValidatorActionKind,
    pub notes: Option<String>,
    pub created_at_ms: i64,
}
