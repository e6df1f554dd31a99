//! Data Transfer Objects
//!
//! JSON fields are camelCase, matching the auth API.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Application, ValidatorActionRecord};
use crate::domain::value_objects::{ApplicationStatus, ValidatorActionKind};

/// POST /verification/application request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    pub full_name: String,
    pub document_number: String,
    pub address: String,
    pub phone: Option<String>,
    pub id_front_image: String,
    pub id_back_image: Option<String>,
    pub selfie_image: String,
    pub analysis: Option<serde_json::Value>,
}

/// Application payload for both citizen and validator views
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub document_number: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub id_front_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_back_image: Option<String>,
    pub selfie_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
    pub status: ApplicationStatus,
    pub submitted_at_ms: i64,
    pub updated_at_ms: i64,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id.as_i64(),
            user_id: app.user_id.as_i64(),
            full_name: app.full_name,
            document_number: app.document_number,
            address: app.address,
            phone: app.phone,
            id_front_image: app.id_front_image,
            id_back_image: app.id_back_image,
            selfie_image: app.selfie_image,
            analysis: app.analysis,
            status: app.status,
            submitted_at_ms: app.submitted_at_ms,
            updated_at_ms: app.updated_at_ms,
        }
    }
}

/// POST /validator/action request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorActionRequest {
    pub application_id: i64,
    pub action: ValidatorActionKind,
    pub notes: Option<String>,
}

/// One audit-log entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionHistoryResponse {
    pub id: i64,
    pub application_id: i64,
    pub validator_id: i64,
    pub action: ValidatorActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at_ms: i64,
}

impl From<ValidatorActionRecord> for ActionHistoryResponse {
    fn from(record: ValidatorActionRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            application_id: record.application_id.as_i64(),
            validator_id: record.validator_id.as_i64(),
            action: record.action,
            notes: record.notes,
            created_at_ms: record.created_at_ms,
        }
    }
}
