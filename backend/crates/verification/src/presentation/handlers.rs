//! HTTP Handlers
//!
//! Citizen endpoints operate on the caller's own application; validator
//! endpoints are role-gated by the router composition.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use std::sync::Arc;

use auth::presentation::middleware::Identity;

use crate::application::{ReviewQueueUseCase, SubmitApplicationUseCase, ValidatorActionUseCase};
use crate::domain::entities::ApplicationDraft;
use crate::domain::repository::VerificationRepository;
use crate::domain::value_objects::ApplicationStatus;
use crate::error::VerificationResult;
use crate::presentation::dto::{
    ActionHistoryResponse, ApplicationResponse, SubmitApplicationRequest, ValidatorActionRequest,
};
use kernel::id::ApplicationId;

/// Shared state for verification handlers
#[derive(Clone)]
pub struct VerificationAppState<R>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

// ============================================================================
// Citizen Endpoints
// ============================================================================

/// POST /verification/application
pub async fn submit_application<R>(
    State(state): State<VerificationAppState<R>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SubmitApplicationRequest>,
) -> VerificationResult<impl IntoResponse>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = SubmitApplicationUseCase::new(state.repo.clone());

    let application = use_case
        .execute(ApplicationDraft {
            user_id: identity.user_id,
            full_name: req.full_name,
            document_number: req.document_number,
            address: req.address,
            phone: req.phone,
            id_front_image: req.id_front_image,
            id_back_image: req.id_back_image,
            selfie_image: req.selfie_image,
            analysis: req.analysis,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

/// GET /verification/application
///
/// The caller's own application; 204 when nothing was ever submitted.
pub async fn own_application<R>(
    State(state): State<VerificationAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> VerificationResult<axum::response::Response>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = SubmitApplicationUseCase::new(state.repo.clone());

    Ok(match use_case.status(identity.user_id).await? {
        Some(application) => Json(ApplicationResponse::from(application)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

// ============================================================================
// Validator Endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    status: Option<ApplicationStatus>,
}

/// GET /validator/queue?status=
pub async fn list_applications<R>(
    State(state): State<VerificationAppState<R>>,
    Query(query): Query<QueueQuery>,
) -> VerificationResult<Json<Vec<ApplicationResponse>>>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewQueueUseCase::new(state.repo.clone());
    let applications = use_case.queue(query.status).await?;

    Ok(Json(
        applications
            .into_iter()
            .map(ApplicationResponse::from)
            .collect(),
    ))
}

/// GET /validator/application/{id}
pub async fn application_detail<R>(
    State(state): State<VerificationAppState<R>>,
    Path(id): Path<i64>,
) -> VerificationResult<Json<ApplicationResponse>>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewQueueUseCase::new(state.repo.clone());
    let application = use_case.detail(ApplicationId::from_i64(id)).await?;

    Ok(Json(ApplicationResponse::from(application)))
}

/// POST /validator/action
pub async fn apply_action<R>(
    State(state): State<VerificationAppState<R>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ValidatorActionRequest>,
) -> VerificationResult<Json<ApplicationResponse>>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = ValidatorActionUseCase::new(state.repo.clone());
    let application = use_case
        .execute(
            ApplicationId::from_i64(req.application_id),
            identity.user_id,
            req.action,
            req.notes,
        )
        .await?;

    Ok(Json(ApplicationResponse::from(application)))
}

/// POST /validator/application/{id}/reopen
pub async fn reopen_application<R>(
    State(state): State<VerificationAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> VerificationResult<Json<ApplicationResponse>>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = ValidatorActionUseCase::new(state.repo.clone());
    let application = use_case
        .reopen(ApplicationId::from_i64(id), identity.user_id)
        .await?;

    Ok(Json(ApplicationResponse::from(application)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    application_id: Option<i64>,
}

/// GET /validator/history?applicationId=
pub async fn action_history<R>(
    State(state): State<VerificationAppState<R>>,
    Query(query): Query<HistoryQuery>,
) -> VerificationResult<Json<Vec<ActionHistoryResponse>>>
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewQueueUseCase::new(state.repo.clone());
    let history = use_case
        .history(query.application_id.map(ApplicationId::from_i64))
        .await?;

    Ok(Json(
        history.into_iter().map(ActionHistoryResponse::from).collect(),
    ))
}
