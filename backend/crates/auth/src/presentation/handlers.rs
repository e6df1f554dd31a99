//! HTTP Handlers

use axum::extract::{ConnectInfo, Extension, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use std::sync::Arc;

use platform::client::extract_device_meta;
use platform::cookie::{delete_cookie_header, set_cookie_header};

use crate::application::config::{AuthConfig, REFRESH_COOKIE_NAME};
use crate::application::{
    CurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, SessionsUseCase,
};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::csrf::mint_csrf_token;
use crate::presentation::dto::{
    AuthResponse, CsrfTokenResponse, LoginRequest, LogoutAllResponse, SessionResponse,
    UserResponse,
};
use crate::presentation::middleware::Identity;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Set-Cookie pair for a fresh session (access + refresh)
fn session_cookies(
    config: &AuthConfig,
    access_token: &str,
    refresh_secret: &str,
) -> AppendHeaders<[(header::HeaderName, header::HeaderValue); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            set_cookie_header(&config.access_cookie(), access_token),
        ),
        (
            header::SET_COOKIE,
            set_cookie_header(&config.refresh_cookie(), refresh_secret),
        ),
    ])
}

/// Set-Cookie pair that clears both session cookies
fn clear_session_cookies(
    config: &AuthConfig,
) -> AppendHeaders<[(header::HeaderName, header::HeaderValue); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            delete_cookie_header(&config.access_cookie()),
        ),
        (
            header::SET_COOKIE,
            delete_cookie_header(&config.refresh_cookie()),
        ),
    ])
}

/// An unauthorized response that also clears stale session cookies
fn unauthenticated_with_cleared_cookies(config: &AuthConfig) -> Response {
    let mut response = AuthError::Unauthenticated.into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        delete_cookie_header(&config.access_cookie()),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        delete_cookie_header(&config.refresh_cookie()),
    );
    response
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let device = extract_device_meta(&headers, Some(addr.ip()));

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(
            LoginInput {
                email: req.email,
                password: req.password,
            },
            &device,
        )
        .await?;

    Ok((
        StatusCode::OK,
        session_cookies(&state.config, &output.access_token, &output.refresh_secret),
        Json(AuthResponse {
            user: UserResponse::from(&output.user),
            token: output.access_token.clone(),
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh
///
/// Any failure clears both cookies so the browser drops its stale session.
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Some(presented) = platform::cookie::extract_cookie(&headers, REFRESH_COOKIE_NAME) else {
        return Err(unauthenticated_with_cleared_cookies(&state.config));
    };

    let device = extract_device_meta(&headers, Some(addr.ip()));

    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());
    let output = match use_case.execute(&presented, &device).await {
        Ok(output) => output,
        Err(e @ (AuthError::SessionInvalid | AuthError::Unauthenticated)) => {
            let mut response = e.into_response();
            response.headers_mut().append(
                header::SET_COOKIE,
                delete_cookie_header(&state.config.access_cookie()),
            );
            response.headers_mut().append(
                header::SET_COOKIE,
                delete_cookie_header(&state.config.refresh_cookie()),
            );
            return Err(response);
        }
        Err(e) => return Err(e.into_response()),
    };

    Ok((
        StatusCode::OK,
        session_cookies(&state.config, &output.access_token, &output.refresh_secret),
        Json(AuthResponse {
            user: UserResponse::from(&output.user),
            token: output.access_token.clone(),
        }),
    )
        .into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
///
/// Idempotent; cookies are cleared whether or not a live session existed.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    if let Some(presented) = platform::cookie::extract_cookie(&headers, REFRESH_COOKIE_NAME) {
        let use_case = LogoutUseCase::new(state.repo.clone());
        use_case.execute(&presented).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        clear_session_cookies(&state.config),
    ))
}

/// POST /auth/logout-all
pub async fn logout_all<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone());
    let revoked = use_case.execute_all(identity.user_id).await?;

    Ok((
        StatusCode::OK,
        clear_session_cookies(&state.config),
        Json(LogoutAllResponse { revoked }),
    ))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /auth/me
///
/// Reads the user fresh from the store so verification-status changes are
/// visible before the next token refresh.
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = CurrentUserUseCase::new(state.repo.clone());

    match use_case.execute(identity.user_id).await {
        Ok(user) => Ok(Json(UserResponse::from(&user)).into_response()),
        // Token outlived the account row: drop the session entirely
        Err(AuthError::Unauthenticated) => {
            Err(unauthenticated_with_cleared_cookies(&state.config))
        }
        Err(e) => Err(e.into_response()),
    }
}

// ============================================================================
// Session Management
// ============================================================================

/// GET /auth/sessions
pub async fn sessions<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
) -> AuthResult<Json<Vec<SessionResponse>>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let current = platform::cookie::extract_cookie(&headers, REFRESH_COOKIE_NAME);

    let use_case = SessionsUseCase::new(state.repo.clone());
    let sessions = use_case.list(identity.user_id, current.as_deref()).await?;

    Ok(Json(
        sessions.into_iter().map(SessionResponse::from).collect(),
    ))
}

/// DELETE /auth/sessions/{id}
pub async fn revoke_session<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<i64>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = SessionsUseCase::new(state.repo.clone());
    use_case
        .revoke(identity.user_id, kernel::id::RefreshTokenId::from_i64(session_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// CSRF
// ============================================================================

/// GET /auth/csrf-token
///
/// Mints a fresh token into the (page-readable) CSRF cookie and echoes it
/// in the body for non-browser clients.
pub async fn csrf_token<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let token = mint_csrf_token();

    Ok((
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            set_cookie_header(&state.config.csrf_cookie(), &token),
        )],
        Json(CsrfTokenResponse { csrf_token: token }),
    ))
}
