//! Double-Submit CSRF Guard
//!
//! Tokens have the shape `{secret}.{base36 millis}`. The page script reads
//! the cookie and echoes it back in the `X-CSRF-Token` header; the guard
//! compares the two in constant time and enforces the 4-hour window.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

use crate::application::config::{AuthConfig, CSRF_COOKIE_NAME};
use crate::error::AuthError;
use platform::{cookie, crypto};

pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Number of random bytes in the CSRF secret part
const CSRF_SECRET_BYTES: usize = 32;

/// CSRF guard state
#[derive(Clone)]
pub struct CsrfState {
    pub config: Arc<AuthConfig>,
}

/// Mint a new CSRF token stamped with the current time.
pub fn mint_csrf_token() -> String {
    let secret = crypto::to_base64_url(&crypto::random_bytes(CSRF_SECRET_BYTES));
    let stamp = to_base36(Utc::now().timestamp_millis());
    format!("{secret}.{stamp}")
}

/// Parse the millisecond timestamp off a token. None if the shape is wrong.
fn token_timestamp_ms(token: &str) -> Option<i64> {
    let (_, stamp) = token.rsplit_once('.')?;
    from_base36(stamp)
}

fn to_base36(mut n: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    i64::from_str_radix(s, 36).ok()
}

/// Middleware enforcing double-submit CSRF on state-changing methods.
///
/// GET, HEAD, and OPTIONS pass through untouched. An expired token clears
/// the cookie so the page knows to fetch a fresh one.
pub async fn csrf_guard(
    State(state): State<CsrfState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(next.run(req).await);
    }

    let cookie_token = cookie::extract_cookie(req.headers(), CSRF_COOKIE_NAME);
    let header_token = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let (Some(cookie_token), Some(header_token)) = (cookie_token, header_token) else {
        return Err(AuthError::CsrfRejected.into_response());
    };

    if !crypto::constant_time_eq(cookie_token.as_bytes(), header_token.as_bytes()) {
        return Err(AuthError::CsrfRejected.into_response());
    }

    let Some(issued_ms) = token_timestamp_ms(&cookie_token) else {
        return Err(AuthError::CsrfRejected.into_response());
    };

    let age_ms = Utc::now().timestamp_millis() - issued_ms;
    if age_ms < 0 || age_ms > state.config.csrf_token_ttl.num_milliseconds() {
        // Expired: clear the cookie along with the rejection
        let clear = cookie::delete_cookie_header(&state.config.csrf_cookie());
        let mut response = AuthError::CsrfRejected.into_response();
        response.headers_mut().append(header::SET_COOKIE, clear);
        return Err(response);
    }

    Ok(next.run(req).await)
}
