//! Opaque Token Codec
//!
//! Generates and digests the opaque secrets used as refresh tokens.
//! The raw secret is a bearer credential: it is handed to the client once
//! and never persisted. Only its SHA-256 digest is stored, so a database
//! read cannot yield usable tokens.

use crate::crypto::{random_bytes, sha256, to_base64_url, to_hex};

/// Entropy of a generated secret, in bytes.
pub const SECRET_ENTROPY_BYTES: usize = 48;

/// Generate a new opaque secret: 48 bytes from the OS CSPRNG, URL-safe
/// base64 encoded (64 characters, no padding).
pub fn generate_opaque_secret() -> String {
    to_base64_url(&random_bytes(SECRET_ENTROPY_BYTES))
}

/// One-way digest of an opaque secret, as lowercase hex.
///
/// Used only for exact-match lookups; this is not password storage, the
/// input already carries full CSPRNG entropy.
pub fn hash_secret(secret: &str) -> String {
    to_hex(&sha256(secret.as_bytes()))
}
