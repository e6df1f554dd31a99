//! Platform - shared infrastructure utilities
//!
//! Framework-agnostic building blocks used across the backend crates:
//! - `crypto` - CSPRNG, hashing, encoding primitives
//! - `token` - opaque secret generation and digesting (refresh tokens)
//! - `password` - Argon2id password hashing and policy
//! - `cookie` - Set-Cookie construction and parsing
//! - `client` - client device metadata extraction

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod token;
