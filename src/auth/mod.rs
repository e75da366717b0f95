//! User association auth.
//!
//! # Responsibilities
//! - Verify `Authorization: Bearer <jwt>` headers on the user endpoint
//! - Extract the subject claim as the user id
//! - Mint tokens for test harnesses using the same key
//!
//! # Design Decisions
//! - Only the subject claim is consumed
//! - A malformed header and an invalid token are separate errors here,
//!   but the HTTP layer renders both as the same 400

pub mod token;

pub use token::{TokenError, TokenVerifier, BEARER_PREFIX};
