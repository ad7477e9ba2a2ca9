//! Credential verification and session tokens.
//!
//! # Responsibility
//! - Turn plaintext passwords into salted one-way hashes and verify them.
//! - Issue and verify signed, time-limited session tokens.
//!
//! # Invariants
//! - Plaintext passwords and issued tokens are never logged or persisted.
//! - The signing secret is supplied by the caller; there is no global key.

pub mod password;
pub mod session;
