//! Signed session tokens (HS256 JWT).
//!
//! Expiry is checked here against an explicit clock reading rather than by the
//! JWT library, so the validity window has no leeway.

use crate::model::employee::{Employee, EmployeeId, Role};
use crate::policy::Caller;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 24;

/// Decoded session token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub employee_id: EmployeeId,
    pub email: String,
    pub role: Role,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl Claims {
    pub fn caller(&self) -> Caller {
        Caller::new(self.employee_id, self.role)
    }
}

/// Session token failure.
///
/// `Expired` and `Malformed` are distinct here; callers outside the core
/// collapse them into one rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Expired,
    Malformed(String),
    Encode(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "session token expired"),
            Self::Malformed(reason) => write!(f, "session token invalid: {reason}"),
            Self::Encode(reason) => write!(f, "session token encoding failed: {reason}"),
        }
    }
}

impl Error for SessionError {}

/// Issues and verifies session tokens with one symmetric secret.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionService {
    pub fn new(secret: &str, ttl_hours: u32) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `employee` valid from now.
    pub fn issue(&self, employee: &Employee) -> Result<String, SessionError> {
        self.issue_at(employee, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, employee: &Employee, now: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = Claims {
            employee_id: employee.id,
            email: employee.email.clone(),
            role: employee.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| SessionError::Encode(err.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature and shape, then rejects tokens whose expiry is not
    /// strictly after `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, SessionError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| SessionError::Malformed(err.to_string()))?;
        if now.timestamp() >= claims.exp {
            return Err(SessionError::Expired);
        }
        Ok(claims)
    }
}
