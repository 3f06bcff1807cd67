//! Caller identity, resolved once per request by an external directory.
//!
//! The reservation core never keeps a session. Every operation receives the
//! [`Caller`] explicitly.

use crate::error::DirectoryError;
use crate::types::CallerId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role granted by the directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted access, including route administration
    Admin,
    /// Books and manages tickets
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Operator => write!(f, "operator"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// An authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Directory-issued ID
    pub id: CallerId,
    /// Granted role
    pub role: Role,
}

impl Caller {
    /// Creates an administrator
    #[must_use]
    pub const fn admin(id: CallerId) -> Self {
        Self {
            id,
            role: Role::Admin,
        }
    }

    /// Creates an operator
    #[must_use]
    pub const fn operator(id: CallerId) -> Self {
        Self {
            id,
            role: Role::Operator,
        }
    }

    /// Whether the caller is an administrator
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Opaque credentials presented by a caller (a bearer token over HTTP).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    /// Wraps a raw token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}

/// Identity directory.
///
/// Maps presented credentials to a caller ID and role. Credential storage
/// lives entirely behind this trait.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve credentials to a caller.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidCredentials`] for unknown credentials
    /// and [`DirectoryError::Unavailable`] if the backend fails.
    async fn resolve_caller(&self, credentials: &Credentials) -> Result<Caller, DirectoryError>;
}
