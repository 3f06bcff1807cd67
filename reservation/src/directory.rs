//! Static token directory.
//!
//! Stands in for the external operator/admin directory: a fixed table of
//! bearer tokens, each mapped to a caller ID and role. Entries come from
//! configuration as `token:id:role`, comma separated.

use async_trait::async_trait;
use seatline_core::{Caller, CallerId, Credentials, Directory, DirectoryError, Role};
use std::collections::HashMap;
use thiserror::Error;

/// A malformed `token:id:role` entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryParseError {
    /// Entry does not have three fields
    #[error("directory entry '{0}' is not token:id:role")]
    Malformed(String),

    /// Token field is blank
    #[error("directory entry '{0}' has an empty token")]
    EmptyToken(String),

    /// ID field is not an unsigned integer
    #[error("directory entry '{0}' has a non-numeric id")]
    InvalidId(String),

    /// Role field is not a known role
    #[error("directory entry '{entry}': {reason}")]
    InvalidRole {
        /// The offending entry
        entry: String,
        /// Why the role was rejected
        reason: String,
    },
}

/// Directory backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    callers: HashMap<String, Caller>,
}

impl StaticDirectory {
    /// Creates an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a token
    #[must_use]
    pub fn with_caller(mut self, token: impl Into<String>, caller: Caller) -> Self {
        self.callers.insert(token.into(), caller);
        self
    }

    /// Parses `token:id:role[,token:id:role...]`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryParseError`] for the first malformed entry.
    pub fn parse(entries: &str) -> Result<Self, DirectoryParseError> {
        entries
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .try_fold(Self::new(), |directory, entry| {
                let mut parts = entry.splitn(3, ':');
                let (Some(token), Some(id), Some(role)) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(DirectoryParseError::Malformed(entry.to_string()));
                };
                if token.is_empty() {
                    return Err(DirectoryParseError::EmptyToken(entry.to_string()));
                }
                let id: u64 = id
                    .parse()
                    .map_err(|_| DirectoryParseError::InvalidId(entry.to_string()))?;
                let role: Role = role
                    .parse()
                    .map_err(|reason| DirectoryParseError::InvalidRole {
                        entry: entry.to_string(),
                        reason,
                    })?;
                Ok(directory.with_caller(token, Caller { id: CallerId::new(id), role }))
            })
    }

    /// Number of known tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.callers.len()
    }

    /// Whether no token is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn resolve_caller(&self, credentials: &Credentials) -> Result<Caller, DirectoryError> {
        if credentials.token().is_empty() {
            return Err(DirectoryError::MissingCredentials);
        }
        self.callers
            .get(credentials.token())
            .cloned()
            .ok_or(DirectoryError::InvalidCredentials)
    }
}
