//! Bearer session for the current login.
//!
//! Held in memory for the life of the client; nothing is persisted. Callers
//! that want a session to outlive the process hand the token back in
//! themselves (the CLI does this through environment variables).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::error::ApiError;
use crate::types::LoginResponse;

/// Credentials and role for a logged-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to every inventory request.
    pub access: String,
    /// Refresh token, when the backend issued one at login.
    pub refresh: Option<String>,
    /// Whether this account may manage inventory.
    pub is_admin: bool,
}

impl Session {
    /// Session from a bare token, e.g. one carried over from a previous run.
    #[must_use]
    pub fn new(access: impl Into<String>, is_admin: bool) -> Self {
        Self {
            access: access.into(),
            refresh: None,
            is_admin,
        }
    }

    /// Render the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }

    /// Refuse a management action on a non-admin session.
    ///
    /// The backend stays authoritative (restock returns 403 regardless);
    /// this guard reproduces the client-side gate so non-admins get the
    /// same flat message without a round-trip.
    ///
    /// # Errors
    ///
    /// [`ApiError::AdminRequired`] when the session is not an admin one.
    pub fn require_admin(&self, action: &'static str) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ApiError::AdminRequired(action))
        }
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            access: response.access,
            refresh: response.refresh,
            is_admin: response.is_admin,
        }
    }
}
