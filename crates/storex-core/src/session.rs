//! # Session Context
//!
//! The acting-user context passed explicitly into coordinator operations.
//!
//! The session is a plain value, not a process-wide singleton: callers
//! construct one at login and thread it through checkout/void calls. This
//! keeps sale attribution testable and free of hidden global state.

use serde::{Deserialize, Serialize};

/// The acting user for a terminal session.
///
/// Carries sale attribution only; authentication and login flow live
/// outside the transaction core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Id of the logged-in cashier, written to each sale's `user_id`.
    pub user_id: String,

    /// Display name, for status lines and logs.
    pub username: String,
}

impl Session {
    /// Creates a session for the given user.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Session {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_carries_attribution() {
        let session = Session::new("u-42", "dina");
        assert_eq!(session.user_id, "u-42");
        assert_eq!(session.username, "dina");
    }
}
