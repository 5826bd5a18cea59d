//! Auth slice: demo-only identity.
//!
//! Login stores a trimmed display name with no credential check; this is
//! a device-local demo identity, not an account system.

use serde::{Deserialize, Serialize};

/// Auth slice state.
///
/// The reducer keeps `is_authenticated == false` and
/// `display_name == None` in lockstep; a hydrated record is taken as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Whether a demo identity is active.
    pub is_authenticated: bool,
    /// Display name for the active identity.
    pub display_name: Option<String>,
}

/// Actions understood by the auth reducer.
#[derive(Debug, Clone)]
pub enum AuthAction {
    /// Activate a demo identity with the given display name.
    Login {
        /// Name as typed; surrounding whitespace is trimmed.
        name: String,
    },
    /// Clear the identity. Cart and favorites survive a logout: state is
    /// device-local, not tied to the identity.
    Logout,
    /// Wholesale replacement, used only by hydration.
    Replace(AuthState),
}

/// Pure state transition for the auth slice.
#[must_use]
pub fn reduce(state: &AuthState, action: &AuthAction) -> AuthState {
    match action {
        AuthAction::Login { name } => AuthState {
            is_authenticated: true,
            display_name: Some(name.trim().to_string()),
        },
        AuthAction::Logout => AuthState::default(),
        AuthAction::Replace(next) => next.clone(),
    }
}
