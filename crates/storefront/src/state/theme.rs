//! Theme slice: light/dark mode.

use serde::{Deserialize, Serialize};

/// Visual theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// The other mode.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Theme slice state. Defaults to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    /// Active mode.
    pub mode: ThemeMode,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
        }
    }
}

/// Actions understood by the theme reducer.
#[derive(Debug, Clone)]
pub enum ThemeAction {
    /// Flip between light and dark.
    Toggle,
    /// Set an explicit mode.
    Set(ThemeMode),
    /// Wholesale replacement, used only by hydration.
    Replace(ThemeState),
}

/// Pure state transition for the theme slice.
#[must_use]
pub fn reduce(state: &ThemeState, action: &ThemeAction) -> ThemeState {
    match action {
        ThemeAction::Toggle => ThemeState {
            mode: state.mode.flipped(),
        },
        ThemeAction::Set(mode) => ThemeState { mode: *mode },
        ThemeAction::Replace(next) => *next,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        assert_eq!(ThemeState::default().mode, ThemeMode::Dark);
    }

    #[test]
    fn test_toggle_flips_both_ways() {
        let state = reduce(&ThemeState::default(), &ThemeAction::Toggle);
        assert_eq!(state.mode, ThemeMode::Light);
        let state = reduce(&state, &ThemeAction::Toggle);
        assert_eq!(state.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_set_explicit_mode() {
        let state = reduce(&ThemeState::default(), &ThemeAction::Set(ThemeMode::Light));
        assert_eq!(state.mode, ThemeMode::Light);
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let json = serde_json::to_string(&ThemeState::default()).unwrap();
        assert_eq!(json, r#"{"mode":"dark"}"#);
    }
}
