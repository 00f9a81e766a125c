//! UI preference domain models.
//!
//! Contains the small set of preferences that persist across sessions.
//! Ephemeral presentation state (sidebar visibility, widget position)
//! never reaches this layer.

use serde::{Deserialize, Serialize};

/// Color theme of the embedding widget. Only the theme choice is
/// persisted; everything else about presentation is session-local.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Maps from the persisted boolean flag (`dark_mode`).
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    /// Maps to the persisted boolean flag (`dark_mode`).
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_round_trips_through_flag() {
        assert_eq!(Theme::from_dark_flag(true), Theme::Dark);
        assert_eq!(Theme::from_dark_flag(false), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::default().is_dark());
    }
}
