//! Localization state enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence level of the current geospatial pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalizationState {
    /// Earth subsystem is tracking but localization has not started
    Pretracking,
    /// Waiting for a pose accurate enough to anchor content
    Localizing,
    /// Pose is trustworthy; anchored content may be shown
    Localized,
    /// Localization gave up or the earth subsystem is in error
    Failed,
}

impl LocalizationState {
    pub fn is_localized(&self) -> bool {
        matches!(self, LocalizationState::Localized)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LocalizationState::Failed)
    }
}

impl fmt::Display for LocalizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocalizationState::Pretracking => "pretracking",
            LocalizationState::Localizing => "localizing",
            LocalizationState::Localized => "localized",
            LocalizationState::Failed => "failed",
        };
        f.write_str(name)
    }
}
