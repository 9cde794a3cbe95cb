//! Session error types and recovery classification

use std::fmt;

/// Errors raised by the geospatial session or while starting it
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Device cannot run geospatial mode
    GeospatialModeUnsupported,
    /// Session configuration was rejected
    ConfigurationRejected { code: i32 },
    /// Session object could not be created
    CreationFailed { code: i32 },
    /// No fused frame could be produced for this tick
    FusionFailed { details: String },
    /// A seed terrain anchor could not be placed
    TerrainAnchorFailed { details: String },
    /// Underlying tracking session reported a hard failure
    TransportFailure {
        description: String,
        failure_reason: Option<String>,
        recovery_suggestion: Option<String>,
    },
    /// Operation needs a session that does not exist
    NoSession,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::GeospatialModeUnsupported => {
                write!(f, "Geospatial mode is not supported on this device")
            }
            SessionError::ConfigurationRejected { code } => {
                write!(f, "Failed to configure session: {}", code)
            }
            SessionError::CreationFailed { code } => {
                write!(f, "Failed to create session: {}", code)
            }
            SessionError::FusionFailed { details } => {
                write!(f, "Frame fusion failed: {}", details)
            }
            SessionError::TerrainAnchorFailed { details } => {
                write!(f, "Terrain anchor failed: {}", details)
            }
            SessionError::TransportFailure { description, .. } => {
                write!(f, "Tracking session failed: {}", description)
            }
            SessionError::NoSession => write!(f, "No geospatial session"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Broad error families, each with one fixed handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Fusion,
    Asset,
    Transport,
}

/// What the system does after an error of a given class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Feature unavailable until relaunch
    Fail,
    /// Drop this tick, keep localization state
    SkipTick,
    /// Drop this observation, keep processing the tick
    SkipObservation,
    /// Show a one-shot alert; no automatic restart
    AlertUser,
}

impl ErrorClass {
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            ErrorClass::Configuration => RecoveryStrategy::Fail,
            ErrorClass::Fusion => RecoveryStrategy::SkipTick,
            ErrorClass::Asset => RecoveryStrategy::SkipObservation,
            ErrorClass::Transport => RecoveryStrategy::AlertUser,
        }
    }
}

impl SessionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SessionError::GeospatialModeUnsupported
            | SessionError::ConfigurationRejected { .. }
            | SessionError::CreationFailed { .. }
            | SessionError::NoSession => ErrorClass::Configuration,
            SessionError::FusionFailed { .. } => ErrorClass::Fusion,
            SessionError::TerrainAnchorFailed { .. } => ErrorClass::Asset,
            SessionError::TransportFailure { .. } => ErrorClass::Transport,
        }
    }

    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        self.class().recovery_strategy()
    }

    /// Check if processing can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.recovery_strategy(),
            RecoveryStrategy::SkipTick | RecoveryStrategy::SkipObservation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_strategies() {
        assert_eq!(SessionError::GeospatialModeUnsupported.recovery_strategy(), RecoveryStrategy::Fail);
        assert_eq!(
            SessionError::FusionFailed { details: "x".into() }.recovery_strategy(),
            RecoveryStrategy::SkipTick
        );
        let transport = SessionError::TransportFailure {
            description: "camera unavailable".into(),
            failure_reason: None,
            recovery_suggestion: None,
        };
        assert_eq!(transport.recovery_strategy(), RecoveryStrategy::AlertUser);
        assert!(!transport.is_recoverable());
        assert!(SessionError::FusionFailed { details: "x".into() }.is_recoverable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SessionError::ConfigurationRejected { code: -3 }.to_string(),
            "Failed to configure session: -3"
        );
    }
}
