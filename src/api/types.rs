//! Common types shared by the tracking API

use crate::anchors::ReconcileSummary;
use crate::localization::LocalizationState;
use crate::session::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a tick did not run its four steps
#[derive(Debug, Clone, PartialEq)]
pub enum TickSkipReason {
    /// No session has been created yet
    NoSession,
    /// The session exists but was never configured
    SessionNotReady,
    /// The session reported a hard failure earlier
    TransportFailed,
    /// The session could not fuse this camera frame
    Fusion(SessionError),
}

impl fmt::Display for TickSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickSkipReason::NoSession => write!(f, "no session"),
            TickSkipReason::SessionNotReady => write!(f, "session not configured"),
            TickSkipReason::TransportFailed => write!(f, "session transport failed"),
            TickSkipReason::Fusion(e) => write!(f, "{}", e),
        }
    }
}

/// Result of delivering one camera frame to the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Processed {
        state: LocalizationState,
        anchors: ReconcileSummary,
    },
    Skipped(TickSkipReason),
}

impl TickOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, TickOutcome::Processed { .. })
    }

    /// Localization state after the tick, if it was processed
    pub fn state(&self) -> Option<LocalizationState> {
        match self {
            TickOutcome::Processed { state, .. } => Some(*state),
            TickOutcome::Skipped(_) => None,
        }
    }
}

/// Consistent view of the tracker for UI readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub state: LocalizationState,
    pub tracking_text: String,
    pub status_text: String,
    /// Number of materialized anchors
    pub anchor_count: usize,
    /// Whether ticks are currently being processed
    pub session_ready: bool,
}
