//! Hysteresis and timeout driven localization state machine

use crate::core::{
    GeospatialFrame, HEADING_ACCURACY_HIGH_THRESHOLD_DEG, HEADING_ACCURACY_LOW_THRESHOLD_DEG,
    HORIZONTAL_ACCURACY_HIGH_THRESHOLD_M, HORIZONTAL_ACCURACY_LOW_THRESHOLD_M,
    LOCALIZATION_FAILURE_TIME_S,
};
use crate::localization::LocalizationState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Accuracy bands and timeout used by the state machine
///
/// The `low` thresholds must be met to enter `Localized`; the looser `high`
/// thresholds decide when a localized pose is demoted back to `Localizing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationThresholds {
    /// Horizontal accuracy required to become localized (meters)
    pub horizontal_accuracy_low_m: f64,
    /// Horizontal accuracy band edge while localized (meters)
    pub horizontal_accuracy_high_m: f64,
    /// Heading accuracy required to become localized (degrees)
    pub heading_accuracy_low_deg: f64,
    /// Heading accuracy band edge while localized (degrees)
    pub heading_accuracy_high_deg: f64,
    /// Seconds spent localizing before the attempt is declared failed
    pub failure_timeout_s: f64,
}

impl Default for LocalizationThresholds {
    fn default() -> Self {
        Self {
            horizontal_accuracy_low_m: HORIZONTAL_ACCURACY_LOW_THRESHOLD_M,
            horizontal_accuracy_high_m: HORIZONTAL_ACCURACY_HIGH_THRESHOLD_M,
            heading_accuracy_low_deg: HEADING_ACCURACY_LOW_THRESHOLD_DEG,
            heading_accuracy_high_deg: HEADING_ACCURACY_HIGH_THRESHOLD_DEG,
            failure_timeout_s: LOCALIZATION_FAILURE_TIME_S,
        }
    }
}

impl LocalizationThresholds {
    /// Timeout as a `Duration`, saturating at `Duration::MAX`
    pub fn failure_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.failure_timeout_s.max(0.0)).unwrap_or(Duration::MAX)
    }
}

/// Time of the most recent entry into `Localizing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalizationClock {
    pub last_localizing_entry: Duration,
}

impl LocalizationClock {
    pub fn elapsed_at(&self, now: Duration) -> Duration {
        now.saturating_sub(self.last_localizing_entry)
    }
}

/// Per-tick localization classifier
#[derive(Debug, Clone)]
pub struct LocalizationStateMachine {
    state: LocalizationState,
    clock: LocalizationClock,
    thresholds: LocalizationThresholds,
}

impl LocalizationStateMachine {
    pub fn new(thresholds: LocalizationThresholds) -> Self {
        Self {
            state: LocalizationState::Pretracking,
            clock: LocalizationClock::default(),
            thresholds,
        }
    }

    pub fn state(&self) -> LocalizationState {
        self.state
    }

    pub fn clock(&self) -> LocalizationClock {
        self.clock
    }

    pub fn thresholds(&self) -> &LocalizationThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: LocalizationThresholds) {
        self.thresholds = thresholds;
    }

    /// Restart from `Pretracking` once a session has been configured
    pub fn reset(&mut self, now: Duration) {
        self.state = LocalizationState::Pretracking;
        self.clock.last_localizing_entry = now;
    }

    /// Force `Failed`, used while a session is being configured
    pub fn fail(&mut self) {
        self.state = LocalizationState::Failed;
    }

    /// Advance the state machine with one fused frame and return the new state
    ///
    /// An earth error always fails and an earth tracking report always returns
    /// to `Pretracking`. Only otherwise does the current state decide: a
    /// localized pose is demoted once its accuracy leaves the high band, and a
    /// localizing attempt fails after `failure_timeout_s` without a fix inside
    /// the low band.
    ///
    /// The `Localized` branch demotes only when the pose falls *outside* the
    /// high band. A literal "demote while inside the high band" rule would make
    /// marginal accuracy flap between the two states, which the band exists to
    /// prevent; keep it this way.
    pub fn update(&mut self, frame: &GeospatialFrame) -> LocalizationState {
        let now = frame.timestamp;
        let previous = self.state;

        let next = if !frame.earth_enabled() {
            LocalizationState::Failed
        } else if frame.earth_tracking() {
            // Kept as observed: a tracking report drops back to Pretracking.
            LocalizationState::Pretracking
        } else {
            match self.state {
                LocalizationState::Pretracking => {
                    self.clock.last_localizing_entry = now;
                    LocalizationState::Localizing
                }
                LocalizationState::Localizing => {
                    let t = &self.thresholds;
                    let confident = frame.transform.as_ref().map_or(false, |g| {
                        g.is_within(t.horizontal_accuracy_low_m, t.heading_accuracy_low_deg)
                    });
                    if confident {
                        LocalizationState::Localized
                    } else if self.clock.elapsed_at(now).as_secs_f64() >= t.failure_timeout_s {
                        LocalizationState::Failed
                    } else {
                        LocalizationState::Localizing
                    }
                }
                LocalizationState::Localized => {
                    let t = &self.thresholds;
                    let degraded = frame.transform.as_ref().map_or(false, |g| {
                        !g.is_within(t.horizontal_accuracy_high_m, t.heading_accuracy_high_deg)
                    });
                    if degraded {
                        self.clock.last_localizing_entry = now;
                        LocalizationState::Localizing
                    } else {
                        LocalizationState::Localized
                    }
                }
                // Only an earth tracking report leaves Failed.
                LocalizationState::Failed => LocalizationState::Failed,
            }
        };

        if next != previous {
            info!(from = %previous, to = %next, at_s = now.as_secs_f64(), "localization state changed");
        } else {
            debug!(state = %next, "localization state unchanged");
        }
        self.state = next;
        next
    }
}

impl Default for LocalizationStateMachine {
    fn default() -> Self {
        Self::new(LocalizationThresholds::default())
    }
}
