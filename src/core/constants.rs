//! Localization thresholds and fixed user-facing strings

/// Horizontal accuracy required to enter the localized state (meters)
pub const HORIZONTAL_ACCURACY_LOW_THRESHOLD_M: f64 = 10.0;
/// Horizontal accuracy tolerated while staying localized (meters)
pub const HORIZONTAL_ACCURACY_HIGH_THRESHOLD_M: f64 = 20.0;
/// Heading accuracy required to enter the localized state (degrees)
pub const HEADING_ACCURACY_LOW_THRESHOLD_DEG: f64 = 15.0;
/// Heading accuracy tolerated while staying localized (degrees)
pub const HEADING_ACCURACY_HIGH_THRESHOLD_DEG: f64 = 25.0;

/// Time allowed in the localizing state before giving up (seconds)
pub const LOCALIZATION_FAILURE_TIME_S: f64 = 3.0 * 60.0;

pub const LOCALIZATION_TIP: &str = "Point your camera at buildings, stores, and signs near you.";
pub const LOCALIZATION_FAILURE_MESSAGE: &str =
    "Localization not possible.\nClose and open the app to restart.";
pub const NOT_TRACKING_MESSAGE: &str = "Not tracking.";

pub const SESSION_FAILED_TITLE: &str = "The AR session failed.";
pub const RESTART_SESSION_ACTION: &str = "Restart Session";

/// Storage key reserved for persisting anchors across sessions (unused)
pub const SAVED_ANCHORS_KEY: &str = "anchors";

/// Visual model attached to every materialized anchor
pub const DEFAULT_ANCHOR_MODEL: &str = "nendan";
