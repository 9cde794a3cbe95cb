//! Core data types delivered by the geospatial frame source

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Health of the geospatial (earth) subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarthState {
    Enabled,
    ErrorInternal,
    ErrorNotAuthorized,
    ErrorResourceExhausted,
    ErrorGeospatialModeDisabled,
    ErrorApkVersionTooOld,
}

impl EarthState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, EarthState::Enabled)
    }

    /// Error code shown to the user
    pub fn code(&self) -> &'static str {
        match self {
            EarthState::Enabled => "ENABLED",
            EarthState::ErrorInternal => "ERROR_INTERNAL",
            EarthState::ErrorNotAuthorized => "ERROR_NOT_AUTHORIZED",
            EarthState::ErrorResourceExhausted => "ERROR_RESOURCE_EXHAUSTED",
            EarthState::ErrorGeospatialModeDisabled => "ERROR_GEOSPATIAL_MODE_DISABLED",
            EarthState::ErrorApkVersionTooOld => "ERROR_APK_VERSION_TOO_OLD",
        }
    }
}

impl fmt::Display for EarthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Tracking state reported by the earth subsystem or by a single anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarthTrackingState {
    Tracking,
    Paused,
    Stopped,
}

impl EarthTrackingState {
    pub fn is_tracking(&self) -> bool {
        matches!(self, EarthTrackingState::Tracking)
    }
}

/// Camera pose in geodetic terms, with per-axis accuracy estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeospatialTransform {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above the WGS84 ellipsoid (meters)
    pub altitude: f64,
    /// Horizontal accuracy radius (meters)
    pub horizontal_accuracy: f64,
    /// Vertical accuracy (meters)
    pub vertical_accuracy: f64,
    /// Heading clockwise from north, in [0, 360)
    pub heading: f64,
    /// Heading accuracy (degrees)
    pub heading_accuracy: f64,
}

impl GeospatialTransform {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            horizontal_accuracy: f64::INFINITY,
            vertical_accuracy: f64::INFINITY,
            heading: 0.0,
            heading_accuracy: f64::INFINITY,
        }
    }

    pub fn with_accuracy(mut self, horizontal_m: f64, vertical_m: f64) -> Self {
        self.horizontal_accuracy = horizontal_m;
        self.vertical_accuracy = vertical_m;
        self
    }

    pub fn with_heading(mut self, heading_deg: f64, heading_accuracy_deg: f64) -> Self {
        self.heading = heading_deg;
        self.heading_accuracy = heading_accuracy_deg;
        self
    }

    /// True when both horizontal and heading accuracy are within the given limits
    pub fn is_within(&self, max_horizontal_m: f64, max_heading_deg: f64) -> bool {
        self.horizontal_accuracy <= max_horizontal_m && self.heading_accuracy <= max_heading_deg
    }
}

/// One spatial anchor as seen in the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorObservation {
    pub identity: Uuid,
    pub transform: Matrix4<f32>,
    pub tracking: bool,
}

impl AnchorObservation {
    pub fn tracked(identity: Uuid, transform: Matrix4<f32>) -> Self {
        Self { identity, transform, tracking: true }
    }

    pub fn untracked(identity: Uuid, transform: Matrix4<f32>) -> Self {
        Self { identity, transform, tracking: false }
    }
}

/// Camera frame handed to the geospatial session for fusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Monotonic capture time
    pub timestamp: Duration,
}

impl CameraFrame {
    pub fn at(timestamp: Duration) -> Self {
        Self { timestamp }
    }

    pub fn at_secs(seconds: f64) -> Self {
        Self { timestamp: Duration::from_secs_f64(seconds) }
    }
}

/// Fused frame produced once per tick
#[derive(Debug, Clone, PartialEq)]
pub struct GeospatialFrame {
    /// Monotonic capture time of the underlying camera frame
    pub timestamp: Duration,
    pub earth_state: EarthState,
    pub tracking_state: EarthTrackingState,
    /// Present only when a pose estimate exists
    pub transform: Option<GeospatialTransform>,
    pub anchors: Vec<AnchorObservation>,
}

impl GeospatialFrame {
    /// Frame with an enabled earth subsystem that is not tracking and has no pose
    pub fn new(timestamp: Duration) -> Self {
        Self {
            timestamp,
            earth_state: EarthState::Enabled,
            tracking_state: EarthTrackingState::Stopped,
            transform: None,
            anchors: Vec::new(),
        }
    }

    pub fn at_secs(seconds: f64) -> Self {
        Self::new(Duration::from_secs_f64(seconds))
    }

    pub fn with_earth_state(mut self, state: EarthState) -> Self {
        self.earth_state = state;
        self
    }

    pub fn with_tracking_state(mut self, state: EarthTrackingState) -> Self {
        self.tracking_state = state;
        self
    }

    pub fn with_transform(mut self, transform: GeospatialTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorObservation) -> Self {
        self.anchors.push(anchor);
        self
    }

    /// False if the geospatial subsystem reports any error state
    pub fn earth_enabled(&self) -> bool {
        self.earth_state.is_enabled()
    }

    /// Whether the geospatial subsystem currently reports active tracking
    pub fn earth_tracking(&self) -> bool {
        self.tracking_state.is_tracking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_flags() {
        let frame = GeospatialFrame::at_secs(1.0);
        assert!(frame.earth_enabled());
        assert!(!frame.earth_tracking());

        let frame = frame
            .with_earth_state(EarthState::ErrorNotAuthorized)
            .with_tracking_state(EarthTrackingState::Tracking);
        assert!(!frame.earth_enabled());
        assert!(frame.earth_tracking());
        assert_eq!(frame.earth_state.code(), "ERROR_NOT_AUTHORIZED");
    }

    #[test]
    fn test_transform_accuracy_limits() {
        let transform = GeospatialTransform::new(36.09, 136.21, 12.0)
            .with_accuracy(10.0, 3.0)
            .with_heading(90.0, 15.0);
        assert!(transform.is_within(10.0, 15.0));
        assert!(!transform.is_within(9.99, 15.0));
        assert!(!transform.is_within(10.0, 14.0));

        // Fresh transforms carry no usable accuracy
        assert!(!GeospatialTransform::new(0.0, 0.0, 0.0).is_within(1000.0, 360.0));
    }
}
