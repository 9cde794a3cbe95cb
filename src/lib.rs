//! Geospatial Anchor Tracking
//!
//! Decides frame by frame whether a fused visual-inertial and geospatial pose
//! is trustworthy enough to anchor content to real-world coordinates, and
//! keeps one renderable entity per tracked anchor identity.

pub mod core;
pub mod localization;
pub mod anchors;
pub mod session;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{
    AnchorObservation, CameraFrame, EarthState, EarthTrackingState, GeospatialFrame,
    GeospatialTransform,
};
pub use localization::{LocalizationClock, LocalizationState, LocalizationStateMachine, LocalizationThresholds};
pub use anchors::{AnchorRecord, AnchorRegistry, InMemoryScene, SceneError, SceneGraph};
pub use session::{
    GeospatialSession, MockGeospatialSession, PermissionGate, SessionError, SessionFactory,
    SessionResult, TerrainAnchorSpec,
};
pub use utils::{ConfigError, ConfigurationManager, TrackerConfig};
pub use api::{
    describe, spawn_tick_loop, PresentationText, SessionAlert, SharedTracker, TickOutcome,
    TrackerSnapshot, TrackingCore, TrackingEvent,
};
