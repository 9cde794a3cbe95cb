//! Geospatial session abstraction
//!
//! This module hides the vendor SDK behind a narrow capability trait and
//! owns the steps needed to start a session: location permission, session
//! creation, configuration and seed terrain anchors.

pub mod interface;
pub mod setup;
pub mod permission;
pub mod mock;
pub mod error;

pub use interface::{
    GeospatialMode, GeospatialSession, SessionConfiguration, SessionFactory, TerrainAnchor,
    TerrainAnchorState,
};
pub use setup::{start_session, SessionHandle, SessionStart, TerrainAnchorSpec};
pub use permission::{
    AccuracyAuthorization, AuthorizationStatus, GateDecision, LocationAuthorizer,
    MockLocationAuthorizer, PermissionGate,
};
pub use mock::MockGeospatialSession;
pub use error::{ErrorClass, RecoveryStrategy, SessionError, SessionResult};
