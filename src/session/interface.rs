//! Capability trait for the vendor geospatial session

use crate::core::{CameraFrame, GeospatialFrame};
use crate::session::SessionResult;
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Geospatial feature switch for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeospatialMode {
    Disabled,
    Enabled,
}

/// Session settings applied once after creation
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfiguration {
    pub geospatial_mode: GeospatialMode,
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            geospatial_mode: GeospatialMode::Enabled,
        }
    }
}

/// Resolution state of an anchor placed relative to terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainAnchorState {
    None,
    Success,
    ErrorInternal,
    TaskInProgress,
    ErrorNotAuthorized,
    ErrorUnsupportedLocation,
}

impl fmt::Display for TerrainAnchorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerrainAnchorState::None => "None",
            TerrainAnchorState::Success => "Success",
            TerrainAnchorState::ErrorInternal => "ErrorInternal",
            TerrainAnchorState::TaskInProgress => "TaskInProgress",
            TerrainAnchorState::ErrorNotAuthorized => "ErrorNotAuthorized",
            TerrainAnchorState::ErrorUnsupportedLocation => "UnsupportedLocation",
        };
        f.write_str(name)
    }
}

/// Anchor returned by the session when placed on terrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainAnchor {
    pub identity: Uuid,
    pub state: TerrainAnchorState,
}

/// The only session capabilities the tracking core relies on
pub trait GeospatialSession: Send {
    /// Check whether the device supports a geospatial mode
    fn is_geospatial_mode_supported(&self, mode: GeospatialMode) -> bool;

    /// Apply the session configuration
    fn configure(&mut self, configuration: &SessionConfiguration) -> SessionResult<()>;

    /// Fuse one camera frame into a geospatial frame
    fn update(&mut self, camera: &CameraFrame) -> SessionResult<GeospatialFrame>;

    /// Place an anchor at a coordinate, relative to the terrain surface
    fn create_anchor_on_terrain(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude_above_terrain_m: f64,
        east_up_south_q: UnitQuaternion<f32>,
    ) -> SessionResult<TerrainAnchor>;
}

/// Creates a new session on demand
pub type SessionFactory = Box<dyn Fn() -> SessionResult<Box<dyn GeospatialSession>> + Send>;
