//! One-time creation and configuration of the geospatial session

use crate::core::{CameraFrame, GeospatialFrame};
use crate::localization::LocalizationStateMachine;
use crate::session::{
    GeospatialMode, GeospatialSession, SessionConfiguration, SessionError, SessionFactory,
    SessionResult, TerrainAnchor,
};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Seed anchor placed on the terrain once the session is configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainAnchorSpec {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Height above the terrain surface (meters)
    pub altitude_above_terrain_m: f64,
    /// Facing direction clockwise from north (degrees)
    pub heading_deg: f64,
}

impl TerrainAnchorSpec {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_above_terrain_m: 0.0,
            heading_deg: 0.0,
        }
    }

    /// Orientation in the east-up-south frame expected by the session
    pub fn east_up_south_q(&self) -> UnitQuaternion<f32> {
        let angle = (180.0 - self.heading_deg).to_radians() as f32;
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
    }
}

/// Result of a session start that produced a session object
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStart {
    /// Configured; localization restarted from pretracking
    Ready { terrain_anchors: usize },
    /// Session exists but geospatial tracking is unavailable
    Unavailable(SessionError),
}

/// Owned handle to the single geospatial session
pub struct SessionHandle {
    session: Box<dyn GeospatialSession>,
    configured: bool,
    transport_failed: bool,
    terrain_anchors: Vec<TerrainAnchor>,
}

impl SessionHandle {
    fn new(session: Box<dyn GeospatialSession>) -> Self {
        Self {
            session,
            configured: false,
            transport_failed: false,
            terrain_anchors: Vec::new(),
        }
    }

    /// Ticks are only processed on a configured, healthy session
    pub fn is_ready(&self) -> bool {
        self.configured && !self.transport_failed
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn has_transport_failed(&self) -> bool {
        self.transport_failed
    }

    pub fn mark_transport_failed(&mut self) {
        self.transport_failed = true;
    }

    pub fn terrain_anchors(&self) -> &[TerrainAnchor] {
        &self.terrain_anchors
    }

    pub fn update(&mut self, camera: &CameraFrame) -> SessionResult<GeospatialFrame> {
        self.session.update(camera)
    }
}

/// Create, configure and seed a new session
///
/// Returns `Err` only when no session object could be created. Configuration
/// problems still yield a handle, so a later permission change does not try
/// again.
pub fn start_session(
    factory: &SessionFactory,
    seeds: &[TerrainAnchorSpec],
    machine: &mut LocalizationStateMachine,
    now: Duration,
) -> SessionResult<(SessionHandle, SessionStart)> {
    let session = factory().map_err(|e| {
        error!(error = %e, "failed to create geospatial session");
        machine.fail();
        e
    })?;
    let mut handle = SessionHandle::new(session);

    machine.fail();

    if !handle.session.is_geospatial_mode_supported(GeospatialMode::Enabled) {
        error!("geospatial mode is not supported on this device");
        return Ok((handle, SessionStart::Unavailable(SessionError::GeospatialModeUnsupported)));
    }

    if let Err(e) = handle.session.configure(&SessionConfiguration::default()) {
        error!(error = %e, "geospatial session configuration rejected");
        return Ok((handle, SessionStart::Unavailable(e)));
    }
    handle.configured = true;
    machine.reset(now);
    info!("geospatial session configured");

    for seed in seeds {
        match handle.session.create_anchor_on_terrain(
            seed.latitude,
            seed.longitude,
            seed.altitude_above_terrain_m,
            seed.east_up_south_q(),
        ) {
            Ok(anchor) => {
                info!(identity = %anchor.identity, state = %anchor.state, "terrain anchor requested");
                handle.terrain_anchors.push(anchor);
            }
            Err(e) => {
                warn!(error = %e, placed = handle.terrain_anchors.len(), "stopping terrain anchor seeding");
                break;
            }
        }
    }

    let placed = handle.terrain_anchors.len();
    Ok((handle, SessionStart::Ready { terrain_anchors: placed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::LocalizationState;
    use crate::session::MockGeospatialSession;

    fn factory_with(configure: impl Fn(&mut MockGeospatialSession) + Send + 'static) -> SessionFactory {
        Box::new(move || {
            let mut session = MockGeospatialSession::new();
            configure(&mut session);
            Ok(Box::new(session) as Box<dyn GeospatialSession>)
        })
    }

    fn seeds(count: usize) -> Vec<TerrainAnchorSpec> {
        (0..count)
            .map(|i| TerrainAnchorSpec::new(36.0915 + i as f64 * 0.0001, 136.2118))
            .collect()
    }

    #[test]
    fn test_successful_start_resets_to_pretracking() {
        let mut machine = LocalizationStateMachine::default();
        machine.fail();
        let (handle, start) =
            start_session(&factory_with(|_| {}), &seeds(3), &mut machine, Duration::from_secs(9)).unwrap();

        assert_eq!(start, SessionStart::Ready { terrain_anchors: 3 });
        assert!(handle.is_ready());
        assert_eq!(machine.state(), LocalizationState::Pretracking);
        assert_eq!(machine.clock().last_localizing_entry, Duration::from_secs(9));
    }

    #[test]
    fn test_unsupported_mode_keeps_handle_and_fails() {
        let mut machine = LocalizationStateMachine::default();
        let factory = factory_with(|s| s.set_geospatial_supported(false));
        let (handle, start) = start_session(&factory, &[], &mut machine, Duration::ZERO).unwrap();

        assert_eq!(start, SessionStart::Unavailable(SessionError::GeospatialModeUnsupported));
        assert!(!handle.is_ready());
        assert_eq!(machine.state(), LocalizationState::Failed);
    }

    #[test]
    fn test_rejected_configuration() {
        let mut machine = LocalizationStateMachine::default();
        let factory = factory_with(|s| s.reject_configuration(-1));
        let (handle, start) = start_session(&factory, &seeds(2), &mut machine, Duration::ZERO).unwrap();

        assert_eq!(start, SessionStart::Unavailable(SessionError::ConfigurationRejected { code: -1 }));
        assert!(handle.terrain_anchors().is_empty());
        assert_eq!(machine.state(), LocalizationState::Failed);
    }

    #[test]
    fn test_creation_failure() {
        let mut machine = LocalizationStateMachine::default();
        let factory: SessionFactory = Box::new(|| Err(SessionError::CreationFailed { code: 401 }));
        assert!(matches!(
            start_session(&factory, &[], &mut machine, Duration::ZERO),
            Err(SessionError::CreationFailed { code: 401 })
        ));
        assert_eq!(machine.state(), LocalizationState::Failed);
    }

    #[test]
    fn test_seed_failure_stops_remaining_seeds() {
        let mut machine = LocalizationStateMachine::default();
        let factory = factory_with(|s| s.fail_terrain_anchors_after(2));
        let (handle, start) = start_session(&factory, &seeds(5), &mut machine, Duration::ZERO).unwrap();

        assert_eq!(start, SessionStart::Ready { terrain_anchors: 2 });
        assert!(handle.is_ready());
        assert_eq!(machine.state(), LocalizationState::Pretracking);
    }

    #[test]
    fn test_east_up_south_orientation() {
        let facing_north = TerrainAnchorSpec::new(0.0, 0.0);
        assert!((facing_north.east_up_south_q().angle() - std::f32::consts::PI).abs() < 1e-5);

        let facing_south = TerrainAnchorSpec { heading_deg: 180.0, ..TerrainAnchorSpec::new(0.0, 0.0) };
        assert!(facing_south.east_up_south_q().angle().abs() < 1e-5);
    }
}
