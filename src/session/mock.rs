//! Scripted geospatial session for testing and development

use crate::core::{AnchorObservation, CameraFrame, EarthTrackingState, GeospatialFrame};
use crate::session::{
    GeospatialMode, GeospatialSession, SessionConfiguration, SessionError, SessionResult,
    TerrainAnchor, TerrainAnchorState,
};
use nalgebra::{Matrix4, UnitQuaternion};
use std::collections::VecDeque;
use uuid::Uuid;

/// Mock session that replays queued frames
///
/// Every `update` pops the next scripted frame and stamps it with the camera
/// timestamp. An empty queue yields an idle frame so the clock still runs.
pub struct MockGeospatialSession {
    script: VecDeque<SessionResult<GeospatialFrame>>,
    geospatial_supported: bool,
    reject_configuration: Option<i32>,
    configuration: Option<SessionConfiguration>,
    terrain_anchors: Vec<(Uuid, f64, f64)>,
    fail_terrain_after: Option<usize>,
    simulate_errors: bool,
    error_probability: f32,
    updates: u32,
}

impl MockGeospatialSession {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            geospatial_supported: true,
            reject_configuration: None,
            configuration: None,
            terrain_anchors: Vec::new(),
            fail_terrain_after: None,
            simulate_errors: false,
            error_probability: 0.0,
            updates: 0,
        }
    }

    /// Queue a frame for a later tick
    pub fn push_frame(&mut self, frame: GeospatialFrame) {
        self.script.push_back(Ok(frame));
    }

    /// Queue a fusion failure for a later tick
    pub fn push_fusion_error(&mut self, details: &str) {
        self.script.push_back(Err(SessionError::FusionFailed {
            details: details.to_string(),
        }));
    }

    pub fn set_geospatial_supported(&mut self, supported: bool) {
        self.geospatial_supported = supported;
    }

    pub fn reject_configuration(&mut self, code: i32) {
        self.reject_configuration = Some(code);
    }

    /// Let `count` terrain anchors succeed, then fail the rest
    pub fn fail_terrain_anchors_after(&mut self, count: usize) {
        self.fail_terrain_after = Some(count);
    }

    /// Enable random fusion failures with given probability (0.0 to 1.0)
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    pub fn configuration(&self) -> Option<&SessionConfiguration> {
        self.configuration.as_ref()
    }

    pub fn terrain_anchor_count(&self) -> usize {
        self.terrain_anchors.len()
    }

    pub fn queued_frame_count(&self) -> usize {
        self.script.len()
    }

    pub fn update_count(&self) -> u32 {
        self.updates
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }

    /// Seed terrain anchors surface as tracked observations in every frame
    fn terrain_observations(&self) -> Vec<AnchorObservation> {
        self.terrain_anchors
            .iter()
            .enumerate()
            .map(|(i, (id, _, _))| {
                let offset = nalgebra::Vector3::new(i as f32, 0.0, -(i as f32));
                AnchorObservation::tracked(*id, Matrix4::new_translation(&offset))
            })
            .collect()
    }
}

impl Default for MockGeospatialSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GeospatialSession for MockGeospatialSession {
    fn is_geospatial_mode_supported(&self, mode: GeospatialMode) -> bool {
        match mode {
            GeospatialMode::Disabled => true,
            GeospatialMode::Enabled => self.geospatial_supported,
        }
    }

    fn configure(&mut self, configuration: &SessionConfiguration) -> SessionResult<()> {
        if let Some(code) = self.reject_configuration {
            return Err(SessionError::ConfigurationRejected { code });
        }
        self.configuration = Some(configuration.clone());
        Ok(())
    }

    fn update(&mut self, camera: &CameraFrame) -> SessionResult<GeospatialFrame> {
        self.updates += 1;

        if self.should_simulate_error() {
            return Err(SessionError::FusionFailed {
                details: "simulated fusion failure".to_string(),
            });
        }

        let mut frame = match self.script.pop_front() {
            Some(scripted) => scripted?,
            None => GeospatialFrame::new(camera.timestamp).with_tracking_state(EarthTrackingState::Paused),
        };
        frame.timestamp = camera.timestamp;
        frame.anchors.extend(self.terrain_observations());
        Ok(frame)
    }

    fn create_anchor_on_terrain(
        &mut self,
        latitude: f64,
        longitude: f64,
        _altitude_above_terrain_m: f64,
        _east_up_south_q: UnitQuaternion<f32>,
    ) -> SessionResult<TerrainAnchor> {
        if self.configuration.is_none() {
            return Err(SessionError::NoSession);
        }
        if let Some(limit) = self.fail_terrain_after {
            if self.terrain_anchors.len() >= limit {
                return Err(SessionError::TerrainAnchorFailed {
                    details: format!("unsupported location {:.6}, {:.6}", latitude, longitude),
                });
            }
        }

        let identity = Uuid::new_v4();
        self.terrain_anchors.push((identity, latitude, longitude));
        Ok(TerrainAnchor {
            identity,
            state: TerrainAnchorState::TaskInProgress,
        })
    }
}
