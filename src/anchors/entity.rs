//! Renderable entity types placed under each anchor

use crate::core::DEFAULT_ANCHOR_MODEL;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scene-graph handle for an anchor container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// How the visual model and its occlusion surface are built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorModelConfig {
    /// Asset name of the visual model
    pub asset_name: String,
    /// Uniform scale applied to the model
    pub scale: f32,
    /// Model lift above the anchor origin (meters)
    pub offset_y_m: f32,
    /// Occlusion plane width (meters)
    pub occlusion_width_m: f32,
    /// Occlusion plane depth (meters)
    pub occlusion_depth_m: f32,
}

impl Default for AnchorModelConfig {
    fn default() -> Self {
        Self {
            asset_name: DEFAULT_ANCHOR_MODEL.to_string(),
            scale: 1.0,
            offset_y_m: 0.015,
            occlusion_width_m: 2.0,
            occlusion_depth_m: 2.0,
        }
    }
}

/// Collision-enabled surface that hides virtual content behind real ground
#[derive(Debug, Clone, PartialEq)]
pub struct OcclusionPlane {
    pub width_m: f32,
    pub depth_m: f32,
    pub collision_shape: bool,
    pub static_body: bool,
}

impl OcclusionPlane {
    pub fn new(width_m: f32, depth_m: f32) -> Self {
        Self {
            width_m,
            depth_m,
            collision_shape: true,
            static_body: true,
        }
    }
}

/// Loaded visual model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntity {
    pub asset_name: String,
    pub scale: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl ModelEntity {
    pub fn new(asset_name: &str) -> Self {
        Self {
            asset_name: asset_name.to_string(),
            scale: Vector3::repeat(1.0),
            position: Vector3::zeros(),
        }
    }
}

/// World-anchored container holding the occlusion plane and the model
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorEntity {
    pub id: EntityId,
    pub transform: Matrix4<f32>,
    pub occlusion: OcclusionPlane,
    pub model: ModelEntity,
}

impl AnchorEntity {
    /// Assemble a container from a freshly loaded model
    pub fn assemble(
        id: EntityId,
        transform: Matrix4<f32>,
        mut model: ModelEntity,
        config: &AnchorModelConfig,
    ) -> Self {
        model.scale = Vector3::repeat(config.scale);
        model.position = Vector3::new(0.0, config.offset_y_m, 0.0);
        Self {
            id,
            transform,
            occlusion: OcclusionPlane::new(config.occlusion_width_m, config.occlusion_depth_m),
            model,
        }
    }
}
