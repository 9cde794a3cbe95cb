//! Rendering collaborator interface

use crate::anchors::{AnchorEntity, EntityId, ModelEntity};
use nalgebra::Matrix4;
use std::fmt;

/// Scene-graph errors
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The visual asset for a new anchor could not be loaded
    AssetLoadFailed { asset: String, reason: String },
    /// No container with this id exists in the scene
    UnknownEntity { id: EntityId },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::AssetLoadFailed { asset, reason } => {
                write!(f, "Failed to load asset '{}': {}", asset, reason)
            }
            SceneError::UnknownEntity { id } => {
                write!(f, "Unknown scene entity {}", id)
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Result type for scene-graph operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Scene graph owned by the renderer
///
/// Mutations are expected to be visible to the renderer as soon as the call
/// returns.
pub trait SceneGraph {
    /// Load a visual model by asset name
    fn load_model(&mut self, asset_name: &str) -> SceneResult<ModelEntity>;

    /// Insert a new anchor container with its children
    fn insert_anchor(&mut self, entity: &AnchorEntity);

    /// Move an existing anchor container
    fn set_anchor_transform(&mut self, id: EntityId, transform: &Matrix4<f32>) -> SceneResult<()>;

    /// Remove an anchor container and release its children
    fn remove_anchor(&mut self, id: EntityId) -> SceneResult<()>;
}
