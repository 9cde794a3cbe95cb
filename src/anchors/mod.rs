//! Spatial anchor lifecycle
//!
//! Keeps one renderable entity per anchor identity and pushes every creation
//! and transform change to the rendering collaborator.

pub mod entity;
pub mod scene;
pub mod registry;
pub mod mock;

pub use entity::{AnchorEntity, AnchorModelConfig, EntityId, ModelEntity, OcclusionPlane};
pub use scene::{SceneError, SceneGraph, SceneResult};
pub use registry::{AnchorRecord, AnchorRegistry, ReconcileSummary};
pub use mock::InMemoryScene;
