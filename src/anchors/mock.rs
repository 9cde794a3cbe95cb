//! In-memory scene graph for testing and the demo binary

use crate::anchors::{AnchorEntity, EntityId, ModelEntity, SceneError, SceneGraph, SceneResult};
use nalgebra::Matrix4;
use std::collections::{BTreeMap, HashSet};

/// Scene graph that keeps anchor containers in a map
#[derive(Debug, Default)]
pub struct InMemoryScene {
    anchors: BTreeMap<EntityId, AnchorEntity>,
    missing_assets: HashSet<String>,
    failing_loads: usize,
    inserts: usize,
    transform_updates: usize,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load of `asset_name` fail
    pub fn with_missing_asset(mut self, asset_name: &str) -> Self {
        self.missing_assets.insert(asset_name.to_string());
        self
    }

    /// Fail the next `count` model loads, whatever the asset
    pub fn fail_next_loads(&mut self, count: usize) {
        self.failing_loads = count;
    }

    pub fn anchor(&self, id: EntityId) -> Option<&AnchorEntity> {
        self.anchors.get(&id)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn insert_count(&self) -> usize {
        self.inserts
    }

    pub fn transform_update_count(&self) -> usize {
        self.transform_updates
    }
}

impl SceneGraph for InMemoryScene {
    fn load_model(&mut self, asset_name: &str) -> SceneResult<ModelEntity> {
        if self.failing_loads > 0 {
            self.failing_loads -= 1;
            return Err(SceneError::AssetLoadFailed {
                asset: asset_name.to_string(),
                reason: "simulated load failure".to_string(),
            });
        }
        if self.missing_assets.contains(asset_name) {
            return Err(SceneError::AssetLoadFailed {
                asset: asset_name.to_string(),
                reason: "asset not found".to_string(),
            });
        }
        Ok(ModelEntity::new(asset_name))
    }

    fn insert_anchor(&mut self, entity: &AnchorEntity) {
        self.inserts += 1;
        self.anchors.insert(entity.id, entity.clone());
    }

    fn set_anchor_transform(&mut self, id: EntityId, transform: &Matrix4<f32>) -> SceneResult<()> {
        let anchor = self.anchors.get_mut(&id).ok_or(SceneError::UnknownEntity { id })?;
        anchor.transform = *transform;
        self.transform_updates += 1;
        Ok(())
    }

    fn remove_anchor(&mut self, id: EntityId) -> SceneResult<()> {
        self.anchors
            .remove(&id)
            .map(|_| ())
            .ok_or(SceneError::UnknownEntity { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorModelConfig;

    #[test]
    fn test_missing_asset() {
        let mut scene = InMemoryScene::new().with_missing_asset("nendan");
        assert!(matches!(scene.load_model("nendan"), Err(SceneError::AssetLoadFailed { .. })));
        assert!(scene.load_model("other").is_ok());
    }

    #[test]
    fn test_fail_next_loads() {
        let mut scene = InMemoryScene::new();
        scene.fail_next_loads(2);
        assert!(scene.load_model("nendan").is_err());
        assert!(scene.load_model("nendan").is_err());
        assert!(scene.load_model("nendan").is_ok());
    }

    #[test]
    fn test_insert_move_remove() {
        let mut scene = InMemoryScene::new();
        let model = scene.load_model("nendan").unwrap();
        let entity = AnchorEntity::assemble(
            EntityId::new(1),
            Matrix4::identity(),
            model,
            &AnchorModelConfig::default(),
        );
        scene.insert_anchor(&entity);
        assert_eq!(scene.anchor_count(), 1);

        let moved = Matrix4::new_translation(&nalgebra::Vector3::new(1.0, 0.0, -2.0));
        scene.set_anchor_transform(entity.id, &moved).unwrap();
        assert_eq!(scene.anchor(entity.id).unwrap().transform, moved);

        scene.remove_anchor(entity.id).unwrap();
        assert_eq!(scene.anchor_count(), 0);
        assert_eq!(
            scene.set_anchor_transform(entity.id, &moved),
            Err(SceneError::UnknownEntity { id: entity.id })
        );
    }
}
