//! Identity-keyed registry of renderable anchors
//!
//! Records are created once per identity and never evicted while the session
//! lives; anchors that stop tracking are skipped, not removed. Every
//! renderable is released together in [`AnchorRegistry::teardown`].

use crate::anchors::{AnchorEntity, AnchorModelConfig, EntityId, SceneError, SceneGraph};
use crate::core::AnchorObservation;
use nalgebra::Matrix4;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Renderable state kept for one anchor identity
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRecord {
    pub identity: Uuid,
    pub last_transform: Matrix4<f32>,
    pub entity: AnchorEntity,
}

/// What one reconciliation pass did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconcileSummary {
    /// Identities materialized for the first time
    pub created: Vec<Uuid>,
    /// Identities whose transform was refreshed
    pub updated: Vec<Uuid>,
    /// Observations ignored because the anchor was not tracking
    pub skipped_untracked: usize,
    /// Observations whose renderable could not be built
    pub failed: Vec<(Uuid, SceneError)>,
}

/// Registry mapping anchor identity to its renderable record
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    records: HashMap<Uuid, AnchorRecord>,
    model: AnchorModelConfig,
    next_entity_id: u64,
}

impl AnchorRegistry {
    pub fn new(model: AnchorModelConfig) -> Self {
        Self {
            records: HashMap::new(),
            model,
            next_entity_id: 0,
        }
    }

    /// Bring the scene in line with this tick's anchor observations
    pub fn reconcile(
        &mut self,
        observations: &[AnchorObservation],
        scene: &mut dyn SceneGraph,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for observation in observations {
            if !observation.tracking {
                summary.skipped_untracked += 1;
                continue;
            }

            if let Some(record) = self.records.get_mut(&observation.identity) {
                record.last_transform = observation.transform;
                record.entity.transform = observation.transform;
                if let Err(e) = scene.set_anchor_transform(record.entity.id, &observation.transform) {
                    warn!(identity = %observation.identity, error = %e, "anchor container missing from scene");
                }
                debug!(identity = %observation.identity, "anchor transform updated");
                summary.updated.push(observation.identity);
                continue;
            }

            match self.materialize(observation, scene) {
                Ok(record) => {
                    info!(identity = %observation.identity, entity = %record.entity.id, "anchor materialized");
                    self.records.insert(observation.identity, record);
                    summary.created.push(observation.identity);
                }
                Err(e) => {
                    warn!(identity = %observation.identity, error = %e, "skipping anchor this tick");
                    summary.failed.push((observation.identity, e));
                }
            }
        }

        summary
    }

    fn materialize(
        &mut self,
        observation: &AnchorObservation,
        scene: &mut dyn SceneGraph,
    ) -> Result<AnchorRecord, SceneError> {
        let model = scene.load_model(&self.model.asset_name)?;

        self.next_entity_id += 1;
        let entity = AnchorEntity::assemble(
            EntityId::new(self.next_entity_id),
            observation.transform,
            model,
            &self.model,
        );
        scene.insert_anchor(&entity);

        Ok(AnchorRecord {
            identity: observation.identity,
            last_transform: observation.transform,
            entity,
        })
    }

    pub fn get(&self, identity: &Uuid) -> Option<&AnchorRecord> {
        self.records.get(identity)
    }

    pub fn contains(&self, identity: &Uuid) -> bool {
        self.records.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &Uuid> {
        self.records.keys()
    }

    pub fn model_config(&self) -> &AnchorModelConfig {
        &self.model
    }

    /// Remove every container from the scene and drop all records
    pub fn teardown(self, scene: &mut dyn SceneGraph) {
        let count = self.records.len();
        for record in self.records.into_values() {
            if let Err(e) = scene.remove_anchor(record.entity.id) {
                warn!(identity = %record.identity, error = %e, "anchor already gone at teardown");
            }
        }
        info!(released = count, "anchor registry torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::InMemoryScene;
    use nalgebra::Vector3;

    fn at(x: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, 0.0, z))
    }

    #[test]
    fn test_first_sighting_creates_record() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let id = Uuid::new_v4();

        let summary = registry.reconcile(&[AnchorObservation::tracked(id, at(1.0, 2.0))], &mut scene);
        assert_eq!(summary.created, vec![id]);
        assert_eq!(registry.len(), 1);
        assert_eq!(scene.anchor_count(), 1);

        let record = registry.get(&id).unwrap();
        assert_eq!(record.last_transform, at(1.0, 2.0));
        assert_eq!(record.entity.model.asset_name, "nendan");
        assert_eq!(record.entity.model.position, Vector3::new(0.0, 0.015, 0.0));
        assert!(record.entity.occlusion.collision_shape);
        assert_eq!(scene.anchor(record.entity.id).unwrap().transform, at(1.0, 2.0));
    }

    #[test]
    fn test_untracked_observations_are_skipped() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let id = Uuid::new_v4();

        let summary = registry.reconcile(&[AnchorObservation::untracked(id, at(0.0, 0.0))], &mut scene);
        assert_eq!(summary.skipped_untracked, 1);
        assert!(registry.is_empty());
        assert_eq!(scene.insert_count(), 0);
    }

    #[test]
    fn test_known_identity_updates_without_reallocating() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let id = Uuid::new_v4();

        registry.reconcile(&[AnchorObservation::tracked(id, at(0.0, 0.0))], &mut scene);
        let entity_id = registry.get(&id).unwrap().entity.id;

        let summary = registry.reconcile(&[AnchorObservation::tracked(id, at(3.0, 4.0))], &mut scene);
        assert_eq!(summary.updated, vec![id]);
        assert_eq!(scene.insert_count(), 1);
        assert_eq!(registry.get(&id).unwrap().entity.id, entity_id);
        assert_eq!(registry.get(&id).unwrap().last_transform, at(3.0, 4.0));
        assert_eq!(scene.anchor(entity_id).unwrap().transform, at(3.0, 4.0));
    }

    #[test]
    fn test_same_observation_twice_in_one_tick() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let id = Uuid::new_v4();
        let observation = AnchorObservation::tracked(id, at(5.0, 5.0));

        registry.reconcile(&[observation.clone(), observation], &mut scene);
        assert_eq!(registry.len(), 1);
        assert_eq!(scene.anchor_count(), 1);
        assert_eq!(registry.get(&id).unwrap().last_transform, at(5.0, 5.0));
    }

    #[test]
    fn test_latest_observation_wins_within_tick() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let id = Uuid::new_v4();

        registry.reconcile(
            &[AnchorObservation::tracked(id, at(1.0, 1.0)), AnchorObservation::tracked(id, at(2.0, 2.0))],
            &mut scene,
        );
        assert_eq!(registry.get(&id).unwrap().last_transform, at(2.0, 2.0));
    }

    #[test]
    fn test_asset_failure_skips_only_that_observation() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        scene.fail_next_loads(1);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let summary = registry.reconcile(
            &[AnchorObservation::tracked(first, at(0.0, 0.0)), AnchorObservation::tracked(second, at(1.0, 0.0))],
            &mut scene,
        );
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, first);
        assert_eq!(summary.created, vec![second]);
        assert!(!registry.contains(&first));
        assert!(registry.contains(&second));

        // A later sighting of the same identity gets another chance
        let summary = registry.reconcile(&[AnchorObservation::tracked(first, at(0.0, 0.0))], &mut scene);
        assert_eq!(summary.created, vec![first]);
    }

    #[test]
    fn test_registry_never_shrinks() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut last_len = 0;

        for tick in 0..10 {
            let observations: Vec<AnchorObservation> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| AnchorObservation {
                    identity: *id,
                    transform: at(i as f32, tick as f32),
                    tracking: (tick + i) % 3 != 0,
                })
                .collect();
            registry.reconcile(&observations, &mut scene);
            assert!(registry.len() >= last_len);
            last_len = registry.len();
        }
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_teardown_releases_every_container() {
        let mut registry = AnchorRegistry::default();
        let mut scene = InMemoryScene::new();
        let observations: Vec<AnchorObservation> =
            (0..3).map(|i| AnchorObservation::tracked(Uuid::new_v4(), at(i as f32, 0.0))).collect();
        registry.reconcile(&observations, &mut scene);
        assert_eq!(scene.anchor_count(), 3);

        registry.teardown(&mut scene);
        assert_eq!(scene.anchor_count(), 0);
    }
}
