//! Channel-fed tick loop
//!
//! Frames are handed to a worker thread through a bounded channel and
//! processed strictly in arrival order. A full channel blocks the producer.

use crate::anchors::SceneGraph;
use crate::api::{SharedTracker, TickOutcome};
use crate::core::CameraFrame;
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Spawn a worker that ticks `tracker` with every frame sent to it
///
/// The worker exits once every sender has been dropped.
pub fn spawn_tick_loop<S>(tracker: SharedTracker<S>, capacity: usize) -> (SyncSender<CameraFrame>, JoinHandle<()>)
where
    S: SceneGraph + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<CameraFrame>(capacity);

    let worker = thread::spawn(move || {
        let mut processed = 0u64;
        let mut skipped = 0u64;
        for frame in rx {
            match tracker.tick(frame) {
                TickOutcome::Processed { state, .. } => {
                    processed += 1;
                    debug!(state = %state, "frame processed");
                }
                TickOutcome::Skipped(_) => skipped += 1,
            }
        }
        info!(processed, skipped, "tick loop stopped");
    });

    (tx, worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::InMemoryScene;
    use crate::api::TrackingCore;
    use crate::core::{GeospatialFrame, GeospatialTransform};
    use crate::localization::LocalizationState;
    use crate::session::{GeospatialSession, MockGeospatialSession, SessionFactory};
    use crate::utils::TrackerConfig;

    #[test]
    fn test_frames_processed_in_order() {
        let factory: SessionFactory = Box::new(|| {
            let mut session = MockGeospatialSession::new();
            session.push_frame(GeospatialFrame::at_secs(0.0));
            session.push_frame(GeospatialFrame::at_secs(0.0).with_transform(
                GeospatialTransform::new(36.09, 136.21, 10.0)
                    .with_accuracy(4.0, 2.0)
                    .with_heading(10.0, 5.0),
            ));
            Ok(Box::new(session) as Box<dyn GeospatialSession>)
        });
        let tracker = SharedTracker::new(TrackingCore::new(TrackerConfig::default(), InMemoryScene::new(), factory));
        tracker.ensure_session();

        let (tx, worker) = spawn_tick_loop(tracker.clone(), 4);
        tx.send(CameraFrame::at_secs(1.0)).unwrap();
        tx.send(CameraFrame::at_secs(2.0)).unwrap();
        drop(tx);
        worker.join().unwrap();

        assert_eq!(tracker.snapshot().state, LocalizationState::Localized);
    }

    #[test]
    fn test_loop_without_session_skips() {
        let factory: SessionFactory = Box::new(|| Ok(Box::new(MockGeospatialSession::new()) as Box<dyn GeospatialSession>));
        let tracker = SharedTracker::new(TrackingCore::new(TrackerConfig::default(), InMemoryScene::new(), factory));

        let (tx, worker) = spawn_tick_loop(tracker.clone(), 1);
        tx.send(CameraFrame::at_secs(1.0)).unwrap();
        drop(tx);
        worker.join().unwrap();

        assert!(!tracker.has_session());
        assert_eq!(tracker.snapshot().state, LocalizationState::Pretracking);
    }
}
