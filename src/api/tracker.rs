//! Per-tick tracking core and its lock-guarded shared handle

use crate::anchors::{AnchorRegistry, SceneGraph};
use crate::api::formatting::describe;
use crate::api::{
    CallbackHandle, EventCallback, EventDispatcher, SessionAlert, TickOutcome, TickSkipReason,
    TrackerSnapshot, TrackingEvent,
};
use crate::core::{CameraFrame, GeospatialFrame};
use crate::localization::{LocalizationState, LocalizationStateMachine};
use crate::session::{start_session, GateDecision, SessionError, SessionFactory, SessionHandle};
use crate::utils::TrackerConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Owner of all per-tick state
///
/// Every tick runs the state machine, the anchor registry and the text
/// generator in that order, against the same fused frame. Anchors are only
/// material once localization has begun: no tick reaches the registry until a
/// configured session (which restarts localization) is producing frames. The
/// registry itself is not gated on `LocalizationState`, since no step of a
/// processed tick may be skipped.
pub struct TrackingCore<S: SceneGraph> {
    config: TrackerConfig,
    machine: LocalizationStateMachine,
    registry: AnchorRegistry,
    scene: S,
    factory: SessionFactory,
    session: Option<SessionHandle>,
    tracking_text: String,
    status_text: String,
    events: EventDispatcher,
    last_frame_time: Duration,
    alert_raised: bool,
}

impl<S: SceneGraph> TrackingCore<S> {
    pub fn new(config: TrackerConfig, scene: S, factory: SessionFactory) -> Self {
        Self {
            machine: LocalizationStateMachine::new(config.thresholds.clone()),
            registry: AnchorRegistry::new(config.anchor_model.clone()),
            config,
            scene,
            factory,
            session: None,
            tracking_text: String::new(),
            status_text: String::new(),
            events: EventDispatcher::new(),
            last_frame_time: Duration::ZERO,
            alert_raised: false,
        }
    }

    /// Process one camera frame
    pub fn tick(&mut self, camera: CameraFrame) -> TickOutcome {
        let frame = match self.fuse(&camera) {
            Ok(frame) => frame,
            Err(reason) => {
                warn!(reason = %reason, at_s = camera.timestamp.as_secs_f64(), "tick skipped");
                self.events.trigger(TrackingEvent::TickSkipped { reason: reason.clone() });
                return TickOutcome::Skipped(reason);
            }
        };
        self.last_frame_time = frame.timestamp;

        let old_state = self.machine.state();
        let new_state = self.machine.update(&frame);
        if new_state != old_state {
            self.events.trigger(TrackingEvent::StateChanged { old_state, new_state });
        }

        let anchors = self.registry.reconcile(&frame.anchors, &mut self.scene);
        for identity in &anchors.created {
            self.events.trigger(TrackingEvent::AnchorMaterialized { identity: *identity });
        }

        let text = describe(new_state, &frame);
        self.tracking_text = text.tracking_text;
        if let Some(status) = text.status_text {
            self.status_text = status;
        }
        self.events.trigger(TrackingEvent::PresentationUpdated {
            tracking_text: self.tracking_text.clone(),
            status_text: self.status_text.clone(),
        });

        TickOutcome::Processed { state: new_state, anchors }
    }

    fn fuse(&mut self, camera: &CameraFrame) -> Result<GeospatialFrame, TickSkipReason> {
        let handle = self.session.as_mut().ok_or(TickSkipReason::NoSession)?;
        if handle.has_transport_failed() {
            return Err(TickSkipReason::TransportFailed);
        }
        if !handle.is_configured() {
            return Err(TickSkipReason::SessionNotReady);
        }
        handle.update(camera).map_err(TickSkipReason::Fusion)
    }

    /// Create the session unless one already exists
    pub fn ensure_session(&mut self) -> GateDecision {
        if self.session.is_some() {
            debug!("geospatial session already exists");
            return GateDecision::SessionAlreadyExists;
        }

        let old_state = self.machine.state();
        let result = start_session(
            &self.factory,
            &self.config.terrain_anchors,
            &mut self.machine,
            self.last_frame_time,
        );
        let new_state = self.machine.state();
        if new_state != old_state {
            self.events.trigger(TrackingEvent::StateChanged { old_state, new_state });
        }

        match result {
            Ok((handle, start)) => {
                info!(ready = handle.is_ready(), "geospatial session installed");
                self.session = Some(handle);
                GateDecision::SessionStarted(start)
            }
            Err(e) => GateDecision::SessionCreationFailed(e),
        }
    }

    /// Record a hard session failure and produce the alert, once
    ///
    /// Localization state is left as it is; later ticks are skipped.
    pub fn report_transport_failure(&mut self, error: SessionError) -> Option<SessionAlert> {
        let Some(alert) = SessionAlert::from_error(&error) else {
            warn!(error = %error, "ignoring non-transport error report");
            return None;
        };

        if self.alert_raised {
            debug!("transport failure already reported");
            return None;
        }
        self.alert_raised = true;
        if let Some(handle) = self.session.as_mut() {
            handle.mark_transport_failed();
        }

        error!(error = %error, "tracking session failed");
        self.events.trigger(TrackingEvent::SessionFailed(alert.clone()));
        Some(alert)
    }

    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.events.register(callback)
    }

    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.events.unregister(handle)
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            state: self.machine.state(),
            tracking_text: self.tracking_text.clone(),
            status_text: self.status_text.clone(),
            anchor_count: self.registry.len(),
            session_ready: self.session.as_ref().map_or(false, SessionHandle::is_ready),
        }
    }

    pub fn state(&self) -> LocalizationState {
        self.machine.state()
    }

    pub fn machine(&self) -> &LocalizationStateMachine {
        &self.machine
    }

    pub fn registry(&self) -> &AnchorRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn tracking_text(&self) -> &str {
        &self.tracking_text
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Release every anchor renderable and hand back the scene
    pub fn teardown(self) -> S {
        let TrackingCore { registry, mut scene, .. } = self;
        registry.teardown(&mut scene);
        scene
    }
}

/// Tracking core behind a single lock
///
/// Ticks, session installation, failure reports and snapshots each hold the
/// lock for their whole duration, so readers never see a half-applied tick.
pub struct SharedTracker<S: SceneGraph> {
    inner: Arc<Mutex<TrackingCore<S>>>,
}

impl<S: SceneGraph> Clone for SharedTracker<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: SceneGraph> SharedTracker<S> {
    pub fn new(core: TrackingCore<S>) -> Self {
        Self { inner: Arc::new(Mutex::new(core)) }
    }

    pub fn tick(&self, camera: CameraFrame) -> TickOutcome {
        self.inner.lock().tick(camera)
    }

    pub fn ensure_session(&self) -> GateDecision {
        self.inner.lock().ensure_session()
    }

    pub fn has_session(&self) -> bool {
        self.inner.lock().session.is_some()
    }

    pub fn report_transport_failure(&self, error: SessionError) -> Option<SessionAlert> {
        self.inner.lock().report_transport_failure(error)
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn register_event_callback(&self, callback: EventCallback) -> CallbackHandle {
        self.inner.lock().register_event_callback(callback)
    }

    pub fn unregister_callback(&self, handle: CallbackHandle) -> bool {
        self.inner.lock().unregister_callback(handle)
    }

    /// Run a closure against the locked core
    pub fn with_core<R>(&self, f: impl FnOnce(&mut TrackingCore<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
