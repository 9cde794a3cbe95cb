//! Event callbacks for observers of the tracking core
//!
//! Callbacks run on the thread that processes the tick, while the tracker
//! lock is held. They must not call back into the tracker.

use crate::api::{SessionAlert, TickSkipReason};
use crate::localization::LocalizationState;
use std::collections::HashMap;
use uuid::Uuid;

/// Callback function type for tracking events
pub type EventCallback = Box<dyn Fn(TrackingEvent) + Send>;

/// Events emitted by the tracking core
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    /// Localization state changed
    StateChanged {
        old_state: LocalizationState,
        new_state: LocalizationState,
    },
    /// A renderable was created for a newly seen anchor
    AnchorMaterialized { identity: Uuid },
    /// A tick was dropped before any step ran
    TickSkipped { reason: TickSkipReason },
    /// Display strings published at the end of a processed tick
    PresentationUpdated {
        tracking_text: String,
        status_text: String,
    },
    /// The session failed hard; the alert is raised once
    SessionFailed(SessionAlert),
}

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Registered observers, keyed by handle
#[derive(Default)]
pub struct EventDispatcher {
    callback_counter: u32,
    callbacks: HashMap<CallbackHandle, EventCallback>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.callbacks.insert(handle, callback);
        handle
    }

    /// Returns false if the handle was not registered
    pub fn unregister(&mut self, handle: CallbackHandle) -> bool {
        self.callbacks.remove(&handle).is_some()
    }

    pub fn trigger(&self, event: TrackingEvent) {
        for callback in self.callbacks.values() {
            callback(event.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
