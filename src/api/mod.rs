//! Tracking API
//!
//! This module ties the localization state machine, the anchor registry and
//! the presentation text together into a per-tick core, plus a lock-guarded
//! handle and a channel-fed tick loop for multithreaded hosts.

pub mod alert;
pub mod callback;
pub mod driver;
pub mod formatting;
pub mod tracker;
pub mod types;

pub use alert::SessionAlert;
pub use callback::{CallbackHandle, EventCallback, EventDispatcher, TrackingEvent};
pub use driver::spawn_tick_loop;
pub use formatting::{describe, format_geospatial_transform, normalize_heading, PresentationText};
pub use tracker::{SharedTracker, TrackingCore};
pub use types::{TickOutcome, TickSkipReason, TrackerSnapshot};
