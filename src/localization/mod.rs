//! Localization state machine
//!
//! Classifies each fused frame into one of four localization states, using a
//! hysteresis band on pose accuracy and a timeout on stalled attempts.

pub mod state;
pub mod machine;

pub use state::LocalizationState;
pub use machine::{LocalizationClock, LocalizationStateMachine, LocalizationThresholds};
