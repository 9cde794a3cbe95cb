//! Core types and constants for geospatial anchoring

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
