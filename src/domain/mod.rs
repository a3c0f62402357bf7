//! Dashboard query shaping on top of the discovery engine
//!
//! Validates HTTP query parameters and filters unit listings for the UI.

pub mod utils;
