//! Domain types shared across the engine and host layers.

pub mod errors;
pub mod model;
