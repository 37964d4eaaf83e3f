//! Application layer: the reorder engine and its trigger contract.

pub mod classify;
pub mod reorder;
pub mod segment;
pub mod sort;
pub mod trigger;
