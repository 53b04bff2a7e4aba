//! API handlers module

pub mod graph;
pub mod health;
pub mod records;
