//! Kolkhoz - Deterministic Settlement Simulation Core

pub mod core;
pub mod directory;
pub mod doctrine;
pub mod ledger;
pub mod world;
