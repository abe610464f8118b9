//! Turning a layer tree into external tool runs.

pub mod composite;
pub mod exec;
pub mod pipeline;
pub mod rotation;
pub mod workspace;
