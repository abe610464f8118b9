//! Turning a layer tree into tool invocations.

/// Effect batching.
pub mod consolidate;
/// Argument lists for each pipeline stage.
pub mod invocation;
/// Dry-run description of a whole render.
pub mod plan;
