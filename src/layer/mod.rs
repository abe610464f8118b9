//! The composition tree and its traversal.

/// `Layer` and its construction options.
pub mod model;
/// Pre-order flattening and hierarchy diagnostics.
pub mod traverse;
