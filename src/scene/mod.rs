//! JSON scene files describing a layer tree.

pub mod model;

pub use model::{EffectDef, FoundationDef, LayerDef, PrimitiveDef, SCENE_VERSION, SceneDef};
