use std::collections::BTreeSet;
use std::fmt;

use crate::compile::consolidate::group_consolidatable;
use crate::drawable::DEFAULT_PROCESS;
use crate::foundation::core::Offset;
use crate::foundation::error::LaminateResult;
use crate::layer::model::Layer;
use crate::layer::traverse::{LayerPath, flatten};
use crate::render::rotation::compensate_effects;

/// Whether a layer's primitives get their own invocation after its effects.
///
/// Only when the layer asks for effects first and actually has both effects and primitives;
/// otherwise primitives ride along with the foundation invocation.
pub fn primitives_deferred(layer: &Layer) -> bool {
    !layer.draw_primitives_first() && !layer.effects().is_empty() && !layer.primitives().is_empty()
}

/// One consolidation group as it will be invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPlan {
    pub process: String,
    /// Labels of the member effects, leader first.
    pub effects: Vec<String>,
}

/// The invocations a single layer needs, without running anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerPlan {
    pub path: LayerPath,
    pub label: String,
    pub foundation: String,
    /// Executable that renders the foundation.
    pub process: String,
    pub primitives: usize,
    pub primitives_deferred: bool,
    pub groups: Vec<GroupPlan>,
    pub overlays: usize,
    /// Placement offset after canvas-growth compensation.
    pub offset: Offset,
}

impl LayerPlan {
    /// Foundation, one per group, deferred primitives, and the overlay composite.
    pub fn invocation_count(&self) -> usize {
        1 + self.groups.len()
            + usize::from(self.primitives_deferred)
            + usize::from(self.overlays > 0)
    }
}

/// Static description of every invocation a render of one tree will perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPlan {
    /// Per layer, in flattened (pre-order) order.
    pub layers: Vec<LayerPlan>,
}

impl RenderPlan {
    pub fn build(root: &Layer) -> LaminateResult<Self> {
        let layers = flatten(root)?
            .into_iter()
            .map(|node| {
                let layer = node.layer;
                let groups = group_consolidatable(layer.effects())
                    .iter()
                    .map(|g| GroupPlan {
                        process: g.process_name().to_string(),
                        effects: g.effects.iter().map(|e| e.label()).collect(),
                    })
                    .collect();
                LayerPlan {
                    label: layer.label(),
                    foundation: layer.foundation().label(),
                    process: layer.foundation().process_name().to_string(),
                    primitives: layer.primitives().len(),
                    primitives_deferred: primitives_deferred(layer),
                    groups,
                    overlays: layer.overlays().len(),
                    offset: compensate_effects(layer.offset(), layer.effects()),
                    path: node.path,
                }
            })
            .collect();
        Ok(Self { layers })
    }

    pub fn invocation_count(&self) -> usize {
        self.layers.iter().map(LayerPlan::invocation_count).sum()
    }

    pub fn effect_group_count(&self) -> usize {
        self.layers.iter().map(|l| l.groups.len()).sum()
    }

    /// Every process name the render invokes, sorted. Deferred primitives and compositing run
    /// the default tool.
    pub fn processes(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        for layer in &self.layers {
            out.insert(layer.process.as_str());
            out.extend(layer.groups.iter().map(|g| g.process.as_str()));
            if layer.primitives_deferred || layer.overlays > 0 {
                out.insert(DEFAULT_PROCESS);
            }
        }
        out
    }
}

impl fmt::Display for RenderPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in &self.layers {
            let indent = layer.path.depth() * 2;
            writeln!(
                f,
                "{:indent$}{} {} [{} invocation(s)]",
                "",
                layer.path,
                layer.label,
                layer.invocation_count()
            )?;
            let when = if layer.primitives_deferred {
                "after effects"
            } else {
                "with foundation"
            };
            writeln!(
                f,
                "{:indent$}  foundation: {} + {} primitive(s) {when}",
                "", layer.foundation, layer.primitives
            )?;
            for (i, g) in layer.groups.iter().enumerate() {
                writeln!(
                    f,
                    "{:indent$}  group {i} ({}): {}",
                    "",
                    g.process,
                    g.effects.join(", ")
                )?;
            }
            if layer.path.depth() > 0 {
                writeln!(f, "{:indent$}  placed at {}", "", layer.offset)?;
            }
            if layer.overlays > 0 {
                writeln!(f, "{:indent$}  composite {} overlay(s)", "", layer.overlays)?;
            }
        }
        writeln!(
            f,
            "total: {} invocation(s), {} effect group(s)",
            self.invocation_count(),
            self.effect_group_count()
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
