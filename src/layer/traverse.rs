use std::collections::HashMap;
use std::fmt;

use crate::foundation::error::{LaminateError, LaminateResult};
use crate::layer::model::{Layer, MAX_LAYER_DEPTH};

/// Position of a layer in its tree: overlay indices from the root.
///
/// Displays as `root`, `root/0`, `root/0/2`, ...
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerPath(Vec<usize>);

impl LayerPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for LayerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for i in &self.0 {
            write!(f, "/{i}")?;
        }
        Ok(())
    }
}

/// One entry of a flattened tree.
#[derive(Clone, Debug)]
pub struct FlatLayer<'a> {
    /// Position in the flat sequence.
    pub index: usize,
    /// Flat index of the parent; `None` for the root.
    pub parent: Option<usize>,
    pub depth: usize,
    pub path: LayerPath,
    pub layer: &'a Layer,
}

/// Flatten a tree in pre-order: the root, then each overlay subtree in overlay order.
///
/// Uses an explicit stack rather than recursion and fails with a structure error when a node is
/// nested deeper than [`MAX_LAYER_DEPTH`].
pub fn flatten(root: &Layer) -> LaminateResult<Vec<FlatLayer<'_>>> {
    let mut out = Vec::new();
    let mut stack = vec![(root, None, LayerPath::root())];

    while let Some((layer, parent, path)) = stack.pop() {
        let depth = path.depth();
        if depth > MAX_LAYER_DEPTH {
            return Err(LaminateError::structure(format!(
                "layer {path} is nested deeper than {MAX_LAYER_DEPTH} levels"
            )));
        }

        let index = out.len();
        // Reverse so the first overlay is popped first.
        for (i, child) in layer.overlays().iter().enumerate().rev() {
            stack.push((child, Some(index), path.child(i)));
        }
        out.push(FlatLayer {
            index,
            parent,
            depth,
            path,
            layer,
        });
    }

    Ok(out)
}

/// Layers sharing one parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiblingGroup {
    /// Flat index of the shared parent; `None` groups the root on its own.
    pub parent: Option<usize>,
    /// Flat indices of the members, in flat order.
    pub members: Vec<usize>,
}

/// Group a flat sequence by parent. Groups appear in the order their first member does.
pub fn group_by_parent(flat: &[FlatLayer<'_>]) -> Vec<SiblingGroup> {
    let mut groups: Vec<SiblingGroup> = Vec::new();
    let mut slot_of: HashMap<Option<usize>, usize> = HashMap::new();

    for node in flat {
        let slot = *slot_of.entry(node.parent).or_insert_with(|| {
            groups.push(SiblingGroup {
                parent: node.parent,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(node.index);
    }
    groups
}

/// A parent/child edge, by flat index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relationship {
    pub parent: usize,
    pub child: usize,
}

/// Every parent/child edge of a flat sequence, in child order.
pub fn relationships(flat: &[FlatLayer<'_>]) -> Vec<Relationship> {
    flat.iter()
        .filter_map(|node| {
            node.parent.map(|parent| Relationship {
                parent,
                child: node.index,
            })
        })
        .collect()
}

/// Indented one-line-per-layer description of a tree, for logs and the CLI.
pub fn describe_hierarchy(root: &Layer) -> LaminateResult<String> {
    Ok(Hierarchy(flatten(root)?).to_string())
}

struct Hierarchy<'a>(Vec<FlatLayer<'a>>);

impl fmt::Display for Hierarchy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.0 {
            let layer = node.layer;
            write!(
                f,
                "{:indent$}{} {}",
                "",
                node.path,
                layer.foundation().label(),
                indent = node.depth * 2
            )?;
            if let Some(id) = layer.id() {
                write!(f, " #{id}")?;
            }
            if node.depth > 0 {
                write!(f, " at {}", layer.offset())?;
            }
            writeln!(
                f,
                " effects={} primitives={} overlays={} gravity={}",
                layer.effects().len(),
                layer.primitives().len(),
                layer.overlays().len(),
                layer.gravity()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/traverse.rs"]
mod tests;
