use crate::drawable::Drawable;

/// A contiguous run of effects submitted as one tool invocation.
///
/// The first effect leads the group and decides its process; every follower reported itself
/// consolidatable and runs under the same process.
#[derive(Clone, Copy, Debug)]
pub struct ConsolidationGroup<'a> {
    /// Index of the leader in the layer's effect list.
    pub start: usize,
    /// The leader followed by its followers. Never empty.
    pub effects: &'a [Box<dyn Drawable>],
}

impl<'a> ConsolidationGroup<'a> {
    pub fn leader(&self) -> &'a dyn Drawable {
        self.effects[0].as_ref()
    }

    pub fn followers(&self) -> &'a [Box<dyn Drawable>] {
        &self.effects[1..]
    }

    pub fn process_name(&self) -> &'a str {
        self.leader().process_name()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Index range of this group in the layer's effect list.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.effects.len()
    }
}

/// Partition `effects` into the fewest invocations a single left-to-right pass can find.
///
/// An effect joins the current group when it is consolidatable and names the same process as
/// the group's leader; otherwise it leads a new group. The leader's own consolidatable flag does
/// not matter. Effects are never reordered, so concatenating the groups yields `effects`.
pub fn group_consolidatable(effects: &[Box<dyn Drawable>]) -> Vec<ConsolidationGroup<'_>> {
    let mut groups = Vec::new();
    let mut start = 0;

    for (i, effect) in effects.iter().enumerate().skip(1) {
        let joins = effect.is_consolidatable()
            && effect.process_name() == effects[start].process_name();
        if !joins {
            groups.push(ConsolidationGroup {
                start,
                effects: &effects[start..i],
            });
            start = i;
        }
    }

    if start < effects.len() {
        groups.push(ConsolidationGroup {
            start,
            effects: &effects[start..],
        });
    }
    groups
}

#[cfg(test)]
#[path = "../../tests/unit/compile/consolidate.rs"]
mod tests;
