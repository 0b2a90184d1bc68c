mod anchors;
mod tidy;
pub(crate) mod types;
pub use anchors::*;
pub use types::*;

use crate::config::LayoutConfig;
use crate::hierarchy::{Hierarchy, Unit};
use std::collections::VecDeque;
use tidy::{Separation, TidyNode, tidy_positions};

/// Lays the hierarchy out top-down: one generation per rank, the root at
/// x = 0, couples given the width of their two circles.
pub fn compute_layout(hierarchy: &Hierarchy, config: &LayoutConfig) -> TreeLayout {
    let Some(root) = hierarchy.root.as_ref() else {
        return TreeLayout::default();
    };

    let slot = config.node_spacing.max(1.0);
    let couple_extra = config.couple_offset() / slot;

    let mut units: Vec<(&Unit, Option<usize>, usize)> = Vec::new();
    let mut nodes: Vec<TidyNode> = Vec::new();
    let mut queue: VecDeque<(&Unit, Option<usize>, usize)> = VecDeque::from([(root, None, 0)]);
    while let Some((unit, parent, depth)) = queue.pop_front() {
        let idx = units.len();
        if let Some(parent) = parent {
            nodes[parent].children.push(idx);
        }
        let half_extra = match unit {
            Unit::Couple { .. } => couple_extra,
            Unit::Person { .. } | Unit::SuperRoot { .. } => 0.0,
        };
        nodes.push(TidyNode {
            children: Vec::new(),
            parent,
            half_extra,
        });
        units.push((unit, parent, depth));
        for child in unit.children() {
            queue.push_back((child, Some(idx), depth + 1));
        }
    }

    let separation = Separation {
        siblings: config.sibling_separation,
        subtrees: config.subtree_separation,
    };
    let slots = tidy_positions(&nodes, separation);

    let mut layout = TreeLayout::default();
    for ((unit, parent, depth), slot_x) in units.into_iter().zip(slots) {
        let kind = match unit {
            Unit::Person { person_id, .. } => UnitKind::Person {
                id: person_id.clone(),
            },
            Unit::Couple { parent_ids, .. } => UnitKind::Couple {
                a: parent_ids.0.clone(),
                b: parent_ids.1.clone(),
            },
            Unit::SuperRoot { .. } => UnitKind::SuperRoot,
        };
        let target = layout.units.len();
        if let Some(source) = parent {
            layout.links.push(LinkLayout { source, target });
        }
        layout.units.push(UnitLayout {
            kind,
            depth,
            parent,
            x: slot_x * slot,
            y: depth as f32 * config.rank_spacing,
        });
    }

    layout.min_x = layout.units.iter().map(|u| u.x).fold(f32::INFINITY, f32::min);
    layout.max_x = layout.units.iter().map(|u| u.x).fold(f32::NEG_INFINITY, f32::max);
    layout.max_y = layout.units.iter().map(|u| u.y).fold(0.0, f32::max);
    layout
}
