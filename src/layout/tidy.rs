//! Tidy tree placement.
//!
//! Every subtree is reduced to its left and right contour (one extent per
//! depth, relative to the subtree root). Children are packed left to right
//! as close as the contours allow, then the parent is centered over its
//! first and last child. Distances are measured in sibling slots; the caller
//! scales them to pixels.

#[derive(Debug, Clone)]
pub(super) struct TidyNode {
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    /// Extra half-width beyond a single slot, in slots.
    pub half_extra: f32,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Separation {
    pub siblings: f32,
    pub subtrees: f32,
}

struct Contour {
    left: Vec<f32>,
    right: Vec<f32>,
}

/// Returns the x position of every node, in slots, with the root at 0.
/// `nodes` must list parents before their children.
pub(super) fn tidy_positions(nodes: &[TidyNode], separation: Separation) -> Vec<f32> {
    if nodes.is_empty() {
        return Vec::new();
    }

    // Children always sit after their parent, so a reverse sweep sees every
    // subtree before its root.
    let mut relative = vec![0.0f32; nodes.len()];
    let mut contours: Vec<Option<Contour>> = (0..nodes.len()).map(|_| None).collect();
    for v in (0..nodes.len()).rev() {
        let contour = place_children(v, nodes, separation, &mut relative, &mut contours);
        contours[v] = Some(contour);
    }

    let mut x = vec![0.0f32; nodes.len()];
    for idx in 1..nodes.len() {
        if let Some(parent) = nodes[idx].parent {
            x[idx] = x[parent] + relative[idx];
        }
    }
    x
}

/// Packs the children of `v` and returns the contour of the subtree at `v`.
fn place_children(
    v: usize,
    nodes: &[TidyNode],
    separation: Separation,
    relative: &mut [f32],
    contours: &mut [Option<Contour>],
) -> Contour {
    let own = nodes[v].half_extra;
    let children = &nodes[v].children;

    let mut merged: Option<Contour> = None;
    let mut offsets = Vec::with_capacity(children.len());

    for &child in children {
        let contour = contours[child].take().unwrap_or_else(|| Contour {
            left: vec![-nodes[child].half_extra],
            right: vec![nodes[child].half_extra],
        });
        let offset = match &merged {
            None => 0.0,
            Some(acc) => {
                let shared = acc.right.len().min(contour.left.len());
                (0..shared)
                    .map(|depth| {
                        let gap = if depth == 0 {
                            separation.siblings
                        } else {
                            separation.subtrees
                        };
                        acc.right[depth] + gap - contour.left[depth]
                    })
                    .fold(f32::NEG_INFINITY, f32::max)
            }
        };
        offsets.push(offset);

        match merged.as_mut() {
            None => {
                merged = Some(contour);
            }
            Some(acc) => {
                for depth in 0..contour.left.len() {
                    let left = contour.left[depth] + offset;
                    let right = contour.right[depth] + offset;
                    if depth < acc.left.len() {
                        acc.left[depth] = acc.left[depth].min(left);
                        acc.right[depth] = acc.right[depth].max(right);
                    } else {
                        acc.left.push(left);
                        acc.right.push(right);
                    }
                }
            }
        }
    }

    let mut contour = Contour {
        left: vec![-own],
        right: vec![own],
    };
    let Some(acc) = merged else {
        return contour;
    };

    let mid = (offsets[0] + offsets[offsets.len() - 1]) / 2.0;
    for (&child, offset) in children.iter().zip(&offsets) {
        relative[child] = offset - mid;
    }
    contour.left.extend(acc.left.into_iter().map(|value| value - mid));
    contour.right.extend(acc.right.into_iter().map(|value| value - mid));
    contour
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: Separation = Separation {
        siblings: 1.0,
        subtrees: 2.0,
    };

    fn tree(parents: &[Option<usize>]) -> Vec<TidyNode> {
        let mut nodes: Vec<TidyNode> = parents
            .iter()
            .map(|parent| TidyNode {
                children: Vec::new(),
                parent: *parent,
                half_extra: 0.0,
            })
            .collect();
        for (idx, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                nodes[*parent].children.push(idx);
            }
        }
        nodes
    }

    #[test]
    fn single_node_sits_at_origin() {
        assert_eq!(tidy_positions(&tree(&[None]), SEP), vec![0.0]);
    }

    #[test]
    fn parent_centered_over_children() {
        let x = tidy_positions(&tree(&[None, Some(0), Some(0), Some(0)]), SEP);
        assert_eq!(x, vec![0.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn cousins_get_subtree_separation() {
        // root -> (a, b); a -> a1; b -> b1
        let x = tidy_positions(&tree(&[None, Some(0), Some(0), Some(1), Some(2)]), SEP);
        assert_eq!(x[4] - x[3], 2.0);
        assert_eq!(x[2] - x[1], 2.0);
        assert_eq!(x[0], 0.0);
    }

    #[test]
    fn wide_nodes_push_neighbors_apart() {
        let mut nodes = tree(&[None, Some(0), Some(0)]);
        nodes[1].half_extra = 0.5;
        let x = tidy_positions(&nodes, SEP);
        assert_eq!(x[2] - x[1], 1.5);
    }

    #[test]
    fn long_chain_is_placed_without_recursion() {
        let parents: Vec<Option<usize>> = (0..5_000)
            .map(|idx| if idx == 0 { None } else { Some(idx - 1) })
            .collect();
        let x = tidy_positions(&tree(&parents), SEP);
        assert_eq!(x.len(), 5_000);
        assert!(x.iter().all(|value| *value == 0.0));
    }

    #[test]
    fn empty_tree_has_no_positions() {
        assert!(tidy_positions(&[], SEP).is_empty());
    }
}
