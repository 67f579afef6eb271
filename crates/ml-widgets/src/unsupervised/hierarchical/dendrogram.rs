//! Dendrogram layout in normalized coordinates.

use serde::{Deserialize, Serialize};

use super::Node;
use crate::utils;

/// A merge drawn as a bracket: up from each child to `height`, then across.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// The id of the merged node.
    pub node: usize,
    /// The horizontal position of the merged node.
    pub x: f64,
    /// The merge height.
    pub height: f64,
    /// The position and height of the left child.
    pub left: (f64, f64),
    /// The position and height of the right child.
    pub right: (f64, f64),
}

/// A laid-out dendrogram of the current forest.
///
/// Horizontal positions lie in `[0, 1]`; heights are in the units of the
/// linkage distance and `max_height` is the top of the vertical axis. It is
/// always positive, so heights can be divided by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dendrogram {
    /// The point index and horizontal position of every leaf, left to right.
    pub leaves: Vec<(usize, f64)>,
    /// The merges, children before parents.
    pub joints: Vec<Joint>,
    /// The top of the vertical axis.
    pub max_height: f64,
}

impl Dendrogram {
    /// Lays out the trees rooted at `roots`.
    ///
    /// Roots are placed left to right by the x-coordinate of their centroids.
    /// Leaves are spaced evenly in the order of an in-order traversal and each
    /// merge sits midway between its children.
    pub(crate) fn layout(nodes: &[Node], roots: &[usize], n_points: usize) -> Self {
        let mut roots = roots.to_vec();
        roots.sort_by(|&a, &b| nodes[a].centroid.x.total_cmp(&nodes[b].centroid.x));

        let max_height = nodes
            .iter()
            .filter(|n| !n.is_leaf())
            .map(|n| n.height)
            .fold(0.0, f64::max);
        // Without a positive merge height the axis keeps its default span.
        let max_height = if max_height > 0.0 { max_height * 1.1 } else { 100.0 };

        let spacing = if n_points > 1 {
            1.0 / utils::as_f64(n_points - 1)
        } else {
            1.0
        };

        let mut layout = Self {
            leaves: Vec::with_capacity(n_points),
            joints: Vec::new(),
            max_height,
        };
        for root in roots {
            layout.place(nodes, root, spacing);
        }
        layout
    }

    /// Places the subtree at `id` and returns the position of its root.
    fn place(&mut self, nodes: &[Node], id: usize, spacing: f64) -> f64 {
        let node = &nodes[id];
        match (node.left, node.right) {
            (Some(l), Some(r)) => {
                let left_x = self.place(nodes, l, spacing);
                let right_x = self.place(nodes, r, spacing);
                let x = (left_x + right_x) / 2.0;
                self.joints.push(Joint {
                    node: id,
                    x,
                    height: node.height,
                    left: (left_x, nodes[l].height),
                    right: (right_x, nodes[r].height),
                });
                x
            }
            _ => {
                let x = utils::as_f64(self.leaves.len()) * spacing;
                self.leaves.push((node.members[0], x));
                x
            }
        }
    }
}
