//! Aggregation tree model

use serde::{Deserialize, Serialize};

/// A node in the aggregation tree, before radial layout.
///
/// Exactly one of `size` / `children` is authoritative: leaves carry their
/// own measure value, internal nodes derive theirs from the subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,

    /// Free-form text shown in the tooltip. Empty for aggregated nodes.
    #[serde(default)]
    pub description: String,

    /// Leaf-contributed measure value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,

    /// Overlay nodes render translucent and on top of their own children.
    #[serde(default)]
    pub overlay: bool,
}

impl HierarchyNode {
    pub fn leaf(
        name: impl Into<String>,
        description: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            size: Some(size),
            children: Vec::new(),
            overlay: false,
        }
    }

    pub fn branch(
        name: impl Into<String>,
        description: impl Into<String>,
        children: Vec<HierarchyNode>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            size: None,
            children,
            overlay: false,
        }
    }

    /// Aggregate value: subtree sum for internal nodes, own size for leaves.
    pub fn value(&self) -> f64 {
        if self.children.is_empty() {
            self.size.unwrap_or(0.0)
        } else {
            self.children.iter().map(HierarchyNode::value).sum()
        }
    }
}

/// Longest path from this node down to a leaf, counting the node itself.
pub fn compute_height(node: &HierarchyNode) -> usize {
    1 + forest_height(&node.children)
}

/// Height of a set of siblings: the tallest of them, zero when empty.
pub fn forest_height(nodes: &[HierarchyNode]) -> usize {
    nodes.iter().map(compute_height).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_of_single_leaf_is_one() {
        let leaf = HierarchyNode::leaf("a", "", 10.0);
        assert_eq!(compute_height(&leaf), 1);
    }

    #[test]
    fn height_takes_tallest_child_branch() {
        // One child of height 1, one of height 2 -> 3 total.
        let tall = HierarchyNode::branch(
            "tall",
            "",
            vec![HierarchyNode::leaf("deep", "", 1.0)],
        );
        let node = HierarchyNode::branch(
            "root",
            "",
            vec![HierarchyNode::leaf("shallow", "", 1.0), tall],
        );
        assert_eq!(compute_height(&node), 3);
    }

    #[test]
    fn forest_height_is_max_over_siblings() {
        let siblings = vec![
            HierarchyNode::leaf("a", "", 1.0),
            HierarchyNode::branch("b", "", vec![HierarchyNode::leaf("c", "", 1.0)]),
        ];
        assert_eq!(forest_height(&siblings), 2);
        assert_eq!(forest_height(&[]), 0);
    }

    #[test]
    fn internal_value_is_subtree_sum() {
        let node = HierarchyNode::branch(
            "root",
            "",
            vec![
                HierarchyNode::leaf("a", "", 3.0),
                HierarchyNode::branch(
                    "b",
                    "",
                    vec![
                        HierarchyNode::leaf("c", "", 4.0),
                        HierarchyNode::leaf("d", "", 5.0),
                    ],
                ),
            ],
        );
        assert_eq!(node.value(), 12.0);
    }
}
