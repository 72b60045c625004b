//! Builds the arena [`Tree`] the layout engine works on.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Node, NodeId, Tree, TreeNode};

/// Order in which siblings are packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Descending aggregate value.
    #[default]
    Value,
    /// Descending height, then descending aggregate value.
    HeightThenValue,
    /// Keep document order.
    Input,
}

impl std::str::FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "value" => Ok(SortOrder::Value),
            "height-then-value" => Ok(SortOrder::HeightThenValue),
            "input" => Ok(SortOrder::Input),
            other => Err(Error::invalid(format!("unknown sort order {other:?}"))),
        }
    }
}

impl Tree {
    /// Aggregates values bottom-up and sorts every child list.
    ///
    /// Ids follow the document's pre-order, so two trees built from the same
    /// document share ids regardless of `order`.
    pub fn from_node(root: &Node, order: SortOrder) -> Result<Tree> {
        let mut nodes = Vec::new();
        let root_id = insert(&mut nodes, root, None, 0)?;
        let mut tree = Tree {
            root: root_id,
            nodes,
        };
        if tree.leaf_count() == 0 {
            return Err(Error::invalid("tree has no leaves"));
        }
        tree.sort_children(order);
        tracing::debug!(
            nodes = tree.len(),
            leaves = tree.leaf_count(),
            total = tree.get(root_id).value,
            "hierarchy built"
        );
        Ok(tree)
    }

    fn sort_children(&mut self, order: SortOrder) {
        if order == SortOrder::Input {
            return;
        }
        let keys: Vec<(u32, f64)> = self.nodes.iter().map(|n| (n.height, n.value)).collect();
        for node in &mut self.nodes {
            // Vec::sort_by is stable, ties keep document order.
            node.children.sort_by(|a, b| {
                let (ha, va) = keys[a.index()];
                let (hb, vb) = keys[b.index()];
                match order {
                    SortOrder::Value => vb.total_cmp(&va),
                    SortOrder::HeightThenValue => hb.cmp(&ha).then(vb.total_cmp(&va)),
                    SortOrder::Input => std::cmp::Ordering::Equal,
                }
            });
        }
    }
}

fn insert(
    nodes: &mut Vec<TreeNode>,
    node: &Node,
    parent: Option<NodeId>,
    depth: u32,
) -> Result<NodeId> {
    if let Some(v) = node.value {
        if !v.is_finite() {
            return Err(Error::invalid(format!("{:?} has a non-finite value", node.name)));
        }
        if v < 0.0 {
            return Err(Error::invalid(format!("{:?} has negative value {v}", node.name)));
        }
    }

    let id = NodeId(nodes.len() as u64);
    nodes.push(TreeNode {
        id,
        parent,
        name: node.name.clone(),
        category: node.category.clone(),
        own_value: node.value,
        value: 0.0,
        depth,
        height: 0,
        children: Vec::with_capacity(node.children.len()),
    });

    let mut value = node.value.unwrap_or(0.0);
    let mut height = 0;
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        let cid = insert(nodes, child, Some(id), depth + 1)?;
        let c = &nodes[cid.index()];
        value += c.value;
        height = height.max(c.height + 1);
        children.push(cid);
    }

    let n = &mut nodes[id.index()];
    n.value = value;
    n.height = height;
    n.children = children;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::group(
            "root",
            vec![
                Node::group("A", vec![Node::leaf("a1", "A", 10.0), Node::leaf("a2", "A", 30.0)]),
                Node::group("B", vec![Node::leaf("b1", "B", 50.0)]),
                Node::leaf("c", "C", 5.0),
            ],
        )
    }

    #[test]
    fn aggregates_values_and_heights() {
        let tree = Tree::from_node(&sample(), SortOrder::Input).unwrap();
        let root = tree.get(tree.root);
        assert_eq!(root.value, 95.0);
        assert_eq!(root.height, 2);
        assert_eq!(root.depth, 0);
        let a = tree.get(root.children[0]);
        assert_eq!(a.name, "A");
        assert_eq!(a.value, 40.0);
        assert_eq!(a.height, 1);
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn sorts_by_descending_value() {
        let tree = Tree::from_node(&sample(), SortOrder::Value).unwrap();
        let names: Vec<_> = tree
            .get(tree.root)
            .children
            .iter()
            .map(|id| tree.get(*id).name.as_str())
            .collect();
        assert_eq!(names, ["B", "A", "c"]);
        let leaves: Vec<_> = tree.leaves().map(|n| n.name.as_str()).collect();
        assert_eq!(leaves, ["b1", "a2", "a1", "c"]);
    }

    #[test]
    fn sorts_by_height_then_value() {
        let root = Node::group(
            "root",
            vec![Node::leaf("big", "X", 1000.0), Node::group("G", vec![Node::leaf("g", "G", 1.0)])],
        );
        let tree = Tree::from_node(&root, SortOrder::HeightThenValue).unwrap();
        let first = tree.get(tree.get(tree.root).children[0]);
        assert_eq!(first.name, "G");
    }

    #[test]
    fn rejects_negative_values() {
        let root = Node::group("root", vec![Node::leaf("bad", "X", -1.0)]);
        let err = Tree::from_node(&root, SortOrder::Value).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_tree_without_leaves() {
        let root = Node::group("root", vec![Node::group("empty", vec![])]);
        assert!(matches!(
            Tree::from_node(&root, SortOrder::Value),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn zero_value_leaf_is_accepted() {
        let root = Node::group("root", vec![Node::leaf("z", "X", 0.0), Node::leaf("o", "X", 1.0)]);
        let tree = Tree::from_node(&root, SortOrder::Value).unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn parses_sort_order_names() {
        assert_eq!("input".parse::<SortOrder>().unwrap(), SortOrder::Input);
        assert_eq!(
            "height-then-value".parse::<SortOrder>().unwrap(),
            SortOrder::HeightThenValue
        );
        assert!(matches!("size".parse::<SortOrder>(), Err(Error::InvalidInput(_))));
    }
}
