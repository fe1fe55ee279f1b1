//! Component tree access: lookup by id, enumeration, and rewriting data
//! references relative to a node's repeating group rows.

use std::collections::HashMap;

use crate::types::{join_path, split_path};
use crate::{DataReference, Node, RowParent};

/// Read-only view of the rendered component tree.
pub trait NodeTraversal {
    /// All nodes, in render order.
    fn all_nodes(&self) -> Vec<&Node>;

    fn find_by_id(&self, id: &str) -> Option<&Node>;

    /// The first node in render order; flat rules are evaluated against it.
    fn top_level(&self) -> Option<&Node> {
        self.all_nodes().into_iter().next()
    }
}

/// Rewrites a data reference relative to the repeating group rows a node sits in.
pub trait Transpose {
    /// Returns `None` when the node's repetition context does not apply to
    /// the reference; callers then use the reference unchanged.
    fn transpose(&self, node: &Node, reference: &DataReference) -> Option<DataReference>;
}

/// Transposer that never rewrites anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranspose;

impl Transpose for NoTranspose {
    fn transpose(&self, _node: &Node, _reference: &DataReference) -> Option<DataReference> {
        None
    }
}

/// In-memory component tree.
///
/// Nodes placed in a repeating group's rows get their [`RowParent`] filled in
/// when the tree is built, which is what [`Transpose`] walks.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

/// Builder for a [`LayoutTree`].
#[derive(Debug, Default)]
pub struct LayoutTreeBuilder {
    nodes: Vec<Node>,
}

impl LayoutTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A later node with the same id replaces the earlier one in place.
    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    #[must_use]
    pub fn build(self) -> LayoutTree {
        let mut nodes: Vec<Node> = Vec::with_capacity(self.nodes.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        for node in self.nodes {
            match index.get(node.id()) {
                Some(&pos) => nodes[pos] = node,
                None => {
                    index.insert(node.id().to_owned(), nodes.len());
                    nodes.push(node);
                }
            }
        }

        let placements: Vec<(usize, RowParent)> = nodes
            .iter()
            .filter_map(|group| group.rows().map(|rows| (group.id(), rows)))
            .flat_map(|(group_id, rows)| {
                rows.iter().flat_map(move |row| {
                    row.item_ids().iter().map(move |item| {
                        (
                            item.as_str(),
                            RowParent {
                                group_id: group_id.to_owned(),
                                row_index: row.index(),
                            },
                        )
                    })
                })
            })
            .filter_map(|(item, parent)| index.get(item).map(|&pos| (pos, parent)))
            .collect();

        for (pos, parent) in placements {
            nodes[pos].set_parent(parent);
        }

        LayoutTree { nodes, index }
    }
}

impl LayoutTree {
    #[must_use]
    pub fn builder() -> LayoutTreeBuilder {
        LayoutTreeBuilder::new()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Enclosing repeating groups of `node` with the row it sits in,
    /// outermost first. Stops at the first missing or repeated group.
    fn row_context<'a>(&'a self, node: &'a Node) -> Vec<(&'a Node, usize)> {
        let mut chain = Vec::new();
        let mut current = node;
        while let Some(parent) = current.parent() {
            let Some(group) = self.find_by_id(&parent.group_id) else {
                break;
            };
            if chain.iter().any(|(g, _): &(&Node, usize)| g.id() == group.id()) {
                break;
            }
            chain.push((group, parent.row_index));
            current = group;
        }
        chain.reverse();
        chain
    }
}

impl NodeTraversal for LayoutTree {
    fn all_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().collect()
    }

    fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    fn top_level(&self) -> Option<&Node> {
        self.nodes.first()
    }
}

impl Transpose for LayoutTree {
    /// For each enclosing group whose binding is a prefix of the field path,
    /// write the node's row index onto the last segment of that prefix.
    /// Existing indices are left alone.
    fn transpose(&self, node: &Node, reference: &DataReference) -> Option<DataReference> {
        let mut segments = split_path(&reference.field);
        let mut changed = false;

        for (group, row) in self.row_context(node) {
            let Some(binding) = group.binding() else {
                continue;
            };
            let prefix = split_path(binding);
            if prefix.is_empty() || prefix.len() > segments.len() {
                continue;
            }
            let matches = prefix
                .iter()
                .zip(&segments)
                .all(|(b, s)| b.name == s.name);
            if !matches {
                continue;
            }
            let last = &mut segments[prefix.len() - 1];
            if last.index.is_none() {
                last.index = Some(row);
                changed = true;
            }
        }

        changed.then(|| reference.with_field(join_path(&segments)))
    }
}
