/// Position of a node inside a repeating group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowParent {
    pub group_id: String,
    pub row_index: usize,
}

/// One row of a repeating group: its index and the ids of the items rendered in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: usize,
    item_ids: Vec<String>,
}

impl Row {
    #[must_use]
    pub fn new<I, S>(index: usize, item_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index,
            item_ids: item_ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    /// The item that stands in for the whole row when rules are applied per row.
    #[must_use]
    pub fn first_item(&self) -> Option<&str> {
        self.item_ids.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf component with its type tag (`"Input"`, `"Paragraph"`, ...).
    Component(String),
    RepeatingGroup {
        rows: Vec<Row>,
        /// Data model path the group repeats over, e.g. `people`.
        binding: Option<String>,
    },
}

/// A node of the rendered component tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    kind: NodeKind,
    parent: Option<RowParent>,
}

impl Node {
    #[must_use]
    pub fn component(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Component(type_name.into()),
            parent: None,
        }
    }

    #[must_use]
    pub fn repeating_group(id: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::RepeatingGroup {
                rows,
                binding: None,
            },
            parent: None,
        }
    }

    /// Set the data model binding of a repeating group. No effect on components.
    #[must_use]
    pub fn with_binding(mut self, path: impl Into<String>) -> Self {
        if let NodeKind::RepeatingGroup { binding, .. } = &mut self.kind {
            *binding = Some(path.into());
        }
        self
    }

    /// Place this node in a row of a repeating group.
    #[must_use]
    pub fn in_row(mut self, group_id: impl Into<String>, row_index: usize) -> Self {
        self.parent = Some(RowParent {
            group_id: group_id.into(),
            row_index,
        });
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        match &self.kind {
            NodeKind::Component(name) => name,
            NodeKind::RepeatingGroup { .. } => "RepeatingGroup",
        }
    }

    #[must_use]
    pub fn is_repeating_group(&self) -> bool {
        matches!(self.kind, NodeKind::RepeatingGroup { .. })
    }

    /// Rows of a repeating group, `None` for any other node.
    #[must_use]
    pub fn rows(&self) -> Option<&[Row]> {
        match &self.kind {
            NodeKind::RepeatingGroup { rows, .. } => Some(rows),
            NodeKind::Component(_) => None,
        }
    }

    #[must_use]
    pub fn binding(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::RepeatingGroup { binding, .. } => binding.as_deref(),
            NodeKind::Component(_) => None,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&RowParent> {
        self.parent.as_ref()
    }

    /// Index of the row this node sits in, within its innermost repeating group.
    #[must_use]
    pub fn row_index(&self) -> Option<usize> {
        self.parent.as_ref().map(|p| p.row_index)
    }

    pub(crate) fn set_parent(&mut self, parent: RowParent) {
        self.parent = Some(parent);
    }
}
