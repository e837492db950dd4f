//! Owned structural tree for constructed forms
//!
//! An arena of nodes indexed by `NodeId`. Nodes own their child lists, so
//! traversal order and ownership are unambiguous; detached nodes stay
//! allocated but unreachable until the form is cleared.

use super::field::FieldWidget;
use uuid::Uuid;

/// Stable handle to a node in a [`FormTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element kinds a root form container may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerKind {
    #[default]
    Form,
    Div,
    Section,
    Article,
}

impl ContainerKind {
    /// Parse a container kind from its lowercase name
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "form" => Some(Self::Form),
            "div" => Some(Self::Div),
            "section" => Some(Self::Section),
            "article" => Some(Self::Article),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Div => "div",
            Self::Section => "section",
            Self::Article => "article",
        }
    }
}

/// Structural classification of a tree node
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Structural container: the form root or a grouping sub-block
    Container { tag: ContainerKind },
    /// Section heading
    Header { text: String, level: u8 },
    /// Section separator (blank-framed rule in the raw report)
    Separator,
    /// Single rule line with no leading blank
    LineSpacer,
    /// A constructed field group owning its live control
    FieldGroup(FieldWidget),
    /// Generic element; acts as opaque passthrough when a `proc-` class is set
    Element { text: String },
    /// Growable entry list under one base name
    InputList { base_name: String },
    /// One entry of an input list
    ListEntry { id: Uuid, value: String },
}

/// A node: kind tag, class list, owned children
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub classes: Vec<String>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn has_class_prefix(&self, prefix: &str) -> bool {
        self.classes.iter().any(|c| c.starts_with(prefix))
    }
}

/// Arena-backed display tree
#[derive(Debug, Clone)]
pub struct FormTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl FormTree {
    /// Create a tree whose root is a plain container with the given classes
    pub fn new(root_classes: Vec<String>) -> Self {
        let root = Node {
            kind: NodeKind::Container {
                tag: ContainerKind::Div,
            },
            classes: root_classes,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Append a new node as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, kind: NodeKind, classes: Vec<String>) -> NodeId {
        let id = self.push(kind, classes);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Insert a new node among `parent`'s children, just before `anchor`.
    /// Falls back to appending when `anchor` is not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        anchor: NodeId,
        kind: NodeKind,
        classes: Vec<String>,
    ) -> NodeId {
        let id = self.push(kind, classes);
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|&c| c == anchor) {
            Some(index) => children.insert(index, id),
            None => children.push(id),
        }
        id
    }

    fn push(&mut self, kind: NodeKind, classes: Vec<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            classes,
            children: Vec::new(),
        });
        id
    }

    /// Unlink a node from its parent. Returns false if no parent holds it.
    pub fn detach(&mut self, id: NodeId) -> bool {
        for node in &mut self.nodes {
            if let Some(index) = node.children.iter().position(|&c| c == id) {
                node.children.remove(index);
                return true;
            }
        }
        false
    }

    /// Drop all children of a node
    pub fn clear_children(&mut self, id: NodeId) {
        self.nodes[id.0].children.clear();
    }

    /// Find a direct child of `parent` carrying the given class
    pub fn find_child_by_class(&self, parent: NodeId, class: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).has_class(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(tag: ContainerKind) -> NodeKind {
        NodeKind::Container { tag }
    }

    #[test]
    fn test_container_kind_parse() {
        assert_eq!(ContainerKind::parse("form"), Some(ContainerKind::Form));
        assert_eq!(ContainerKind::parse("div"), Some(ContainerKind::Div));
        assert_eq!(ContainerKind::parse("section"), Some(ContainerKind::Section));
        assert_eq!(ContainerKind::parse("article"), Some(ContainerKind::Article));
        assert_eq!(ContainerKind::parse("span"), None);
    }

    #[test]
    fn test_container_kind_round_trip() {
        for kind in [
            ContainerKind::Form,
            ContainerKind::Div,
            ContainerKind::Section,
            ContainerKind::Article,
        ] {
            assert_eq!(ContainerKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_append_builds_child_order() {
        let mut tree = FormTree::new(vec!["root".to_string()]);
        let a = tree.append(tree.root(), NodeKind::Separator, vec![]);
        let b = tree.append(tree.root(), NodeKind::LineSpacer, vec![]);
        assert_eq!(tree.children(tree.root()), &[a, b]);
    }

    #[test]
    fn test_insert_before_anchor() {
        let mut tree = FormTree::new(vec!["root".to_string()]);
        let anchor = tree.append(tree.root(), NodeKind::Separator, vec![]);
        let inserted = tree.insert_before(
            tree.root(),
            anchor,
            container(ContainerKind::Div),
            vec!["before".to_string()],
        );
        assert_eq!(tree.children(tree.root()), &[inserted, anchor]);
    }

    #[test]
    fn test_insert_before_missing_anchor_appends() {
        let mut tree = FormTree::new(vec!["root".to_string()]);
        let first = tree.append(tree.root(), NodeKind::Separator, vec![]);
        let orphan_anchor = NodeId(999);
        let inserted = tree.insert_before(
            tree.root(),
            orphan_anchor,
            NodeKind::LineSpacer,
            vec![],
        );
        assert_eq!(tree.children(tree.root()), &[first, inserted]);
    }

    #[test]
    fn test_detach_unlinks_node() {
        let mut tree = FormTree::new(vec!["root".to_string()]);
        let child = tree.append(tree.root(), NodeKind::Separator, vec![]);
        assert!(tree.detach(child));
        assert!(tree.children(tree.root()).is_empty());
        assert!(!tree.detach(child));
    }

    #[test]
    fn test_find_child_by_class() {
        let mut tree = FormTree::new(vec!["root".to_string()]);
        tree.append(tree.root(), container(ContainerKind::Div), vec!["a".to_string()]);
        let b = tree.append(tree.root(), container(ContainerKind::Div), vec!["b".to_string()]);
        assert_eq!(tree.find_child_by_class(tree.root(), "b"), Some(b));
        assert_eq!(tree.find_child_by_class(tree.root(), "missing"), None);
    }

    #[test]
    fn test_class_prefix() {
        let mut tree = FormTree::new(vec!["root".to_string()]);
        let id = tree.append(
            tree.root(),
            NodeKind::Element {
                text: "note".to_string(),
            },
            vec!["proc-note".to_string()],
        );
        assert!(tree.node(id).has_class_prefix("proc"));
        assert!(!tree.node(id).has_class_prefix("field"));
    }
}
