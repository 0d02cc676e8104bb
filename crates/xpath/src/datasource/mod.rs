//! Defines the core abstraction for a navigable, read-only node tree.
use std::hash::Hash;

pub mod xml;

/// Namespace of the `xsi:type` and `xsi:nil` attributes.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

/// The type of a node in the tree, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// The contract for a node in a read-only, hierarchical document.
///
/// The query engine and the cursors are written exclusively against this trait.
/// `PartialEq`, `Hash` and `Ord` describe *positions*: two handles are equal when
/// they point at the same place in the same document, and `Ord` is document order.
/// Value equality is a separate operation, see [`DataSourceNode::value_equals`].
///
/// `'a` is the lifetime of the underlying document.
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    /// The type of the node (Element, Text, Attribute, etc.).
    fn node_type(&self) -> NodeType;

    /// The qualified name of the node. `None` for text, comment and root nodes.
    /// For a processing-instruction, this is its target.
    fn name(&self) -> Option<QName<'a>>;

    /// The namespace URI of an element or attribute name, if it has one.
    fn namespace_uri(&self) -> Option<&'a str> {
        None
    }

    /// The string value of the node, as defined by the XPath 1.0 `string()` function.
    fn string_value(&self) -> String;

    /// An iterator over the attribute nodes of this node.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// An iterator over the child nodes of this node.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// The parent node. `None` for the root node.
    fn parent(&self) -> Option<Self>;

    /// True when both handles denote the same location in the same document.
    /// Nodes of different documents are never at the same position.
    fn is_same_position(&self, other: &Self) -> bool;

    /// True when both nodes carry the same kind, expanded name and string value,
    /// wherever they are located.
    fn value_equals(&self, other: &Self) -> bool {
        self.node_type() == other.node_type()
            && self.name().map(|q| q.local_part) == other.name().map(|q| q.local_part)
            && self.namespace_uri() == other.namespace_uri()
            && self.string_value() == other.string_value()
    }

    /// Looks up an attribute by its expanded name and returns its value.
    fn attribute_value(&self, namespace_uri: Option<&str>, local: &str) -> Option<String> {
        self.attributes()
            .find(|attr| {
                attr.namespace_uri() == namespace_uri
                    && attr.name().is_some_and(|q| q.local_part == local)
            })
            .map(|attr| attr.string_value())
    }

    /// The top-most ancestor of this node (the node itself if it has no parent).
    fn root(&self) -> Self {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }
}

// Test utilities - publicly available for integration testing in downstream crates
pub mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::hash::Hasher;

    #[derive(Debug, Clone)]
    struct MockNodeData<'a> {
        node_type: NodeType,
        name: Option<QName<'a>>,
        namespace: Option<&'a str>,
        text: String,
        parent: Option<usize>,
        children: Vec<usize>,
        attributes: Vec<usize>,
    }

    /// An in-memory tree assembled node by node. Node `0` is the root.
    #[derive(Debug)]
    pub struct MockTree<'a> {
        nodes: Vec<MockNodeData<'a>>,
    }

    /// A node handle that borrows its tree so it can navigate itself.
    #[derive(Debug, Clone, Copy)]
    pub struct MockNode<'a> {
        pub id: usize,
        pub tree: &'a MockTree<'a>,
    }

    impl<'a> MockTree<'a> {
        pub const ROOT: usize = 0;

        pub fn new() -> Self {
            Self {
                nodes: vec![MockNodeData {
                    node_type: NodeType::Root,
                    name: None,
                    namespace: None,
                    text: String::new(),
                    parent: None,
                    children: vec![],
                    attributes: vec![],
                }],
            }
        }

        fn push(&mut self, parent: usize, data: MockNodeData<'a>, as_attribute: bool) -> usize {
            let id = self.nodes.len();
            self.nodes.push(data);
            if as_attribute {
                self.nodes[parent].attributes.push(id);
            } else {
                self.nodes[parent].children.push(id);
            }
            id
        }

        pub fn element(&mut self, parent: usize, local_part: &'a str) -> usize {
            let data = MockNodeData {
                node_type: NodeType::Element,
                name: Some(QName {
                    prefix: None,
                    local_part,
                }),
                namespace: None,
                text: String::new(),
                parent: Some(parent),
                children: vec![],
                attributes: vec![],
            };
            self.push(parent, data, false)
        }

        pub fn attribute(&mut self, parent: usize, local_part: &'a str, value: &str) -> usize {
            self.namespaced_attribute(parent, None, local_part, value)
        }

        /// Adds an attribute in a namespace; `("xsi", XSI_NAMESPACE)` for type markers.
        pub fn namespaced_attribute(
            &mut self,
            parent: usize,
            namespace: Option<(&'a str, &'a str)>,
            local_part: &'a str,
            value: &str,
        ) -> usize {
            let data = MockNodeData {
                node_type: NodeType::Attribute,
                name: Some(QName {
                    prefix: namespace.map(|(prefix, _)| prefix),
                    local_part,
                }),
                namespace: namespace.map(|(_, uri)| uri),
                text: value.to_string(),
                parent: Some(parent),
                children: vec![],
                attributes: vec![],
            };
            self.push(parent, data, true)
        }

        pub fn text(&mut self, parent: usize, value: &str) -> usize {
            let data = MockNodeData {
                node_type: NodeType::Text,
                name: None,
                namespace: None,
                text: value.to_string(),
                parent: Some(parent),
                children: vec![],
                attributes: vec![],
            };
            self.push(parent, data, false)
        }

        pub fn node(&'a self, id: usize) -> MockNode<'a> {
            MockNode { id, tree: self }
        }

        fn collect_text(&self, id: usize, out: &mut String) {
            let data = &self.nodes[id];
            match data.node_type {
                NodeType::Text | NodeType::Attribute | NodeType::Comment => out.push_str(&data.text),
                _ => {
                    for &child in &data.children {
                        self.collect_text(child, out);
                    }
                }
            }
        }
    }

    impl Default for MockTree<'_> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<'a> PartialEq for MockNode<'a> {
        fn eq(&self, other: &Self) -> bool {
            self.is_same_position(other)
        }
    }
    impl<'a> Eq for MockNode<'a> {}

    impl<'a> PartialOrd for MockNode<'a> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    // Ids are assigned in insertion order, which is document order for trees
    // built top-down.
    impl<'a> Ord for MockNode<'a> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.id.cmp(&other.id)
        }
    }

    impl<'a> Hash for MockNode<'a> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl<'a> DataSourceNode<'a> for MockNode<'a> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.id].node_type
        }

        fn name(&self) -> Option<QName<'a>> {
            self.tree.nodes[self.id].name
        }

        fn namespace_uri(&self) -> Option<&'a str> {
            self.tree.nodes[self.id].namespace
        }

        fn string_value(&self) -> String {
            let mut out = String::new();
            self.tree.collect_text(self.id, &mut out);
            out
        }

        fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .attributes
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .children
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn parent(&self) -> Option<Self> {
            self.tree.nodes[self.id].parent.map(|id| MockNode {
                id,
                tree: self.tree,
            })
        }

        fn is_same_position(&self, other: &Self) -> bool {
            std::ptr::eq(self.tree, other.tree) && self.id == other.id
        }
    }

    /// Creates a small catalogue used across unit tests:
    /// <catalog>                                        <!-- 1 -->
    ///   <item xsi:type="Book" sku="b1">Dune</item>     <!-- 2, attrs 3 4, text 5 -->
    ///   <item sku="p1">Pen</item>                      <!-- 6, attr 7, text 8 -->
    ///   <note>misc</note>                              <!-- 9, text 10 -->
    ///   <item xsi:type="Toy" xsi:nil="true"/>          <!-- 11, attrs 12 13 -->
    /// </catalog>
    pub fn create_test_tree<'a>() -> MockTree<'a> {
        let xsi = Some(("xsi", XSI_NAMESPACE));
        let mut tree = MockTree::new();
        let catalog = tree.element(MockTree::ROOT, "catalog");

        let book = tree.element(catalog, "item");
        tree.namespaced_attribute(book, xsi, "type", "Book");
        tree.attribute(book, "sku", "b1");
        tree.text(book, "Dune");

        let pen = tree.element(catalog, "item");
        tree.attribute(pen, "sku", "p1");
        tree.text(pen, "Pen");

        let note = tree.element(catalog, "note");
        tree.text(note, "misc");

        let toy = tree.element(catalog, "item");
        tree.namespaced_attribute(toy, xsi, "type", "Toy");
        tree.namespaced_attribute(toy, xsi, "nil", "true");
        tree
    }

}
