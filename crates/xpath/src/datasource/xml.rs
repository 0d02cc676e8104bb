// XML tree backed by roxmltree
use super::{DataSourceNode, NodeType, QName};
use roxmltree::Node;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Owns a parsed `roxmltree::Document`.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self { doc })
    }

    pub fn root_node(&self) -> XmlNode<'_, 'input> {
        XmlNode::Element(self.doc.root())
    }

    /// The document element (the single top-level element).
    pub fn document_element(&self) -> XmlNode<'_, 'input> {
        XmlNode::Element(self.doc.root_element())
    }
}

impl fmt::Debug for XmlDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("root", &self.doc.root_element().tag_name().name())
            .finish_non_exhaustive()
    }
}

/// Either a tree node or an attribute. roxmltree keeps attributes as data on
/// their element, so an attribute is addressed by its owner and index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a, 'input> {
    /// Any tree node: root, element, text, comment or processing instruction.
    Element(Node<'a, 'input>),
    /// The `index`-th attribute of `parent`.
    Attribute {
        parent: Node<'a, 'input>,
        index: usize,
    },
}

impl<'a, 'input> XmlNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        XmlNode::Element(node)
    }

    pub fn inner(&self) -> Option<Node<'a, 'input>> {
        match self {
            XmlNode::Element(node) => Some(*node),
            XmlNode::Attribute { .. } => None,
        }
    }

    fn owner(&self) -> Node<'a, 'input> {
        match self {
            XmlNode::Element(node) => *node,
            XmlNode::Attribute { parent, .. } => *parent,
        }
    }

    fn same_document(&self, other: &Self) -> bool {
        std::ptr::eq(self.owner().document(), other.owner().document())
    }

    fn document_addr(&self) -> usize {
        self.owner().document() as *const roxmltree::Document<'input> as usize
    }
}

impl<'a, 'input> PartialEq for XmlNode<'a, 'input> {
    fn eq(&self, other: &Self) -> bool {
        if !self.same_document(other) {
            return false;
        }
        match (self, other) {
            (XmlNode::Element(a), XmlNode::Element(b)) => a.id() == b.id(),
            (
                XmlNode::Attribute {
                    parent: p1,
                    index: i1,
                },
                XmlNode::Attribute {
                    parent: p2,
                    index: i2,
                },
            ) => p1.id() == p2.id() && i1 == i2,
            _ => false,
        }
    }
}

impl<'a, 'input> Eq for XmlNode<'a, 'input> {}

impl<'a, 'input> PartialOrd for XmlNode<'a, 'input> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, 'input> Ord for XmlNode<'a, 'input> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Nodes of different documents are ordered by document, never equal.
        let by_document = self.document_addr().cmp(&other.document_addr());
        if by_document != Ordering::Equal {
            return by_document;
        }
        let (a, b) = (self.owner().id().get(), other.owner().id().get());
        match (self, other) {
            (
                XmlNode::Attribute { index: i1, .. },
                XmlNode::Attribute { index: i2, .. },
            ) => a.cmp(&b).then(i1.cmp(i2)),
            // An element precedes its own attributes.
            (XmlNode::Element(_), XmlNode::Attribute { .. }) => a.cmp(&b).then(Ordering::Less),
            (XmlNode::Attribute { .. }, XmlNode::Element(_)) => a.cmp(&b).then(Ordering::Greater),
            (XmlNode::Element(_), XmlNode::Element(_)) => a.cmp(&b),
        }
    }
}

impl<'a, 'input> Hash for XmlNode<'a, 'input> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            XmlNode::Element(node) => {
                0u8.hash(state);
                node.id().hash(state);
            }
            XmlNode::Attribute { parent, index } => {
                1u8.hash(state);
                parent.id().hash(state);
                index.hash(state);
            }
        }
    }
}

fn prefix_for<'a>(scope: Node<'a, 'a>, namespace: Option<&'a str>) -> Option<&'a str> {
    match namespace {
        None => None,
        Some(XML_NAMESPACE) => Some("xml"),
        Some(uri) => scope.lookup_prefix(uri),
    }
}

impl<'a> DataSourceNode<'a> for XmlNode<'a, 'a> {
    fn node_type(&self) -> NodeType {
        match self {
            XmlNode::Element(node) => {
                if node.is_root() {
                    NodeType::Root
                } else if node.is_text() {
                    NodeType::Text
                } else if node.is_comment() {
                    NodeType::Comment
                } else if node.is_pi() {
                    NodeType::ProcessingInstruction
                } else {
                    NodeType::Element
                }
            }
            XmlNode::Attribute { .. } => NodeType::Attribute,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        match self {
            XmlNode::Element(node) => {
                if node.is_element() {
                    let tag = node.tag_name();
                    Some(QName {
                        prefix: prefix_for(*node, tag.namespace()),
                        local_part: tag.name(),
                    })
                } else if node.is_pi() {
                    node.pi().map(|pi| QName {
                        prefix: None,
                        local_part: pi.target,
                    })
                } else {
                    None
                }
            }
            XmlNode::Attribute { parent, index } => {
                parent.attributes().nth(*index).map(|attr| QName {
                    prefix: prefix_for(*parent, attr.namespace()),
                    local_part: attr.name(),
                })
            }
        }
    }

    fn namespace_uri(&self) -> Option<&'a str> {
        match self {
            XmlNode::Element(node) => node.tag_name().namespace(),
            XmlNode::Attribute { parent, index } => {
                parent.attributes().nth(*index).and_then(|attr| attr.namespace())
            }
        }
    }

    fn string_value(&self) -> String {
        match self {
            XmlNode::Element(node) => {
                if node.is_element() || node.is_root() {
                    node.descendants()
                        .filter(|n| n.is_text())
                        .filter_map(|n| n.text())
                        .collect()
                } else if node.is_pi() {
                    node.pi()
                        .and_then(|pi| pi.value)
                        .unwrap_or_default()
                        .to_string()
                } else {
                    node.text().unwrap_or_default().to_string()
                }
            }
            XmlNode::Attribute { parent, index } => parent
                .attributes()
                .nth(*index)
                .map(|attr| attr.value().to_string())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Element(node) if node.is_element() => {
                let parent = *node;
                let count = node.attributes().len();
                Box::new((0..count).map(move |index| XmlNode::Attribute { parent, index }))
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Element(node) => Box::new(node.children().map(XmlNode::Element)),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            XmlNode::Element(node) => node.parent().map(XmlNode::Element),
            XmlNode::Attribute { parent, .. } => Some(XmlNode::Element(*parent)),
        }
    }

    fn is_same_position(&self, other: &Self) -> bool {
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::XSI_NAMESPACE;

    const ORDERS: &str = r#"<orders xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
        <order id="1" xsi:type="Rush">Tea</order>
        <order id="2">Cake</order>
    </orders>"#;

    fn find_child<'a>(node: XmlNode<'a, 'a>, name: &str) -> XmlNode<'a, 'a> {
        node.children()
            .find(|n| n.name().is_some_and(|q| q.local_part == name))
            .unwrap()
    }

    #[test]
    fn test_attributes_carry_prefix_and_namespace() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        let orders = find_child(doc.root_node(), "orders");
        let order = find_child(orders, "order");

        let attrs: Vec<_> = order.attributes().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].node_type(), NodeType::Attribute);
        assert_eq!(attrs[0].name().unwrap().local_part, "id");
        assert_eq!(attrs[0].namespace_uri(), None);
        assert_eq!(attrs[1].name().unwrap().prefix, Some("xsi"));
        assert_eq!(attrs[1].namespace_uri(), Some(XSI_NAMESPACE));
        assert_eq!(attrs[1].string_value(), "Rush");
        assert_eq!(attrs[0].parent(), Some(order));

        assert_eq!(
            order.attribute_value(Some(XSI_NAMESPACE), "type").as_deref(),
            Some("Rush")
        );
    }

    #[test]
    fn test_same_position_requires_same_document() {
        let first = XmlDocument::parse(ORDERS).unwrap();
        let second = XmlDocument::parse(ORDERS).unwrap();
        let a = find_child(first.root_node(), "orders");
        let b = find_child(second.root_node(), "orders");

        assert!(a.is_same_position(&find_child(first.root_node(), "orders")));
        assert!(!a.is_same_position(&b));
        assert!(a.value_equals(&b));
    }

    #[test]
    fn test_document_order_puts_attributes_after_owner() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        let orders = doc.document_element();
        let first = find_child(orders, "order");
        let attr = first.attributes().next().unwrap();
        let text = first.children().next().unwrap();

        assert!(first < attr);
        assert!(attr < text);
        assert_eq!(text.string_value(), "Tea");
        assert_eq!(orders.root(), doc.root_node());
    }

    #[test]
    fn test_order_agrees_with_equality_across_documents() {
        let first = XmlDocument::parse(ORDERS).unwrap();
        let second = XmlDocument::parse(ORDERS).unwrap();
        let a = first.document_element();
        let b = second.document_element();

        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        assert_eq!(a.cmp(&first.document_element()), Ordering::Equal);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let err = XmlDocument::parse("<orders>").unwrap_err();
        assert!(!err.to_string().is_empty());
        assert!(format!("{:?}", XmlDocument::parse(ORDERS).unwrap()).contains("orders"));
    }
}
