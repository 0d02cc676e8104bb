//! Nodes paired with the type they were resolved to.

use crate::lazy::Lazy;
use crate::types::IncludedType;
use xbind_xpath::{DataSourceNode, XSI_NAMESPACE};

/// Read access to a node and its resolved type.
///
/// `value()` (from [`Lazy`]) is the underlying node, absent when there is none.
pub trait TypedNode<'a, N: DataSourceNode<'a>>: Lazy<N> {
    fn included_type(&self) -> Option<&IncludedType>;

    /// The marker that selected the resolved type; `None` for the default type.
    fn xsi_type(&self) -> Option<&str> {
        self.included_type()
            .and_then(|included| included.xsi_type.as_deref())
    }

    /// True when the node carries `xsi:nil="true"` (or `"1"`).
    fn is_nil(&self) -> bool {
        self.value()
            .and_then(|node| node.attribute_value(Some(XSI_NAMESPACE), "nil"))
            .is_some_and(|nil| matches!(nil.trim(), "true" | "1"))
    }
}

/// An immutable capture of a cursor position.
///
/// Always resolvable, so it can be handed back to `move_to` on any cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot<N> {
    node: N,
    included_type: IncludedType,
}

impl<N: Copy> PositionSnapshot<N> {
    pub fn new(node: N, included_type: IncludedType) -> Self {
        Self {
            node,
            included_type,
        }
    }

    pub fn node(&self) -> N {
        self.node
    }

    pub fn resolved_type(&self) -> &IncludedType {
        &self.included_type
    }
}

impl<N: Copy> Lazy<N> for PositionSnapshot<N> {
    fn value(&self) -> Option<N> {
        Some(self.node)
    }
}

impl<'a, N: DataSourceNode<'a>> TypedNode<'a, N> for PositionSnapshot<N> {
    fn included_type(&self) -> Option<&IncludedType> {
        Some(&self.included_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;
    use xbind_xpath::tests::create_test_tree;

    #[test]
    fn test_snapshot_reports_node_and_type() {
        let tree = create_test_tree();
        let toy = IncludedType::new(Some("Toy"), TypeDescriptor::new("ToyProduct"));
        let snapshot = PositionSnapshot::new(tree.node(11), toy);

        assert!(snapshot.has_value());
        assert_eq!(snapshot.node().id, 11);
        assert_eq!(snapshot.xsi_type(), Some("Toy"));
        assert!(snapshot.is_nil());
    }

    #[test]
    fn test_is_nil_false_without_attribute() {
        let tree = create_test_tree();
        let product = IncludedType::new(None, TypeDescriptor::new("Product"));
        let snapshot = PositionSnapshot::new(tree.node(6), product);
        assert!(!snapshot.is_nil());
        assert_eq!(snapshot.xsi_type(), None);
    }
}
