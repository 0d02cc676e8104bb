//! Resolution of the declared type of a node from its `xsi:type` marker.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use xbind_xpath::{DataSourceNode, XSI_NAMESPACE};

/// Opaque handle to the type a binding layer materializes for a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A type a query may yield, keyed by the marker that selects it.
/// `xsi_type` is `None` for the declared default type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedType {
    pub xsi_type: Option<String>,
    pub descriptor: TypeDescriptor,
}

impl IncludedType {
    pub fn new(xsi_type: Option<&str>, descriptor: TypeDescriptor) -> Self {
        Self {
            xsi_type: xsi_type.map(str::to_string),
            descriptor,
        }
    }
}

/// Maps a type marker to an included type.
///
/// Lookups must be a pure function of the marker. `None` asks for the default type.
///
/// Markers are not resolved as QNames: register each marker spelled exactly as
/// documents write it, prefix included, so `a:Book` and `b:Book` are distinct
/// even when both prefixes bind the same namespace.
pub trait IncludedTypeMap {
    fn try_get(&self, xsi_type: Option<&str>) -> Option<&IncludedType>;
}

impl<M: IncludedTypeMap + ?Sized> IncludedTypeMap for &M {
    fn try_get(&self, xsi_type: Option<&str>) -> Option<&IncludedType> {
        (**self).try_get(xsi_type)
    }
}

impl<M: IncludedTypeMap + ?Sized> IncludedTypeMap for Box<M> {
    fn try_get(&self, xsi_type: Option<&str>) -> Option<&IncludedType> {
        (**self).try_get(xsi_type)
    }
}

impl<M: IncludedTypeMap + ?Sized> IncludedTypeMap for Rc<M> {
    fn try_get(&self, xsi_type: Option<&str>) -> Option<&IncludedType> {
        (**self).try_get(xsi_type)
    }
}

impl<M: IncludedTypeMap + ?Sized> IncludedTypeMap for Arc<M> {
    fn try_get(&self, xsi_type: Option<&str>) -> Option<&IncludedType> {
        (**self).try_get(xsi_type)
    }
}

/// The default type plus any number of marker-selected subtypes.
#[derive(Debug, Clone)]
pub struct IncludedTypeSet {
    default: IncludedType,
    included: HashMap<String, IncludedType>,
}

impl IncludedTypeSet {
    pub fn new(default: TypeDescriptor) -> Self {
        Self {
            default: IncludedType::new(None, default),
            included: HashMap::new(),
        }
    }

    /// Registers `descriptor` for nodes marked `xsi:type="{xsi_type}"`.
    /// A later registration of the same marker replaces the earlier one.
    pub fn include(mut self, xsi_type: &str, descriptor: TypeDescriptor) -> Self {
        let xsi_type = xsi_type.trim();
        self.included.insert(
            xsi_type.to_string(),
            IncludedType::new(Some(xsi_type), descriptor),
        );
        self
    }

    pub fn default_type(&self) -> &IncludedType {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.included.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl IncludedTypeMap for IncludedTypeSet {
    fn try_get(&self, xsi_type: Option<&str>) -> Option<&IncludedType> {
        match xsi_type {
            None => Some(&self.default),
            Some(marker) => self.included.get(marker),
        }
    }
}

/// Reads the `xsi:type` marker of `node`. Whitespace is trimmed; an empty
/// attribute counts as no marker. The value is compared literally, prefix included.
pub fn type_marker<'a, N: DataSourceNode<'a>>(node: &N) -> Option<String> {
    node.attribute_value(Some(XSI_NAMESPACE), "type")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolves the included type of `node` through `types`.
pub fn resolve<'a, N, M>(types: &M, node: &N) -> Option<IncludedType>
where
    N: DataSourceNode<'a>,
    M: IncludedTypeMap + ?Sized,
{
    let marker = type_marker(node);
    types.try_get(marker.as_deref()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbind_xpath::tests::{MockTree, create_test_tree};

    fn catalog_types() -> IncludedTypeSet {
        IncludedTypeSet::new(TypeDescriptor::new("Product"))
            .include("Book", TypeDescriptor::new("BookProduct"))
    }

    #[test]
    fn test_try_get_default_and_included() {
        let types = catalog_types();
        assert_eq!(types.try_get(None).unwrap().descriptor.name(), "Product");
        let book = types.try_get(Some("Book")).unwrap();
        assert_eq!(book.xsi_type.as_deref(), Some("Book"));
        assert_eq!(book.descriptor.name(), "BookProduct");
        assert!(types.try_get(Some("Toy")).is_none());
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_type_marker_reads_xsi_type() {
        let tree = create_test_tree();
        assert_eq!(type_marker(&tree.node(2)).as_deref(), Some("Book"));
        assert_eq!(type_marker(&tree.node(6)), None);
        assert_eq!(type_marker(&tree.node(11)).as_deref(), Some("Toy"));
    }

    #[test]
    fn test_type_marker_ignores_unqualified_and_blank() {
        let xsi = Some(("xsi", xbind_xpath::XSI_NAMESPACE));
        let mut tree = MockTree::new();
        let plain = tree.element(MockTree::ROOT, "plain");
        tree.attribute(plain, "type", "Book");
        let blank = tree.element(MockTree::ROOT, "blank");
        tree.namespaced_attribute(blank, xsi, "type", "  ");
        let padded = tree.element(MockTree::ROOT, "padded");
        tree.namespaced_attribute(padded, xsi, "type", " Book ");

        assert_eq!(type_marker(&tree.node(plain)), None);
        assert_eq!(type_marker(&tree.node(blank)), None);
        assert_eq!(type_marker(&tree.node(padded)).as_deref(), Some("Book"));
    }

    #[test]
    fn test_prefixed_markers_match_literally() {
        let xsi = Some(("xsi", xbind_xpath::XSI_NAMESPACE));
        let mut tree = MockTree::new();
        let a = tree.element(MockTree::ROOT, "a");
        tree.namespaced_attribute(a, xsi, "type", "a:Book");
        let b = tree.element(MockTree::ROOT, "b");
        tree.namespaced_attribute(b, xsi, "type", "b:Book");

        let types = catalog_types().include("a:Book", TypeDescriptor::new("BookProduct"));
        assert_eq!(type_marker(&tree.node(b)).as_deref(), Some("b:Book"));
        assert!(resolve(&types, &tree.node(a)).is_some());
        assert!(resolve(&types, &tree.node(b)).is_none());
    }

    #[test]
    fn test_resolve_through_shared_map() {
        let tree = create_test_tree();
        let types = Arc::new(catalog_types());
        let resolved = resolve(&types, &tree.node(6)).unwrap();
        assert_eq!(resolved.xsi_type, None);
        assert!(resolve(&types, &tree.node(11)).is_none());
    }
}
