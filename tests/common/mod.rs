pub mod fixtures;

use xbind::{DataSourceNode, IncludedTypeSet, TypeDescriptor, XmlCursor, XmlNode};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// `Product` by default, `BookProduct` for `xsi:type="Book"`. `Toy` is unknown.
pub fn catalog_types() -> IncludedTypeSet {
    IncludedTypeSet::new(TypeDescriptor::new("Product"))
        .include("Book", TypeDescriptor::new("BookProduct"))
}

pub fn sku<'a>(node: XmlNode<'a, 'a>) -> String {
    node.attribute_value(None, "sku").unwrap_or_default()
}

/// Advances `cursor` to the end, collecting the `sku` of every stop.
pub fn skus<'a, C>(cursor: &mut C) -> Vec<String>
where
    C: XmlCursor<'a, XmlNode<'a, 'a>>,
{
    let mut skus = Vec::new();
    while cursor.move_next() {
        if let Some(node) = cursor.value() {
            skus.push(sku(node));
        }
    }
    skus
}
