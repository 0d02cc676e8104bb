//! Tabular rendering of the nodes a cursor visits.

use std::fmt;
use xbind_cursor::{IncludedType, IncludedTypeMap, TypeDescriptor, TypedNode, XmlCursor};
use xbind_xpath::{DataSourceNode, NodeType};

/// A type map that resolves every node, whatever its marker, to one type.
#[derive(Debug, Clone)]
pub struct AnyType {
    included: IncludedType,
}

impl AnyType {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            included: IncludedType::new(None, descriptor),
        }
    }
}

impl IncludedTypeMap for AnyType {
    fn try_get(&self, _xsi_type: Option<&str>) -> Option<&IncludedType> {
        Some(&self.included)
    }
}

/// One visited node: `index<TAB>type<TAB>name<TAB>value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub index: usize,
    pub type_name: String,
    pub name: String,
    pub value: String,
    pub nil: bool,
}

impl Entry {
    /// Describes the node `cursor` is positioned on, if any.
    pub fn describe<'a, N, C>(index: usize, cursor: &C) -> Option<Self>
    where
        N: DataSourceNode<'a>,
        C: TypedNode<'a, N> + ?Sized,
    {
        let node = cursor.value()?;
        let included = cursor.included_type()?;
        Some(Self {
            index,
            type_name: included.descriptor.name().to_string(),
            name: display_name(&node),
            value: node.string_value().trim().to_string(),
            nil: cursor.is_nil(),
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.nil { "(nil)" } else { &self.value };
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.index, self.type_name, self.name, value
        )
    }
}

/// Drives `cursor` to the end and describes every node it stops on.
pub fn collect<'a, N, C>(cursor: &mut C) -> Vec<Entry>
where
    N: DataSourceNode<'a>,
    C: XmlCursor<'a, N> + ?Sized,
{
    let mut entries = Vec::new();
    while cursor.move_next() {
        if let Some(entry) = Entry::describe(entries.len(), &*cursor) {
            entries.push(entry);
        }
    }
    entries
}

fn display_name<'a, N: DataSourceNode<'a>>(node: &N) -> String {
    match (node.node_type(), node.name()) {
        (_, Some(name)) => match name.prefix {
            Some(prefix) => format!("{}:{}", prefix, name.local_part),
            None => name.local_part.to_string(),
        },
        (NodeType::Root, None) => "/".to_string(),
        (NodeType::Text, None) => "#text".to_string(),
        (NodeType::Comment, None) => "#comment".to_string(),
        (_, None) => String::new(),
    }
}
