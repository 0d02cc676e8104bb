//! Typed, read-only cursors over XPath-selected XML nodes.
//!
//! ```no_run
//! use xbind::{CursorFlags, IncludedTypeSet, ReadOnlyCursor, TypeDescriptor, XmlCursor, XmlDocument};
//!
//! # fn main() -> Result<(), xbind::BindError> {
//! let doc = XmlDocument::parse("<orders><order/></orders>")?;
//! let types = IncludedTypeSet::new(TypeDescriptor::new("Order"));
//! let path = xbind::compile("orders/order")?;
//! let mut cursor = ReadOnlyCursor::new(Some(doc.root_node()), path, types, CursorFlags::MULTIPLE)?;
//! while cursor.move_next() {
//!     println!("{:?}", cursor.current());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod report;

pub use error::BindError;
pub use report::{AnyType, Entry};

pub use xbind_cursor::{
    ConfigError, CursorError, CursorFlags, Deferred, IncludedType, IncludedTypeMap,
    IncludedTypeSet, Lazy, LazyCell, PositionSnapshot, ReadOnlyCursor, ReadOnlyCursorBuilder,
    TypeDescriptor, TypeMapConfig, TypedNode, XmlCursor, type_marker,
};
pub use xbind_xpath::{
    CompiledXPath, DataSourceNode, NodeType, QName, XPathError, XSI_NAMESPACE, XmlDocument,
    XmlNode, compile,
};
