//! The general cursor capability shared by read-only and writable cursors.

use crate::error::CursorError;
use crate::lazy::Lazy;
use crate::node::{PositionSnapshot, TypedNode};
use crate::types::TypeDescriptor;
use xbind_xpath::DataSourceNode;

/// A resumable walk over the result of a query, yielding typed nodes.
///
/// A cursor is either positioned (a node and its resolved type) or not; being
/// before the first item and past the last item look the same to callers.
pub trait XmlCursor<'a, N: DataSourceNode<'a>>: TypedNode<'a, N> {
    /// Re-evaluates the query against the current parent and drops the position.
    fn reset(&mut self) -> Result<(), CursorError>;

    /// Advances to the next node whose type resolves. Returns false at the end.
    fn move_next(&mut self) -> bool;

    /// Resets, then positions the cursor on the result at the same position as
    /// `target`.
    fn move_to(&mut self, target: &dyn Lazy<N>) -> Result<(), CursorError>;

    /// Discards any remaining results and leaves the cursor unpositioned.
    fn move_to_end(&mut self);

    /// Captures the current position for a later `move_to`.
    fn save(&self) -> Result<PositionSnapshot<N>, CursorError>;

    fn set_nil(&mut self, nil: bool) -> Result<(), CursorError>;

    /// Removes all content and attributes of the current node.
    fn clear(&mut self) -> Result<(), CursorError>;

    /// Sets or, with `None`, removes an attribute of the current node.
    fn set_attribute(
        &mut self,
        namespace_uri: Option<&str>,
        local: &str,
        value: Option<&str>,
    ) -> Result<(), CursorError>;

    /// Returns a prefix bound to `namespace_uri`, declaring one if needed.
    fn ensure_prefix(&mut self, namespace_uri: &str) -> Result<String, CursorError>;

    /// Moves to the next node, creating one of type `ty` when there is none.
    fn make_next(&mut self, ty: &TypeDescriptor) -> Result<(), CursorError>;

    /// Inserts a node of type `ty` at the cursor and positions on it.
    fn create(&mut self, ty: &TypeDescriptor) -> Result<(), CursorError>;

    /// Changes the represented type of the current node to `ty`.
    fn coerce(&mut self, ty: &TypeDescriptor) -> Result<(), CursorError>;

    fn remove(&mut self) -> Result<(), CursorError>;

    fn remove_all_next(&mut self) -> Result<(), CursorError>;
}
