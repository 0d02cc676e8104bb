//! A cursor that walks query results and never writes.

use crate::cursor::XmlCursor;
use crate::error::CursorError;
use crate::flags::CursorFlags;
use crate::lazy::Lazy;
use crate::node::{PositionSnapshot, TypedNode};
use crate::types::{IncludedType, IncludedTypeMap, TypeDescriptor, resolve};
use std::fmt;
use std::iter::Peekable;
use std::marker::PhantomData;
use xbind_xpath::{CompiledXPath, DataSourceNode, NodeSet};

/// Walks the nodes selected by `path` under a lazily resolved parent, keeping
/// only nodes whose `xsi:type` marker is known to the type map.
///
/// Every mutating operation of [`XmlCursor`] fails with
/// [`CursorError::NotMutable`].
pub struct ReadOnlyCursor<N, P, M> {
    parent: P,
    path: CompiledXPath,
    included_types: M,
    flags: CursorFlags,
    results: Option<Peekable<NodeSet<N>>>,
    position: Option<PositionSnapshot<N>>,
}

impl<'a, N, P, M> ReadOnlyCursor<N, P, M>
where
    N: DataSourceNode<'a> + 'a,
    P: Lazy<N>,
    M: IncludedTypeMap,
{
    /// Builds the cursor and evaluates the query once, leaving it before the
    /// first result.
    pub fn new(
        parent: P,
        path: CompiledXPath,
        included_types: M,
        flags: CursorFlags,
    ) -> Result<Self, CursorError> {
        if flags.supports_mutation() {
            log::warn!(
                "Read-only cursor for '{}' was requested as mutable; writes will be rejected",
                path
            );
        }
        let mut cursor = Self {
            parent,
            path,
            included_types,
            flags,
            results: None,
            position: None,
        };
        cursor.evaluate()?;
        Ok(cursor)
    }

    pub fn builder() -> ReadOnlyCursorBuilder<N, P, M> {
        ReadOnlyCursorBuilder::new()
    }

    fn evaluate(&mut self) -> Result<(), CursorError> {
        self.position = None;
        self.results = match self.parent.value() {
            Some(parent) => {
                let nodes = self.path.select(parent)?;
                log::debug!("Query '{}' selected {} node(s)", self.path, nodes.len());
                Some(nodes.peekable())
            }
            None => {
                log::debug!("Parent of '{}' is not available yet", self.path);
                None
            }
        };
        Ok(())
    }

    fn set_at_end(&mut self) -> bool {
        self.position = None;
        false
    }

    fn drain(&mut self) {
        if let Some(results) = self.results.as_mut() {
            results.by_ref().for_each(drop);
        }
    }
}

impl<N: Copy, P, M> ReadOnlyCursor<N, P, M> {
    /// The node the cursor is positioned on.
    pub fn current(&self) -> Option<N> {
        self.position.as_ref().map(PositionSnapshot::node)
    }

    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }

    pub fn flags(&self) -> CursorFlags {
        self.flags
    }

    pub fn path(&self) -> &CompiledXPath {
        &self.path
    }
}

impl<N: Copy, P, M> Lazy<N> for ReadOnlyCursor<N, P, M> {
    fn value(&self) -> Option<N> {
        self.current()
    }
}

impl<'a, N, P, M> TypedNode<'a, N> for ReadOnlyCursor<N, P, M>
where
    N: DataSourceNode<'a>,
{
    fn included_type(&self) -> Option<&IncludedType> {
        self.position.as_ref().map(PositionSnapshot::resolved_type)
    }
}

impl<'a, N, P, M> XmlCursor<'a, N> for ReadOnlyCursor<N, P, M>
where
    N: DataSourceNode<'a> + 'a,
    P: Lazy<N>,
    M: IncludedTypeMap,
{
    fn reset(&mut self) -> Result<(), CursorError> {
        self.evaluate()
    }

    fn move_next(&mut self) -> bool {
        loop {
            let Some(results) = self.results.as_mut() else {
                return self.set_at_end();
            };
            let Some(candidate) = results.next() else {
                return self.set_at_end();
            };
            if !self.flags.allows_multiple_items() && results.peek().is_some() {
                log::debug!(
                    "Query '{}' yielded more than one node for a single-item cursor",
                    self.path
                );
                self.drain();
                return self.set_at_end();
            }
            match resolve(&self.included_types, &candidate) {
                Some(included_type) => {
                    self.position = Some(PositionSnapshot::new(candidate, included_type));
                    return true;
                }
                None => log::trace!("Skipping {:?}: type marker not included", candidate),
            }
        }
    }

    fn move_to(&mut self, target: &dyn Lazy<N>) -> Result<(), CursorError> {
        let target = target.value().ok_or(CursorError::CannotMoveToGivenNode)?;
        self.evaluate()?;

        let found = self
            .results
            .as_mut()
            .and_then(|results| results.find(|node| node.is_same_position(&target)));
        let Some(node) = found else {
            log::debug!("{:?} is not among the results of '{}'", target, self.path);
            return Err(CursorError::CannotMoveToGivenNode);
        };
        let Some(included_type) = resolve(&self.included_types, &node) else {
            log::debug!("{:?} has a type marker outside the type map", node);
            self.drain();
            return Err(CursorError::CannotMoveToGivenNode);
        };
        log::debug!("Moved to {:?} in '{}'", node, self.path);
        self.position = Some(PositionSnapshot::new(node, included_type));
        Ok(())
    }

    fn move_to_end(&mut self) {
        self.drain();
        self.set_at_end();
    }

    fn save(&self) -> Result<PositionSnapshot<N>, CursorError> {
        self.position.clone().ok_or(CursorError::NotPositioned)
    }

    fn set_nil(&mut self, _nil: bool) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn clear(&mut self) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn set_attribute(
        &mut self,
        _namespace_uri: Option<&str>,
        _local: &str,
        _value: Option<&str>,
    ) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn ensure_prefix(&mut self, _namespace_uri: &str) -> Result<String, CursorError> {
        Err(CursorError::NotMutable)
    }

    fn make_next(&mut self, _ty: &TypeDescriptor) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn create(&mut self, _ty: &TypeDescriptor) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn coerce(&mut self, _ty: &TypeDescriptor) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn remove(&mut self) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }

    fn remove_all_next(&mut self) -> Result<(), CursorError> {
        Err(CursorError::NotMutable)
    }
}

impl<N: fmt::Debug, P, M> fmt::Debug for ReadOnlyCursor<N, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyCursor")
            .field("path", &self.path.source())
            .field("flags", &self.flags)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Collects the arguments of a [`ReadOnlyCursor`]; `build` reports the first
/// one missing.
pub struct ReadOnlyCursorBuilder<N, P, M> {
    parent: Option<P>,
    path: Option<CompiledXPath>,
    included_types: Option<M>,
    flags: Option<CursorFlags>,
    _node: PhantomData<fn() -> N>,
}

impl<N, P, M> ReadOnlyCursorBuilder<N, P, M> {
    pub fn new() -> Self {
        Self {
            parent: None,
            path: None,
            included_types: None,
            flags: None,
            _node: PhantomData,
        }
    }

    pub fn parent(mut self, parent: P) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn path(mut self, path: CompiledXPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn included_types(mut self, included_types: M) -> Self {
        self.included_types = Some(included_types);
        self
    }

    pub fn flags(mut self, flags: CursorFlags) -> Self {
        self.flags = Some(flags);
        self
    }
}

impl<N, P, M> Default for ReadOnlyCursorBuilder<N, P, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N, P, M> ReadOnlyCursorBuilder<N, P, M>
where
    N: DataSourceNode<'a> + 'a,
    P: Lazy<N>,
    M: IncludedTypeMap,
{
    pub fn build(self) -> Result<ReadOnlyCursor<N, P, M>, CursorError> {
        let parent = self.parent.ok_or(CursorError::MissingArgument("parent"))?;
        let path = self.path.ok_or(CursorError::MissingArgument("path"))?;
        let included_types = self
            .included_types
            .ok_or(CursorError::MissingArgument("included_types"))?;
        let flags = self.flags.ok_or(CursorError::MissingArgument("flags"))?;
        ReadOnlyCursor::new(parent, path, included_types, flags)
    }
}
