//! Deferred references whose value may not be available yet.

use std::cell::Cell;
use std::rc::Rc;

/// A value that is resolved on demand and may be absent.
///
/// Implementations are re-queried on every call; nothing here caches.
pub trait Lazy<T> {
    fn value(&self) -> Option<T>;

    fn has_value(&self) -> bool {
        self.value().is_some()
    }
}

impl<T, L: Lazy<T> + ?Sized> Lazy<T> for &L {
    fn value(&self) -> Option<T> {
        (**self).value()
    }
}

impl<T: Copy> Lazy<T> for Option<T> {
    fn value(&self) -> Option<T> {
        *self
    }
}

/// A shared slot filled in after the consumers were wired up.
///
/// Clones share the slot, so the owner can `set` or `clear` it while a cursor
/// holds another clone.
#[derive(Debug)]
pub struct LazyCell<T: Copy> {
    slot: Rc<Cell<Option<T>>>,
}

impl<T: Copy> LazyCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(Cell::new(None)),
        }
    }

    pub fn with_value(value: T) -> Self {
        Self {
            slot: Rc::new(Cell::new(Some(value))),
        }
    }

    pub fn set(&self, value: T) {
        self.slot.set(Some(value));
    }

    pub fn clear(&self) {
        self.slot.set(None);
    }
}

impl<T: Copy> Default for LazyCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Clone for LazyCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Copy> Lazy<T> for LazyCell<T> {
    fn value(&self) -> Option<T> {
        self.slot.get()
    }
}

/// Adapts a closure into a [`Lazy`].
#[derive(Debug, Clone)]
pub struct Deferred<F>(F);

impl<F> Deferred<F> {
    pub fn new(resolve: F) -> Self {
        Self(resolve)
    }
}

impl<T, F: Fn() -> Option<T>> Lazy<T> for Deferred<F> {
    fn value(&self) -> Option<T> {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_cell_clones_share_the_slot() {
        let owner = LazyCell::new();
        let consumer = owner.clone();
        assert!(!consumer.has_value());

        owner.set(7);
        assert_eq!(consumer.value(), Some(7));

        owner.clear();
        assert_eq!(consumer.value(), None);
    }

    #[test]
    fn test_deferred_is_requeried() {
        let source = Cell::new(1);
        let deferred = Deferred::new(|| Some(source.get()));
        assert_eq!(deferred.value(), Some(1));
        source.set(2);
        assert_eq!(deferred.value(), Some(2));
    }

    #[test]
    fn test_option_and_reference_impls() {
        let none: Option<u8> = None;
        assert!(!none.has_value());
        let some = Some(3u8);
        let by_ref: &dyn Lazy<u8> = &some;
        assert_eq!(by_ref.value(), Some(3));
        assert_eq!((&some).value(), Some(3));
    }
}
