use bitflags::bitflags;

bitflags! {
    /// Traversal policy of a cursor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CursorFlags: u8 {
        const ELEMENTS = 1;
        const ATTRIBUTES = 1 << 1;
        /// The query may yield more than one item.
        const MULTIPLE = 1 << 2;
        const MUTABLE = 1 << 3;
        const ALL_NODES = Self::ELEMENTS.bits() | Self::ATTRIBUTES.bits();
    }
}

impl CursorFlags {
    pub fn allows_multiple_items(self) -> bool {
        self.contains(Self::MULTIPLE)
    }

    pub fn supports_mutation(self) -> bool {
        self.contains(Self::MUTABLE)
    }

    pub fn includes_elements(self) -> bool {
        self.contains(Self::ELEMENTS)
    }

    pub fn includes_attributes(self) -> bool {
        self.contains(Self::ATTRIBUTES)
    }
}

impl Default for CursorFlags {
    fn default() -> Self {
        Self::ELEMENTS | Self::MULTIPLE
    }
}
