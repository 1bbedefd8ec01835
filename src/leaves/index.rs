use std::fmt;

/// First type index used for records stored in a TPI or IPI stream.
///
/// Everything below is a *simple* type: a built-in (`int`, `char*`, `void`, ...) encoded
/// directly in the index value and never backed by a record.
pub const FIRST_NON_SIMPLE_INDEX: u32 = 0x1000;

/// An index identifying a leaf record within a type stream.
///
/// Leaves refer to each other exclusively through these indices; they are plain keys, resolved
/// through a [`crate::stream::TypeStream`] (or any other registry) on demand. This keeps forward
/// references and self-referencing type graphs trivial to represent.
///
/// Simple indices (`< 0x1000`) describe built-in types. The decoder records them verbatim;
/// [`TypeIndex::simple_kind`] and [`TypeIndex::simple_mode`] expose the raw bit fields for
/// consumers that resolve them.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIndex(pub u32);

impl TypeIndex {
    /// The null index (`T_NOTYPE`)
    pub const NONE: TypeIndex = TypeIndex(0);

    /// Creates a new type index.
    #[must_use]
    pub fn new(value: u32) -> Self {
        TypeIndex(value)
    }

    /// Returns the raw index value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns `true` for the null index.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this index denotes a built-in type rather than a stream record.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.0 < FIRST_NON_SIMPLE_INDEX
    }

    /// Built-in type kind (`T_INT4`, `T_CHAR`, ...) of a simple index, bits 0-7.
    #[must_use]
    pub fn simple_kind(&self) -> Option<u8> {
        self.is_simple().then_some((self.0 & 0xFF) as u8)
    }

    /// Pointer mode of a simple index, bits 8-11. Zero means "not a pointer".
    #[must_use]
    pub fn simple_mode(&self) -> Option<u8> {
        self.is_simple().then_some(((self.0 >> 8) & 0x0F) as u8)
    }

    /// The index following this one, as assigned during a linear stream scan.
    #[must_use]
    pub fn next(&self) -> Self {
        TypeIndex(self.0.wrapping_add(1))
    }

    /// The index `count` records after this one.
    #[must_use]
    pub fn offset(&self, count: usize) -> Self {
        TypeIndex(self.0.saturating_add(u32::try_from(count).unwrap_or(u32::MAX)))
    }
}

impl From<u32> for TypeIndex {
    fn from(value: u32) -> Self {
        TypeIndex(value)
    }
}

impl From<TypeIndex> for u32 {
    fn from(index: TypeIndex) -> Self {
        index.0
    }
}

impl fmt::Debug for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_simple() {
            write!(f, "TypeIndex(0x{:04x}, simple)", self.0)
        } else {
            write!(f, "TypeIndex(0x{:04x})", self.0)
        }
    }
}

impl fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}
