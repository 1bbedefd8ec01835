//! `LF_MODIFIER`: a type with `const`, `volatile` or `__unaligned` qualifiers applied.

use crate::{
    file::parser::Parser,
    leaves::{ModifierAttributes, TypeIndex},
    Result,
};

/// A qualified type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierType {
    /// The unqualified type
    pub modified_type: TypeIndex,
    /// Applied qualifiers
    pub attributes: ModifierAttributes,
}

impl ModifierType {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(ModifierType {
            modified_type: TypeIndex(parser.read_le::<u32>()?),
            attributes: ModifierAttributes::from_bits_retain(parser.read_le::<u16>()?),
        })
    }

    /// Returns `true` if the type is `const` qualified.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.attributes.contains(ModifierAttributes::CONST)
    }

    /// Returns `true` if the type is `volatile` qualified.
    #[must_use]
    pub fn is_volatile(&self) -> bool {
        self.attributes.contains(ModifierAttributes::VOLATILE)
    }
}
