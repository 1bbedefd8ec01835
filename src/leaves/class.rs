//! Class-like aggregates: `LF_CLASS`, `LF_STRUCTURE`, `LF_INTERFACE` and `LF_UNION`.
//!
//! The three class-like kinds share one record layout and differ only in their semantic role,
//! so they decode into a single [`ClassType`] tagged with a [`ClassKind`]. Unions drop the base
//! list and vtable shape references and get their own [`UnionType`].
//!
//! ```text
//! LF_CLASS / LF_STRUCTURE / LF_INTERFACE        LF_UNION
//!   u16      member count                         u16      member count
//!   u16      CV_prop_t                            u16      CV_prop_t
//!   u32      field list index                     u32      field list index
//!   u32      derived-from list index              numeric  size
//!   u32      vtable shape index                   char[]   name
//!   numeric  size                                 char[]   unique name (optional)
//!   char[]   name
//!   char[]   unique name (optional)
//! ```

use strum::Display;

use crate::{
    file::parser::Parser,
    leaves::{
        read_name, read_numeric_checked, LeafKind, LeafReaderContext, NumericLiteral,
        StructureAttributes, TypeIndex,
    },
    Result,
};

/// Which of the class-like kinds a [`ClassType`] was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ClassKind {
    /// `LF_CLASS`
    Class,
    /// `LF_STRUCTURE`
    Structure,
    /// `LF_INTERFACE`
    Interface,
}

impl From<ClassKind> for LeafKind {
    fn from(kind: ClassKind) -> Self {
        match kind {
            ClassKind::Class => LeafKind::Class,
            ClassKind::Structure => LeafKind::Structure,
            ClassKind::Interface => LeafKind::Interface,
        }
    }
}

/// A class, structure or interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassType {
    /// Which tag this record was decoded from
    pub kind: ClassKind,
    /// Number of entries in the field list
    pub member_count: u16,
    /// Type properties
    pub attributes: StructureAttributes,
    /// `LF_FIELDLIST` with the members; [`TypeIndex::NONE`] for forward references
    pub field_list: TypeIndex,
    /// Derivation list, usually [`TypeIndex::NONE`]
    pub derived_from: TypeIndex,
    /// `LF_VTSHAPE` describing the virtual function table
    pub vtable_shape: TypeIndex,
    /// Size of an instance in bytes
    pub size: NumericLiteral,
    /// Type name
    pub name: String,
    /// Decorated name, present if [`StructureAttributes::HAS_UNIQUE_NAME`] is set
    pub unique_name: Option<String>,
}

impl ClassType {
    pub(crate) fn read(
        context: &LeafReaderContext,
        kind: ClassKind,
        parser: &mut Parser<'_>,
    ) -> Result<Self> {
        let member_count = parser.read_le::<u16>()?;
        let attributes = StructureAttributes::from_bits_retain(parser.read_le::<u16>()?);
        let field_list = TypeIndex(parser.read_le::<u32>()?);
        let derived_from = TypeIndex(parser.read_le::<u32>()?);
        let vtable_shape = TypeIndex(parser.read_le::<u32>()?);
        let size = read_numeric_checked(context, parser)?;
        let name = read_name(context, parser);
        let unique_name = read_unique_name(context, attributes, parser);

        Ok(ClassType {
            kind,
            member_count,
            attributes,
            field_list,
            derived_from,
            vtable_shape,
            size,
            name,
            unique_name,
        })
    }

    /// Returns `true` if this record only declares the type; the definition is another record
    /// with the same name.
    #[must_use]
    pub fn is_forward_reference(&self) -> bool {
        self.attributes.contains(StructureAttributes::FORWARD_REFERENCE)
    }

    /// Instance size in bytes, `0` if the size literal could not be represented.
    #[must_use]
    pub fn size_in_bytes(&self) -> u64 {
        self.size.as_u64().unwrap_or(0)
    }
}

/// A union type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    /// Number of entries in the field list
    pub member_count: u16,
    /// Type properties
    pub attributes: StructureAttributes,
    /// `LF_FIELDLIST` with the members
    pub field_list: TypeIndex,
    /// Size of an instance in bytes
    pub size: NumericLiteral,
    /// Type name
    pub name: String,
    /// Decorated name, present if [`StructureAttributes::HAS_UNIQUE_NAME`] is set
    pub unique_name: Option<String>,
}

impl UnionType {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        let member_count = parser.read_le::<u16>()?;
        let attributes = StructureAttributes::from_bits_retain(parser.read_le::<u16>()?);
        let field_list = TypeIndex(parser.read_le::<u32>()?);
        let size = read_numeric_checked(context, parser)?;
        let name = read_name(context, parser);
        let unique_name = read_unique_name(context, attributes, parser);

        Ok(UnionType {
            member_count,
            attributes,
            field_list,
            size,
            name,
            unique_name,
        })
    }

    /// Returns `true` if this record only declares the type.
    #[must_use]
    pub fn is_forward_reference(&self) -> bool {
        self.attributes.contains(StructureAttributes::FORWARD_REFERENCE)
    }
}

/// Reads the decorated name that follows the regular name when the properties announce one.
pub(crate) fn read_unique_name(
    context: &LeafReaderContext,
    attributes: StructureAttributes,
    parser: &mut Parser<'_>,
) -> Option<String> {
    (attributes.contains(StructureAttributes::HAS_UNIQUE_NAME) && parser.has_more_data())
        .then(|| read_name(context, parser))
}
