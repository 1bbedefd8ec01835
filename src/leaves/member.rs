//! Field list entries describing data members, bases and nested declarations.
//!
//! These records only ever appear inside an `LF_FIELDLIST`. They carry no length prefix of their
//! own; the list walker relies on each decoder consuming exactly its entry, after which alignment
//! padding is skipped.
//!
//! | Kind            | Layout                                                      |
//! |-----------------|-------------------------------------------------------------|
//! | `LF_MEMBER`     | attributes, type, offset (numeric), name                    |
//! | `LF_STMEMBER`   | attributes, type, name                                      |
//! | `LF_BCLASS`     | attributes, type, offset (numeric)                          |
//! | `LF_VBCLASS`    | attributes, base, vbptr type, vbptr offset, vbtable index   |
//! | `LF_NESTTYPE`   | padding, type, name                                         |
//! | `LF_VFUNCTAB`   | padding, type                                               |
//! | `LF_INDEX`      | padding, continuation                                       |

use crate::{
    file::parser::Parser,
    leaves::{
        read_name, read_numeric_checked, FieldAttributes, LeafReaderContext, NumericLiteral,
        TypeIndex,
    },
    Result,
};

/// A non-static data member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberField {
    /// Access and property bits
    pub attributes: FieldAttributes,
    /// Type of the member
    pub field_type: TypeIndex,
    /// Byte offset within the enclosing type
    pub offset: NumericLiteral,
    /// Member name
    pub name: String,
}

impl MemberField {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        let attributes = FieldAttributes(parser.read_le::<u16>()?);
        let field_type = TypeIndex(parser.read_le::<u32>()?);
        let offset = read_numeric_checked(context, parser)?;
        let name = read_name(context, parser);

        Ok(MemberField {
            attributes,
            field_type,
            offset,
            name,
        })
    }
}

/// A static data member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMemberField {
    /// Access and property bits
    pub attributes: FieldAttributes,
    /// Type of the member
    pub field_type: TypeIndex,
    /// Member name
    pub name: String,
}

impl StaticMemberField {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(StaticMemberField {
            attributes: FieldAttributes(parser.read_le::<u16>()?),
            field_type: TypeIndex(parser.read_le::<u32>()?),
            name: read_name(context, parser),
        })
    }
}

/// A direct, non-virtual base class or base interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseClassField {
    /// `true` for `LF_BINTERFACE`, `false` for `LF_BCLASS`
    pub is_interface: bool,
    /// Access and property bits
    pub attributes: FieldAttributes,
    /// The base type
    pub base_type: TypeIndex,
    /// Offset of the base subobject
    pub offset: NumericLiteral,
}

impl BaseClassField {
    pub(crate) fn read(
        context: &LeafReaderContext,
        is_interface: bool,
        parser: &mut Parser<'_>,
    ) -> Result<Self> {
        Ok(BaseClassField {
            is_interface,
            attributes: FieldAttributes(parser.read_le::<u16>()?),
            base_type: TypeIndex(parser.read_le::<u32>()?),
            offset: read_numeric_checked(context, parser)?,
        })
    }
}

/// A direct or indirect virtual base class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualBaseClassField {
    /// `true` for `LF_IVBCLASS`, `false` for `LF_VBCLASS`
    pub is_indirect: bool,
    /// Access and property bits
    pub attributes: FieldAttributes,
    /// The virtual base type
    pub base_type: TypeIndex,
    /// Type of the virtual base pointer
    pub base_pointer_type: TypeIndex,
    /// Offset of the virtual base pointer from the address point
    pub base_pointer_offset: NumericLiteral,
    /// Index of the base within the virtual base table
    pub vbtable_index: NumericLiteral,
}

impl VirtualBaseClassField {
    pub(crate) fn read(
        context: &LeafReaderContext,
        is_indirect: bool,
        parser: &mut Parser<'_>,
    ) -> Result<Self> {
        let attributes = FieldAttributes(parser.read_le::<u16>()?);
        let base_type = TypeIndex(parser.read_le::<u32>()?);
        let base_pointer_type = TypeIndex(parser.read_le::<u32>()?);
        let base_pointer_offset = read_numeric_checked(context, parser)?;
        let vbtable_index = read_numeric_checked(context, parser)?;

        Ok(VirtualBaseClassField {
            is_indirect,
            attributes,
            base_type,
            base_pointer_type,
            base_pointer_offset,
            vbtable_index,
        })
    }
}

/// A nested type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedTypeField {
    /// The nested type
    pub nested_type: TypeIndex,
    /// Name within the enclosing type
    pub name: String,
}

impl NestedTypeField {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        parser.advance_by(2)?;
        Ok(NestedTypeField {
            nested_type: TypeIndex(parser.read_le::<u32>()?),
            name: read_name(context, parser),
        })
    }
}

/// The virtual function table pointer of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VFuncTabField {
    /// Pointer type of the table
    pub table_type: TypeIndex,
}

impl VFuncTabField {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        parser.advance_by(2)?;
        Ok(VFuncTabField {
            table_type: TypeIndex(parser.read_le::<u32>()?),
        })
    }
}

/// Link to the field list that continues this one.
///
/// Compilers split field lists that would exceed the maximum record length; the last entry of
/// each part points at the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexField {
    /// The continuation `LF_FIELDLIST`
    pub continuation: TypeIndex,
}

impl IndexField {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        parser.advance_by(2)?;
        Ok(IndexField {
            continuation: TypeIndex(parser.read_le::<u32>()?),
        })
    }
}
