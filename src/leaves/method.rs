//! Method declarations: `LF_ONEMETHOD`, `LF_METHOD` and the `LF_METHODLIST` they reference.
//!
//! A method that is not overloaded is declared in place with `LF_ONEMETHOD`. An overloaded
//! method is declared once with `LF_METHOD`, which points at an `LF_METHODLIST` holding one entry
//! per overload. In both places, introducing virtual methods carry an extra 32-bit vtable offset.

use crate::{
    file::parser::Parser,
    leaves::{read_name, FieldAttributes, LeafReaderContext, TypeIndex},
    Result,
};

/// Reads the vtable offset that follows introducing virtual methods.
fn read_vtable_offset(attributes: FieldAttributes, parser: &mut Parser<'_>) -> Result<Option<u32>> {
    if attributes.is_intro_virtual() {
        Ok(Some(parser.read_le::<u32>()?))
    } else {
        Ok(None)
    }
}

/// A single, non-overloaded method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneMethodField {
    /// Access and method property bits
    pub attributes: FieldAttributes,
    /// `LF_MFUNCTION` signature
    pub method_type: TypeIndex,
    /// Offset in the vtable, present for introducing virtual methods
    pub vtable_offset: Option<u32>,
    /// Method name
    pub name: String,
}

impl OneMethodField {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        let attributes = FieldAttributes(parser.read_le::<u16>()?);
        let method_type = TypeIndex(parser.read_le::<u32>()?);
        let vtable_offset = read_vtable_offset(attributes, parser)?;
        let name = read_name(context, parser);

        Ok(OneMethodField {
            attributes,
            method_type,
            vtable_offset,
            name,
        })
    }
}

/// A group of overloads sharing one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodField {
    /// Number of overloads
    pub overload_count: u16,
    /// `LF_METHODLIST` with the overloads
    pub method_list: TypeIndex,
    /// Shared method name
    pub name: String,
}

impl MethodField {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(MethodField {
            overload_count: parser.read_le::<u16>()?,
            method_list: TypeIndex(parser.read_le::<u32>()?),
            name: read_name(context, parser),
        })
    }
}

/// One overload in an `LF_METHODLIST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodListEntry {
    /// Access and method property bits
    pub attributes: FieldAttributes,
    /// `LF_MFUNCTION` signature
    pub method_type: TypeIndex,
    /// Offset in the vtable, present for introducing virtual methods
    pub vtable_offset: Option<u32>,
}

/// Overloads of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodList {
    /// Overloads in declaration order
    pub methods: Vec<MethodListEntry>,
}

impl MethodList {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        let mut methods = Vec::new();

        while parser.has_more_data() {
            let attributes = FieldAttributes(parser.read_le::<u16>()?);
            parser.advance_by(2)?;
            let method_type = TypeIndex(parser.read_le::<u32>()?);
            let vtable_offset = read_vtable_offset(attributes, parser)?;

            methods.push(MethodListEntry {
                attributes,
                method_type,
                vtable_offset,
            });
        }

        Ok(MethodList { methods })
    }
}
