//! CodeView leaf records and their decoders.
//!
//! The type information streams of a PDB (TPI and IPI) are sequences of *leaf* records. Every
//! record is a `u16` length followed by that many payload bytes, and every payload starts with a
//! `u16` kind tag selecting its layout. This module turns one such record into a
//! [`CodeViewLeaf`]: a [`TypeIndex`] plus the structured [`LeafData`] of its kind.
//!
//! # Architecture
//!
//! Decoding is split into three layers:
//!
//! - **Numeric literals** ([`read_numeric`]) - the variable width integers embedded in many
//!   records (sizes, offsets, enumerator values)
//! - **Record framing** ([`read_leaf`]) - reads the length prefix and forks a cursor bounded to
//!   exactly that record, so a decoder can never read into the next record
//! - **Dispatch** ([`read_leaf_no_header`]) - reads the kind tag and hands the payload to the
//!   matching variant decoder; tags without a decoder become [`UnknownLeaf`] holding the raw
//!   bytes
//!
//! Field lists reuse the dispatch layer for their entries, which are tag-prefixed but carry no
//! length of their own.
//!
//! References between records are plain [`TypeIndex`] values. Nothing is resolved while
//! decoding: a referenced record may appear later in the stream, or live in another stream
//! entirely.
//!
//! # Key Components
//!
//! - [`CodeViewLeaf`] - A decoded record with its type index
//! - [`LeafData`] - Kind-specific payload of a record
//! - [`LeafKind`] - The closed set of decoded kinds plus [`LeafKind::Unknown`]
//! - [`LeafReaderContext`] - Per-session configuration and diagnostics
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::{Parser, leaves::{read_leaf, LeafData, LeafKind, LeafReaderContext, TypeIndex}};
//!
//! // LF_POINTER to `int`, framed with its length
//! let data = [0x0a, 0x00, 0x02, 0x10, 0x74, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x01, 0x00];
//! let context = LeafReaderContext::default();
//! let mut parser = Parser::new(&data);
//!
//! let leaf = read_leaf(&context, TypeIndex(0x1000), &mut parser)?;
//! assert_eq!(leaf.kind(), LeafKind::Pointer);
//! assert_eq!(parser.pos(), 12);
//!
//! if let LeafData::Pointer(pointer) = leaf.data() {
//!     assert_eq!(pointer.referent_type, TypeIndex(0x74));
//!     assert_eq!(pointer.attributes.size(), 8);
//! }
//! # Ok::<(), cvleaf::Error>(())
//! ```

mod array;
mod attributes;
mod class;
mod context;
mod diagnostics;
mod enums;
mod fieldlist;
mod index;
mod kind;
mod member;
mod method;
mod modifier;
mod numeric;
mod pointer;
mod procedure;
mod unknown;
mod vtshape;

pub use array::{ArrayType, BitfieldType};
pub use attributes::{
    FieldAttributes, MemberAccess, MethodProperties, ModifierAttributes, StructureAttributes,
};
pub use class::{ClassKind, ClassType, UnionType};
pub use context::{LeafReaderContext, ReaderConfig};
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};
pub use enums::{EnumType, EnumerateField};
pub use fieldlist::FieldList;
pub use index::{TypeIndex, FIRST_NON_SIMPLE_INDEX};
pub use kind::LeafKind;
pub use member::{
    BaseClassField, IndexField, MemberField, NestedTypeField, StaticMemberField, VFuncTabField,
    VirtualBaseClassField,
};
pub use method::{MethodField, MethodList, MethodListEntry, OneMethodField};
pub use modifier::ModifierType;
pub use numeric::{
    read_numeric, NumericLiteral, LF_CHAR, LF_LONG, LF_NUMERIC, LF_QUADWORD, LF_SHORT, LF_ULONG,
    LF_UQUADWORD, LF_USHORT,
};
pub use pointer::{MemberPointerInfo, PointerAttributes, PointerKind, PointerMode, PointerType};
pub use procedure::{
    ArgumentList, CallingConvention, FunctionAttributes, MemberFunctionType, ProcedureType,
};
pub use unknown::UnknownLeaf;
pub use vtshape::{VTableShape, VTableShapeEntry};

use std::borrow::Cow;

use crate::{file::parser::Parser, Error, Result};

/// Kind-specific payload of a leaf record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafData {
    /// `LF_CLASS`, `LF_STRUCTURE` or `LF_INTERFACE`
    Class(ClassType),
    /// `LF_UNION`
    Union(UnionType),
    /// `LF_ENUM`
    Enum(EnumType),
    /// `LF_ENUMERATE`
    Enumerate(EnumerateField),
    /// `LF_FIELDLIST`
    FieldList(FieldList),
    /// `LF_MODIFIER`
    Modifier(ModifierType),
    /// `LF_POINTER`
    Pointer(PointerType),
    /// `LF_VTSHAPE`
    VTableShape(VTableShape),
    /// `LF_PROCEDURE`
    Procedure(ProcedureType),
    /// `LF_MFUNCTION`
    MemberFunction(MemberFunctionType),
    /// `LF_ARGLIST`
    ArgumentList(ArgumentList),
    /// `LF_METHODLIST`
    MethodList(MethodList),
    /// `LF_ARRAY`
    Array(ArrayType),
    /// `LF_BITFIELD`
    Bitfield(BitfieldType),
    /// `LF_MEMBER`
    Member(MemberField),
    /// `LF_STMEMBER`
    StaticMember(StaticMemberField),
    /// `LF_BCLASS` or `LF_BINTERFACE`
    BaseClass(BaseClassField),
    /// `LF_VBCLASS` or `LF_IVBCLASS`
    VirtualBaseClass(VirtualBaseClassField),
    /// `LF_NESTTYPE`
    NestedType(NestedTypeField),
    /// `LF_VFUNCTAB`
    VFuncTab(VFuncTabField),
    /// `LF_ONEMETHOD`
    OneMethod(OneMethodField),
    /// `LF_METHOD`
    Method(MethodField),
    /// `LF_INDEX`
    Index(IndexField),
    /// Any kind without a structured decoder
    Unknown(UnknownLeaf),
}

impl LeafData {
    /// The kind this payload was decoded from.
    #[must_use]
    pub fn kind(&self) -> LeafKind {
        match self {
            LeafData::Class(class) => class.kind.into(),
            LeafData::Union(_) => LeafKind::Union,
            LeafData::Enum(_) => LeafKind::Enum,
            LeafData::Enumerate(_) => LeafKind::Enumerate,
            LeafData::FieldList(_) => LeafKind::FieldList,
            LeafData::Modifier(_) => LeafKind::Modifier,
            LeafData::Pointer(_) => LeafKind::Pointer,
            LeafData::VTableShape(_) => LeafKind::VTShape,
            LeafData::Procedure(_) => LeafKind::Procedure,
            LeafData::MemberFunction(_) => LeafKind::MemberFunction,
            LeafData::ArgumentList(_) => LeafKind::ArgList,
            LeafData::MethodList(_) => LeafKind::MethodList,
            LeafData::Array(_) => LeafKind::Array,
            LeafData::Bitfield(_) => LeafKind::Bitfield,
            LeafData::Member(_) => LeafKind::Member,
            LeafData::StaticMember(_) => LeafKind::StaticMember,
            LeafData::BaseClass(base) if base.is_interface => LeafKind::BaseInterface,
            LeafData::BaseClass(_) => LeafKind::BaseClass,
            LeafData::VirtualBaseClass(base) if base.is_indirect => {
                LeafKind::IndirectVirtualBaseClass
            }
            LeafData::VirtualBaseClass(_) => LeafKind::VirtualBaseClass,
            LeafData::NestedType(_) => LeafKind::NestedType,
            LeafData::VFuncTab(_) => LeafKind::VFuncTab,
            LeafData::OneMethod(_) => LeafKind::OneMethod,
            LeafData::Method(_) => LeafKind::Method,
            LeafData::Index(_) => LeafKind::Index,
            LeafData::Unknown(unknown) => LeafKind::Unknown(unknown.kind),
        }
    }

    /// The name carried by the record, for kinds that have one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            LeafData::Class(class) => Some(&class.name),
            LeafData::Union(union) => Some(&union.name),
            LeafData::Enum(value) => Some(&value.name),
            LeafData::Enumerate(enumerate) => Some(&enumerate.name),
            LeafData::Array(array) => Some(&array.name),
            LeafData::Member(member) => Some(&member.name),
            LeafData::StaticMember(member) => Some(&member.name),
            LeafData::NestedType(nested) => Some(&nested.name),
            LeafData::OneMethod(method) => Some(&method.name),
            LeafData::Method(method) => Some(&method.name),
            _ => None,
        }
    }

    /// Every type index this record refers to, skipping [`TypeIndex::NONE`].
    ///
    /// Built-in indices are included; filter with [`TypeIndex::is_simple`] to keep only
    /// references into the stream. Field lists report the references of all their entries.
    #[must_use]
    pub fn references(&self) -> Vec<TypeIndex> {
        let mut references = Vec::new();
        self.collect_references(&mut references);
        references.retain(|index| !index.is_none());
        references
    }

    fn collect_references(&self, out: &mut Vec<TypeIndex>) {
        match self {
            LeafData::Class(class) => {
                out.extend([class.field_list, class.derived_from, class.vtable_shape]);
            }
            LeafData::Union(union) => out.push(union.field_list),
            LeafData::Enum(value) => out.extend([value.underlying_type, value.field_list]),
            LeafData::FieldList(list) => {
                for field in &list.fields {
                    field.collect_references(out);
                }
            }
            LeafData::Modifier(modifier) => out.push(modifier.modified_type),
            LeafData::Pointer(pointer) => {
                out.push(pointer.referent_type);
                if let Some(member) = &pointer.member_pointer {
                    out.push(member.containing_class);
                }
            }
            LeafData::Procedure(procedure) => {
                out.extend([procedure.return_type, procedure.argument_list]);
            }
            LeafData::MemberFunction(function) => out.extend([
                function.return_type,
                function.class_type,
                function.this_type,
                function.argument_list,
            ]),
            LeafData::ArgumentList(list) => out.extend_from_slice(&list.arguments),
            LeafData::MethodList(list) => {
                out.extend(list.methods.iter().map(|method| method.method_type));
            }
            LeafData::Array(array) => out.extend([array.element_type, array.index_type]),
            LeafData::Bitfield(bitfield) => out.push(bitfield.underlying_type),
            LeafData::Member(member) => out.push(member.field_type),
            LeafData::StaticMember(member) => out.push(member.field_type),
            LeafData::BaseClass(base) => out.push(base.base_type),
            LeafData::VirtualBaseClass(base) => {
                out.extend([base.base_type, base.base_pointer_type]);
            }
            LeafData::NestedType(nested) => out.push(nested.nested_type),
            LeafData::VFuncTab(vfunctab) => out.push(vfunctab.table_type),
            LeafData::OneMethod(method) => out.push(method.method_type),
            LeafData::Method(method) => out.push(method.method_list),
            LeafData::Index(index) => out.push(index.continuation),
            LeafData::Enumerate(_) | LeafData::VTableShape(_) | LeafData::Unknown(_) => {}
        }
    }
}

/// A decoded leaf record.
///
/// The kind is fixed by the payload and cannot change. The type index is assigned by whoever
/// decoded the record and may be changed exactly once afterwards, for example when records of
/// several streams are merged and renumbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeViewLeaf {
    type_index: TypeIndex,
    reassigned: bool,
    data: LeafData,
}

impl CodeViewLeaf {
    /// Wraps decoded data under the given type index.
    #[must_use]
    pub fn new(type_index: TypeIndex, data: LeafData) -> Self {
        CodeViewLeaf {
            type_index,
            reassigned: false,
            data,
        }
    }

    /// The record kind.
    #[must_use]
    pub fn kind(&self) -> LeafKind {
        self.data.kind()
    }

    /// The type index of this record.
    #[must_use]
    pub fn type_index(&self) -> TypeIndex {
        self.type_index
    }

    /// Renumbers the record.
    ///
    /// # Errors
    /// Returns [`Error::TypeIndexReassigned`] if the record has already been renumbered once.
    pub fn reassign_type_index(&mut self, type_index: TypeIndex) -> Result<()> {
        if self.reassigned {
            return Err(Error::TypeIndexReassigned(self.type_index));
        }

        self.type_index = type_index;
        self.reassigned = true;
        Ok(())
    }

    /// Returns `true` once [`CodeViewLeaf::reassign_type_index`] has succeeded.
    #[must_use]
    pub fn is_reassigned(&self) -> bool {
        self.reassigned
    }

    /// The kind-specific payload.
    #[must_use]
    pub fn data(&self) -> &LeafData {
        &self.data
    }

    /// Consumes the record, returning its payload.
    #[must_use]
    pub fn into_data(self) -> LeafData {
        self.data
    }

    /// The record's name, for kinds that have one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.data.name()
    }

    /// Returns `true` if the kind had no structured decoder.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self.data, LeafData::Unknown(_))
    }
}

/// Decodes one framed record: `u16` length, then the payload.
///
/// The payload is isolated into its own cursor before dispatch, so decoding never reads past
/// the record and `parser` always ends up exactly behind it.
///
/// # Arguments
/// * `context` - Shared reading context of this session
/// * `type_index` - Index to assign to the record
/// * `parser` - Cursor positioned on the length prefix
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the length prefix or the payload is truncated, or any error
/// of the variant decoder. `parser` has moved past the record if and only if the payload was
/// complete.
pub fn read_leaf(
    context: &LeafReaderContext,
    type_index: TypeIndex,
    parser: &mut Parser<'_>,
) -> Result<CodeViewLeaf> {
    let length = parser.read_le::<u16>()?;
    let mut payload = parser.fork(usize::from(length))?;

    read_leaf_no_header(context, type_index, &mut payload)
}

/// Decodes one record whose payload is already isolated (no length prefix).
///
/// Reads the `u16` kind tag and dispatches. Kinds without a decoder yield
/// [`LeafData::Unknown`] holding the tag and all remaining bytes.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the tag or a field is truncated, [`Error::Malformed`] for
/// structurally invalid data, or [`Error::RecursionLimit`] for overly deep field list nesting.
pub fn read_leaf_no_header(
    context: &LeafReaderContext,
    type_index: TypeIndex,
    parser: &mut Parser<'_>,
) -> Result<CodeViewLeaf> {
    read_leaf_nested(context, type_index, parser, 0)
}

pub(crate) fn read_leaf_nested(
    context: &LeafReaderContext,
    type_index: TypeIndex,
    parser: &mut Parser<'_>,
    depth: usize,
) -> Result<CodeViewLeaf> {
    context.check_depth(depth)?;

    let offset = parser.absolute_pos();
    let kind = LeafKind::from_raw(parser.read_le::<u16>()?);

    let data = match kind {
        LeafKind::Class => LeafData::Class(ClassType::read(context, ClassKind::Class, parser)?),
        LeafKind::Structure => {
            LeafData::Class(ClassType::read(context, ClassKind::Structure, parser)?)
        }
        LeafKind::Interface => {
            LeafData::Class(ClassType::read(context, ClassKind::Interface, parser)?)
        }
        LeafKind::Union => LeafData::Union(UnionType::read(context, parser)?),
        LeafKind::Enum => LeafData::Enum(EnumType::read(context, parser)?),
        LeafKind::Enumerate => LeafData::Enumerate(EnumerateField::read(context, parser)?),
        LeafKind::FieldList => {
            LeafData::FieldList(FieldList::read(context, type_index, parser, depth)?)
        }
        LeafKind::Modifier => LeafData::Modifier(ModifierType::read(parser)?),
        LeafKind::Pointer => LeafData::Pointer(PointerType::read(parser)?),
        LeafKind::VTShape => LeafData::VTableShape(VTableShape::read(parser)?),
        LeafKind::Procedure => LeafData::Procedure(ProcedureType::read(parser)?),
        LeafKind::MemberFunction => LeafData::MemberFunction(MemberFunctionType::read(parser)?),
        LeafKind::ArgList => LeafData::ArgumentList(ArgumentList::read(parser)?),
        LeafKind::MethodList => LeafData::MethodList(MethodList::read(parser)?),
        LeafKind::Array => LeafData::Array(ArrayType::read(context, parser)?),
        LeafKind::Bitfield => LeafData::Bitfield(BitfieldType::read(parser)?),
        LeafKind::Member => LeafData::Member(MemberField::read(context, parser)?),
        LeafKind::StaticMember => LeafData::StaticMember(StaticMemberField::read(context, parser)?),
        LeafKind::BaseClass => LeafData::BaseClass(BaseClassField::read(context, false, parser)?),
        LeafKind::BaseInterface => {
            LeafData::BaseClass(BaseClassField::read(context, true, parser)?)
        }
        LeafKind::VirtualBaseClass => {
            LeafData::VirtualBaseClass(VirtualBaseClassField::read(context, false, parser)?)
        }
        LeafKind::IndirectVirtualBaseClass => {
            LeafData::VirtualBaseClass(VirtualBaseClassField::read(context, true, parser)?)
        }
        LeafKind::NestedType => LeafData::NestedType(NestedTypeField::read(context, parser)?),
        LeafKind::VFuncTab => LeafData::VFuncTab(VFuncTabField::read(parser)?),
        LeafKind::OneMethod => LeafData::OneMethod(OneMethodField::read(context, parser)?),
        LeafKind::Method => LeafData::Method(MethodField::read(context, parser)?),
        LeafKind::Index => LeafData::Index(IndexField::read(parser)?),
        LeafKind::Unknown(raw) => {
            tracing::debug!(kind = raw, offset, %type_index, "undecoded leaf kind");
            context.report(
                DiagnosticSeverity::Info,
                DiagnosticCategory::Leaf,
                format!("undecoded leaf kind 0x{raw:04x}"),
                offset,
                Some(type_index),
            );
            LeafData::Unknown(UnknownLeaf::read(raw, parser))
        }
    };

    Ok(CodeViewLeaf::new(type_index, data))
}

/// Reads a numeric literal, applying the context's policy for unsupported tags.
///
/// Leniently an unsupported tag decodes as its zero fallback and is reported; in strict mode it
/// fails the record.
pub(crate) fn read_numeric_checked(
    context: &LeafReaderContext,
    parser: &mut Parser<'_>,
) -> Result<NumericLiteral> {
    let offset = parser.absolute_pos();
    let literal = read_numeric(parser)?;

    if let NumericLiteral::Unsupported(tag) = literal {
        if context.config().strict_numeric_tags {
            return Err(malformed_error!(
                "Unsupported numeric leaf tag 0x{:04x} at offset 0x{:x}",
                tag,
                offset
            ));
        }

        tracing::debug!(tag, offset, "unsupported numeric leaf tag, using 0");
        context.report(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Numeric,
            format!("unsupported numeric leaf tag 0x{tag:04x}, decoded as 0"),
            offset,
            None,
        );
    }

    Ok(literal)
}

/// Reads a NUL-terminated record name.
///
/// Compilers write names in the code page of the build, so a name is not always valid UTF-8.
/// Invalid sequences are replaced with U+FFFD and reported; the record still decodes.
pub(crate) fn read_name(context: &LeafReaderContext, parser: &mut Parser<'_>) -> String {
    let offset = parser.absolute_pos();

    match String::from_utf8_lossy(parser.read_cstring()) {
        Cow::Borrowed(name) => name.to_owned(),
        Cow::Owned(name) => {
            tracing::debug!(offset, %name, "name is not valid UTF-8");
            context.report(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Leaf,
                format!("name is not valid UTF-8, decoded as {name:?}"),
                offset,
                None,
            );
            name
        }
    }
}
