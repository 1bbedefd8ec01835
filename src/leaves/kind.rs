//! Leaf kind tags.
//!
//! Every record payload starts with a `u16` tag identifying its layout (`LF_*` in `cvinfo.h`).
//! [`LeafKind`] names the tags this crate decodes into structured variants; every other value is
//! carried as [`LeafKind::Unknown`] together with its raw tag.

use strum::{Display, EnumIter, IntoStaticStr};

/// The kind of a CodeView leaf record.
///
/// The set is closed: dispatch over it is exhaustive for known kinds, and anything else falls
/// into [`LeafKind::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum LeafKind {
    /// `LF_VTSHAPE` - virtual function table shape
    VTShape,
    /// `LF_MODIFIER` - const/volatile/unaligned qualified type
    Modifier,
    /// `LF_POINTER` - pointer or reference
    Pointer,
    /// `LF_PROCEDURE` - free function signature
    Procedure,
    /// `LF_MFUNCTION` - member function signature
    MemberFunction,
    /// `LF_ARGLIST` - argument list of a procedure
    ArgList,
    /// `LF_FIELDLIST` - members of a class, union or enum
    FieldList,
    /// `LF_BITFIELD` - bit field member type
    Bitfield,
    /// `LF_METHODLIST` - overloads of a method
    MethodList,
    /// `LF_BCLASS` - direct base class
    BaseClass,
    /// `LF_VBCLASS` - direct virtual base class
    VirtualBaseClass,
    /// `LF_IVBCLASS` - indirect virtual base class
    IndirectVirtualBaseClass,
    /// `LF_INDEX` - continuation of a split field list
    Index,
    /// `LF_VFUNCTAB` - virtual function table pointer
    VFuncTab,
    /// `LF_ENUMERATE` - enumerator constant
    Enumerate,
    /// `LF_ARRAY` - fixed size array
    Array,
    /// `LF_CLASS`
    Class,
    /// `LF_STRUCTURE`
    Structure,
    /// `LF_UNION`
    Union,
    /// `LF_ENUM`
    Enum,
    /// `LF_MEMBER` - non-static data member
    Member,
    /// `LF_STMEMBER` - static data member
    StaticMember,
    /// `LF_METHOD` - overloaded method group
    Method,
    /// `LF_NESTTYPE` - nested type definition
    NestedType,
    /// `LF_ONEMETHOD` - single, non-overloaded method
    OneMethod,
    /// `LF_INTERFACE`
    Interface,
    /// `LF_BINTERFACE` - base interface
    BaseInterface,
    /// Any tag this crate does not decode
    Unknown(u16),
}

impl LeafKind {
    /// Maps a raw tag to its kind.
    #[must_use]
    pub fn from_raw(value: u16) -> LeafKind {
        match value {
            0x000a => LeafKind::VTShape,
            0x1001 => LeafKind::Modifier,
            0x1002 => LeafKind::Pointer,
            0x1008 => LeafKind::Procedure,
            0x1009 => LeafKind::MemberFunction,
            0x1201 => LeafKind::ArgList,
            0x1203 => LeafKind::FieldList,
            0x1205 => LeafKind::Bitfield,
            0x1206 => LeafKind::MethodList,
            0x1400 => LeafKind::BaseClass,
            0x1401 => LeafKind::VirtualBaseClass,
            0x1402 => LeafKind::IndirectVirtualBaseClass,
            0x1404 => LeafKind::Index,
            0x1409 => LeafKind::VFuncTab,
            0x1502 => LeafKind::Enumerate,
            0x1503 => LeafKind::Array,
            0x1504 => LeafKind::Class,
            0x1505 => LeafKind::Structure,
            0x1506 => LeafKind::Union,
            0x1507 => LeafKind::Enum,
            0x150d => LeafKind::Member,
            0x150e => LeafKind::StaticMember,
            0x150f => LeafKind::Method,
            0x1510 => LeafKind::NestedType,
            0x1511 => LeafKind::OneMethod,
            0x1519 => LeafKind::Interface,
            0x151a => LeafKind::BaseInterface,
            other => LeafKind::Unknown(other),
        }
    }

    /// Returns the raw tag as stored in the stream.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            LeafKind::VTShape => 0x000a,
            LeafKind::Modifier => 0x1001,
            LeafKind::Pointer => 0x1002,
            LeafKind::Procedure => 0x1008,
            LeafKind::MemberFunction => 0x1009,
            LeafKind::ArgList => 0x1201,
            LeafKind::FieldList => 0x1203,
            LeafKind::Bitfield => 0x1205,
            LeafKind::MethodList => 0x1206,
            LeafKind::BaseClass => 0x1400,
            LeafKind::VirtualBaseClass => 0x1401,
            LeafKind::IndirectVirtualBaseClass => 0x1402,
            LeafKind::Index => 0x1404,
            LeafKind::VFuncTab => 0x1409,
            LeafKind::Enumerate => 0x1502,
            LeafKind::Array => 0x1503,
            LeafKind::Class => 0x1504,
            LeafKind::Structure => 0x1505,
            LeafKind::Union => 0x1506,
            LeafKind::Enum => 0x1507,
            LeafKind::Member => 0x150d,
            LeafKind::StaticMember => 0x150e,
            LeafKind::Method => 0x150f,
            LeafKind::NestedType => 0x1510,
            LeafKind::OneMethod => 0x1511,
            LeafKind::Interface => 0x1519,
            LeafKind::BaseInterface => 0x151a,
            LeafKind::Unknown(raw) => raw,
        }
    }

    /// Returns `true` for kinds that may appear as entries of a field list.
    #[must_use]
    pub fn is_field(self) -> bool {
        matches!(
            self,
            LeafKind::BaseClass
                | LeafKind::BaseInterface
                | LeafKind::VirtualBaseClass
                | LeafKind::IndirectVirtualBaseClass
                | LeafKind::Index
                | LeafKind::VFuncTab
                | LeafKind::Enumerate
                | LeafKind::Member
                | LeafKind::StaticMember
                | LeafKind::Method
                | LeafKind::NestedType
                | LeafKind::OneMethod
        )
    }

    /// Returns `true` for the three class-like kinds sharing one record layout.
    #[must_use]
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            LeafKind::Class | LeafKind::Structure | LeafKind::Interface
        )
    }

    /// Returns `true` if this tag is not decoded by this crate.
    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, LeafKind::Unknown(_))
    }
}

impl From<u16> for LeafKind {
    fn from(value: u16) -> Self {
        LeafKind::from_raw(value)
    }
}

impl From<LeafKind> for u16 {
    fn from(kind: LeafKind) -> Self {
        kind.to_raw()
    }
}
