//! Attribute words shared by several leaf kinds.
//!
//! - [`StructureAttributes`] - `CV_prop_t`, carried by class, structure, interface, union and enum
//!   records
//! - [`ModifierAttributes`] - `CV_modifier_t`, carried by `LF_MODIFIER`
//! - [`FieldAttributes`] - `CV_fldattr_t`, carried by most field list entries

use bitflags::bitflags;
use strum::{Display, EnumIter};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Properties of a class-like, union or enum type (`CV_prop_t`)
    pub struct StructureAttributes: u16 {
        /// Structure is packed
        const PACKED = 0x0001;
        /// Constructors or destructors are present
        const CTOR = 0x0002;
        /// Overloaded operators are present
        const OVERLOADED_OPERATORS = 0x0004;
        /// This is a nested type
        const NESTED = 0x0008;
        /// This type contains nested types
        const CONTAINS_NESTED = 0x0010;
        /// Overloaded assignment is present
        const OVERLOADED_ASSIGNMENT = 0x0020;
        /// Casting methods are present
        const OVERLOADED_CASTING = 0x0040;
        /// Forward reference, the definition lives in another record
        const FORWARD_REFERENCE = 0x0080;
        /// Scoped definition
        const SCOPED = 0x0100;
        /// A decorated (unique) name follows the regular name
        const HAS_UNIQUE_NAME = 0x0200;
        /// Type cannot be used as a base class
        const SEALED = 0x0400;
        /// Homogeneous floating-point aggregate kind (2 bits)
        const HFA_MASK = 0x1800;
        /// Intrinsic type such as `__m128`
        const INTRINSIC = 0x2000;
        /// MoCOM UDT kind (2 bits)
        const MOCOM_MASK = 0xC000;
    }
}

impl StructureAttributes {
    /// Homogeneous floating-point aggregate kind (`CV_HFA_e`).
    #[must_use]
    pub fn hfa(&self) -> u8 {
        ((self.bits() & Self::HFA_MASK.bits()) >> 11) as u8
    }

    /// MoCOM UDT kind (`CV_MOCOM_UDT_e`).
    #[must_use]
    pub fn mocom(&self) -> u8 {
        ((self.bits() & Self::MOCOM_MASK.bits()) >> 14) as u8
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Type qualifiers of an `LF_MODIFIER` record (`CV_modifier_t`)
    pub struct ModifierAttributes: u16 {
        /// `const`
        const CONST = 0x0001;
        /// `volatile`
        const VOLATILE = 0x0002;
        /// `__unaligned`
        const UNALIGNED = 0x0004;
    }
}

/// Member access protection (`CV_access_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberAccess {
    /// No access specified
    None,
    /// `private`
    Private,
    /// `protected`
    Protected,
    /// `public`
    Public,
}

/// Method properties (`CV_methodprop_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MethodProperties {
    /// Regular, non-virtual method
    Vanilla,
    /// Virtual method
    Virtual,
    /// Static method
    Static,
    /// Friend method
    Friend,
    /// Introducing virtual method; carries a vtable offset
    IntroVirtual,
    /// Pure virtual method
    PureVirtual,
    /// Introducing pure virtual method; carries a vtable offset
    PureIntroVirtual,
    /// Reserved value
    Reserved,
}

/// Attributes of a field list entry (`CV_fldattr_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldAttributes(pub u16);

impl FieldAttributes {
    /// Access protection, bits 0-1.
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        match self.0 & 0x0003 {
            1 => MemberAccess::Private,
            2 => MemberAccess::Protected,
            3 => MemberAccess::Public,
            _ => MemberAccess::None,
        }
    }

    /// Method properties, bits 2-4.
    #[must_use]
    pub fn method_properties(&self) -> MethodProperties {
        match (self.0 >> 2) & 0x0007 {
            0 => MethodProperties::Vanilla,
            1 => MethodProperties::Virtual,
            2 => MethodProperties::Static,
            3 => MethodProperties::Friend,
            4 => MethodProperties::IntroVirtual,
            5 => MethodProperties::PureVirtual,
            6 => MethodProperties::PureIntroVirtual,
            _ => MethodProperties::Reserved,
        }
    }

    /// Returns `true` if the method introduces a new vtable slot. Such entries carry an
    /// additional vtable offset in `LF_ONEMETHOD` and `LF_METHODLIST` records.
    #[must_use]
    pub fn is_intro_virtual(&self) -> bool {
        matches!(
            self.method_properties(),
            MethodProperties::IntroVirtual | MethodProperties::PureIntroVirtual
        )
    }

    /// Compiler generated function that does not exist in the source.
    #[must_use]
    pub fn is_pseudo(&self) -> bool {
        self.0 & 0x0020 != 0
    }

    /// Class cannot be inherited.
    #[must_use]
    pub fn is_no_inherit(&self) -> bool {
        self.0 & 0x0040 != 0
    }

    /// Class cannot be constructed.
    #[must_use]
    pub fn is_no_construct(&self) -> bool {
        self.0 & 0x0080 != 0
    }

    /// Compiler generated but existing function.
    #[must_use]
    pub fn is_compiler_generated(&self) -> bool {
        self.0 & 0x0100 != 0
    }

    /// Method cannot be overridden.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.0 & 0x0200 != 0
    }
}
