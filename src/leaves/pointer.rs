//! `LF_POINTER`: pointers, references and pointers to members.
//!
//! The record is a referent type index followed by a packed 32-bit attribute word
//! (`CV_ptrattr_t`). Pointers to members (modes [`PointerMode::PointerToDataMember`] and
//! [`PointerMode::PointerToMemberFunction`]) carry two more fields naming the containing class
//! and the member pointer representation.
//!
//! ```text
//! bits  0-4   pointer kind (near, far, 32-bit, 64-bit, ...)
//! bits  5-7   mode (pointer, lvalue ref, pointer to member, rvalue ref)
//! bit   8     flat 0:32
//! bit   9     volatile
//! bit  10     const
//! bit  11     unaligned
//! bit  12     restrict
//! bits 13-18  size in bytes
//! bit  19     MoCOM pointer
//! bit  20     `&` ref-qualified this
//! bit  21     `&&` ref-qualified this
//! ```
//!
//! # Examples
//!
//! ```rust
//! use cvleaf::leaves::{PointerAttributes, PointerKind, PointerMode};
//!
//! // 64-bit, const, size 8
//! let attributes = PointerAttributes(0x0001_040c);
//! assert_eq!(attributes.kind(), PointerKind::Near64);
//! assert_eq!(attributes.mode(), PointerMode::Pointer);
//! assert!(attributes.is_const());
//! assert_eq!(attributes.size(), 8);
//! ```

use strum::Display;

use crate::{file::parser::Parser, leaves::TypeIndex, Result};

/// Addressing model of a pointer (`CV_ptrtype_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PointerKind {
    /// 16-bit near pointer
    Near16,
    /// 16:16 far pointer
    Far16,
    /// 16:16 huge pointer
    Huge16,
    /// Based on segment
    BasedOnSegment,
    /// Based on value of base
    BasedOnValue,
    /// Based on segment value of base
    BasedOnSegmentValue,
    /// Based on address of base
    BasedOnAddress,
    /// Based on segment address of base
    BasedOnSegmentAddress,
    /// Based on type
    BasedOnType,
    /// Based on self
    BasedOnSelf,
    /// 32-bit pointer
    Near32,
    /// 16:32 pointer
    Far32,
    /// 64-bit pointer
    Near64,
    /// Any other value
    Unknown(u8),
}

impl PointerKind {
    /// Maps the 5-bit kind field.
    #[must_use]
    pub fn from_raw(value: u8) -> Self {
        match value {
            0x00 => PointerKind::Near16,
            0x01 => PointerKind::Far16,
            0x02 => PointerKind::Huge16,
            0x03 => PointerKind::BasedOnSegment,
            0x04 => PointerKind::BasedOnValue,
            0x05 => PointerKind::BasedOnSegmentValue,
            0x06 => PointerKind::BasedOnAddress,
            0x07 => PointerKind::BasedOnSegmentAddress,
            0x08 => PointerKind::BasedOnType,
            0x09 => PointerKind::BasedOnSelf,
            0x0a => PointerKind::Near32,
            0x0b => PointerKind::Far32,
            0x0c => PointerKind::Near64,
            other => PointerKind::Unknown(other),
        }
    }
}

/// What a pointer record denotes (`CV_ptrmode_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PointerMode {
    /// Ordinary pointer
    Pointer,
    /// `T&`
    LValueReference,
    /// Pointer to data member
    PointerToDataMember,
    /// Pointer to member function
    PointerToMemberFunction,
    /// `T&&`
    RValueReference,
    /// Any other value
    Reserved(u8),
}

impl PointerMode {
    /// Maps the 3-bit mode field.
    #[must_use]
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => PointerMode::Pointer,
            1 => PointerMode::LValueReference,
            2 => PointerMode::PointerToDataMember,
            3 => PointerMode::PointerToMemberFunction,
            4 => PointerMode::RValueReference,
            other => PointerMode::Reserved(other),
        }
    }

    /// Returns `true` for the two pointer-to-member modes.
    #[must_use]
    pub fn is_member_pointer(self) -> bool {
        matches!(
            self,
            PointerMode::PointerToDataMember | PointerMode::PointerToMemberFunction
        )
    }
}

/// The packed `CV_ptrattr_t` word of an `LF_POINTER` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerAttributes(pub u32);

impl PointerAttributes {
    /// Addressing model.
    #[must_use]
    pub fn kind(&self) -> PointerKind {
        PointerKind::from_raw((self.0 & 0x1f) as u8)
    }

    /// Pointer, reference or member pointer.
    #[must_use]
    pub fn mode(&self) -> PointerMode {
        PointerMode::from_raw(((self.0 >> 5) & 0x7) as u8)
    }

    /// `true` if this is a 0:32 flat pointer.
    #[must_use]
    pub fn is_flat32(&self) -> bool {
        self.0 & (1 << 8) != 0
    }

    /// `true` if the pointer itself is `volatile`.
    #[must_use]
    pub fn is_volatile(&self) -> bool {
        self.0 & (1 << 9) != 0
    }

    /// `true` if the pointer itself is `const`.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.0 & (1 << 10) != 0
    }

    /// `true` if the pointer is `__unaligned`.
    #[must_use]
    pub fn is_unaligned(&self) -> bool {
        self.0 & (1 << 11) != 0
    }

    /// `true` if the pointer is `__restrict`.
    #[must_use]
    pub fn is_restrict(&self) -> bool {
        self.0 & (1 << 12) != 0
    }

    /// Size of the pointer in bytes.
    ///
    /// Older compilers leave the size field zero; the size is then derived from the kind.
    #[must_use]
    pub fn size(&self) -> u8 {
        let size = ((self.0 >> 13) & 0x3f) as u8;
        if size != 0 {
            return size;
        }

        match self.kind() {
            PointerKind::Near32 | PointerKind::Far32 => 4,
            PointerKind::Near64 => 8,
            _ => 0,
        }
    }

    /// `true` for MoCOM pointers (`^` or `%`).
    #[must_use]
    pub fn is_mocom(&self) -> bool {
        self.0 & (1 << 19) != 0
    }

    /// `true` if this is the `this` pointer of a `&` ref-qualified member function.
    #[must_use]
    pub fn is_lvalue_ref_this(&self) -> bool {
        self.0 & (1 << 20) != 0
    }

    /// `true` if this is the `this` pointer of a `&&` ref-qualified member function.
    #[must_use]
    pub fn is_rvalue_ref_this(&self) -> bool {
        self.0 & (1 << 21) != 0
    }

    /// `true` for `T&` and `T&&`.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(
            self.mode(),
            PointerMode::LValueReference | PointerMode::RValueReference
        )
    }
}

/// Trailing data of a pointer to member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberPointerInfo {
    /// Class the member belongs to
    pub containing_class: TypeIndex,
    /// Representation of the member pointer (`CV_pmtype_e`)
    pub representation: u16,
}

/// A pointer or reference type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerType {
    /// The pointed-to type
    pub referent_type: TypeIndex,
    /// Packed attribute word
    pub attributes: PointerAttributes,
    /// Present for pointers to members
    pub member_pointer: Option<MemberPointerInfo>,
}

impl PointerType {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        let referent_type = TypeIndex(parser.read_le::<u32>()?);
        let attributes = PointerAttributes(parser.read_le::<u32>()?);

        let member_pointer = if attributes.mode().is_member_pointer() {
            Some(MemberPointerInfo {
                containing_class: TypeIndex(parser.read_le::<u32>()?),
                representation: parser.read_le::<u16>()?,
            })
        } else {
            None
        };

        Ok(PointerType {
            referent_type,
            attributes,
            member_pointer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pointer() {
        let data = [0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);

        let pointer = PointerType::read(&mut parser).unwrap();
        assert_eq!(pointer.referent_type, TypeIndex(0x10));
        assert_eq!(pointer.attributes, PointerAttributes(0));
        assert_eq!(pointer.attributes.kind(), PointerKind::Near16);
        assert_eq!(pointer.attributes.mode(), PointerMode::Pointer);
        assert!(pointer.member_pointer.is_none());
        assert!(!parser.has_more_data());
    }

    #[test]
    fn attribute_bits() {
        // Near64, lvalue reference, volatile, const, size 8, rvalue-ref this
        let attributes =
            PointerAttributes(0x0c | (1 << 5) | (1 << 9) | (1 << 10) | (8 << 13) | (1 << 21));

        assert_eq!(attributes.kind(), PointerKind::Near64);
        assert_eq!(attributes.mode(), PointerMode::LValueReference);
        assert!(attributes.is_reference());
        assert!(attributes.is_volatile());
        assert!(attributes.is_const());
        assert!(!attributes.is_unaligned());
        assert!(!attributes.is_restrict());
        assert!(!attributes.is_flat32());
        assert!(!attributes.is_mocom());
        assert!(!attributes.is_lvalue_ref_this());
        assert!(attributes.is_rvalue_ref_this());
        assert_eq!(attributes.size(), 8);
    }

    #[test]
    fn size_fallback() {
        assert_eq!(PointerAttributes(0x0a).size(), 4);
        assert_eq!(PointerAttributes(0x0c).size(), 8);
        assert_eq!(PointerAttributes(0x00).size(), 0);
    }

    #[test]
    fn member_pointer() {
        #[rustfmt::skip]
        let data = [
            0x74, 0x00, 0x00, 0x00,             // int
            0x4c, 0x00, 0x01, 0x00,             // Near64, data member, size 8
            0x00, 0x11, 0x00, 0x00,             // containing class
            0x01, 0x00,                         // representation
        ];
        let mut parser = Parser::new(&data);

        let pointer = PointerType::read(&mut parser).unwrap();
        assert_eq!(pointer.attributes.mode(), PointerMode::PointerToDataMember);
        assert_eq!(
            pointer.member_pointer,
            Some(MemberPointerInfo {
                containing_class: TypeIndex(0x1100),
                representation: 1,
            })
        );
        assert!(!parser.has_more_data());
    }

    #[test]
    fn unknown_modes() {
        assert_eq!(PointerKind::from_raw(0x1f), PointerKind::Unknown(0x1f));
        assert_eq!(PointerMode::from_raw(7), PointerMode::Reserved(7));
        assert!(!PointerMode::Reserved(7).is_member_pointer());
    }
}
