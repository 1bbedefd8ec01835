//! Function signatures: `LF_PROCEDURE`, `LF_MFUNCTION` and their `LF_ARGLIST`.
//!
//! ```text
//! LF_PROCEDURE                       LF_MFUNCTION
//!   u32  return type                   u32  return type
//!   u8   calling convention            u32  class type
//!   u8   function attributes           u32  this type
//!   u16  parameter count               u8   calling convention
//!   u32  argument list                 u8   function attributes
//!                                      u16  parameter count
//!                                      u32  argument list
//!                                      i32  this adjustment
//! ```

use bitflags::bitflags;
use strum::Display;

use crate::{file::parser::Parser, leaves::TypeIndex, Result};

/// Calling convention of a function type (`CV_call_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CallingConvention {
    /// near right to left push, caller pops stack
    NearC,
    /// far right to left push, caller pops stack
    FarC,
    /// near left to right push, callee pops stack
    NearPascal,
    /// far left to right push, callee pops stack
    FarPascal,
    /// near left to right push with regs, callee pops stack
    NearFast,
    /// far left to right push with regs, callee pops stack
    FarFast,
    /// near standard call
    NearStd,
    /// far standard call
    FarStd,
    /// near sys call
    NearSys,
    /// far sys call
    FarSys,
    /// `this` call (this passed in register)
    ThisCall,
    /// Mips call
    MipsCall,
    /// Generic call sequence
    Generic,
    /// Alpha call
    AlphaCall,
    /// PPC call
    PpcCall,
    /// Hitachi SuperH call
    ShCall,
    /// ARM call
    ArmCall,
    /// AM33 call
    Am33Call,
    /// TriCore call
    TriCall,
    /// Hitachi SuperH-5 call
    Sh5Call,
    /// M32R call
    M32rCall,
    /// CLR call
    ClrCall,
    /// Marker for routines always inlined
    Inline,
    /// near left to right push with regs, callee pops stack
    NearVector,
    /// Swift calling convention
    Swift,
    /// Any other value
    Unknown(u8),
}

impl CallingConvention {
    /// Maps the raw calling convention byte.
    #[must_use]
    pub fn from_raw(value: u8) -> Self {
        match value {
            0x00 => CallingConvention::NearC,
            0x01 => CallingConvention::FarC,
            0x02 => CallingConvention::NearPascal,
            0x03 => CallingConvention::FarPascal,
            0x04 => CallingConvention::NearFast,
            0x05 => CallingConvention::FarFast,
            0x07 => CallingConvention::NearStd,
            0x08 => CallingConvention::FarStd,
            0x09 => CallingConvention::NearSys,
            0x0a => CallingConvention::FarSys,
            0x0b => CallingConvention::ThisCall,
            0x0c => CallingConvention::MipsCall,
            0x0d => CallingConvention::Generic,
            0x0e => CallingConvention::AlphaCall,
            0x0f => CallingConvention::PpcCall,
            0x10 => CallingConvention::ShCall,
            0x11 => CallingConvention::ArmCall,
            0x12 => CallingConvention::Am33Call,
            0x13 => CallingConvention::TriCall,
            0x14 => CallingConvention::Sh5Call,
            0x15 => CallingConvention::M32rCall,
            0x16 => CallingConvention::ClrCall,
            0x17 => CallingConvention::Inline,
            0x18 => CallingConvention::NearVector,
            0x19 => CallingConvention::Swift,
            other => CallingConvention::Unknown(other),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Function attributes (`CV_funcattr_t`)
    pub struct FunctionAttributes: u8 {
        /// Returns a user-defined type by value (C++ style)
        const CXX_RETURN_UDT = 0x01;
        /// Instance constructor
        const CONSTRUCTOR = 0x02;
        /// Instance constructor of a class with virtual bases
        const CONSTRUCTOR_VIRTUAL_BASE = 0x04;
    }
}

/// A free function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureType {
    /// Return type
    pub return_type: TypeIndex,
    /// Calling convention
    pub calling_convention: CallingConvention,
    /// Function attributes
    pub attributes: FunctionAttributes,
    /// Number of parameters
    pub parameter_count: u16,
    /// `LF_ARGLIST` with the parameter types
    pub argument_list: TypeIndex,
}

impl ProcedureType {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(ProcedureType {
            return_type: TypeIndex(parser.read_le::<u32>()?),
            calling_convention: CallingConvention::from_raw(parser.read_le::<u8>()?),
            attributes: FunctionAttributes::from_bits_retain(parser.read_le::<u8>()?),
            parameter_count: parser.read_le::<u16>()?,
            argument_list: TypeIndex(parser.read_le::<u32>()?),
        })
    }
}

/// A member function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFunctionType {
    /// Return type
    pub return_type: TypeIndex,
    /// Class the function belongs to
    pub class_type: TypeIndex,
    /// Type of the `this` pointer; [`TypeIndex::NONE`] for static member functions
    pub this_type: TypeIndex,
    /// Calling convention
    pub calling_convention: CallingConvention,
    /// Function attributes
    pub attributes: FunctionAttributes,
    /// Number of parameters, not counting `this`
    pub parameter_count: u16,
    /// `LF_ARGLIST` with the parameter types
    pub argument_list: TypeIndex,
    /// Adjustment applied to `this` before the call
    pub this_adjustment: i32,
}

impl MemberFunctionType {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(MemberFunctionType {
            return_type: TypeIndex(parser.read_le::<u32>()?),
            class_type: TypeIndex(parser.read_le::<u32>()?),
            this_type: TypeIndex(parser.read_le::<u32>()?),
            calling_convention: CallingConvention::from_raw(parser.read_le::<u8>()?),
            attributes: FunctionAttributes::from_bits_retain(parser.read_le::<u8>()?),
            parameter_count: parser.read_le::<u16>()?,
            argument_list: TypeIndex(parser.read_le::<u32>()?),
            this_adjustment: parser.read_le::<i32>()?,
        })
    }

    /// Returns `true` if the function has no `this` pointer.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.this_type.is_none()
    }
}

/// Parameter types of a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    /// One type per parameter, in declaration order
    pub arguments: Vec<TypeIndex>,
}

impl ArgumentList {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        let count = parser.read_le::<u32>()? as usize;
        if count > parser.remaining() / 4 {
            return Err(malformed_error!(
                "argument list claims {} entries, only {} bytes remain",
                count,
                parser.remaining()
            ));
        }

        let mut arguments = Vec::with_capacity(count);
        for _ in 0..count {
            arguments.push(TypeIndex(parser.read_le::<u32>()?));
        }

        Ok(ArgumentList { arguments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn procedure() {
        #[rustfmt::skip]
        let data = [
            0x03, 0x00, 0x00, 0x00,     // void
            0x00,                       // near C
            0x00,
            0x02, 0x00,                 // two parameters
            0x01, 0x10, 0x00, 0x00,     // argument list
        ];
        let mut parser = Parser::new(&data);

        let procedure = ProcedureType::read(&mut parser).unwrap();
        assert_eq!(procedure.return_type, TypeIndex(0x03));
        assert_eq!(procedure.calling_convention, CallingConvention::NearC);
        assert!(procedure.attributes.is_empty());
        assert_eq!(procedure.parameter_count, 2);
        assert_eq!(procedure.argument_list, TypeIndex(0x1001));
    }

    #[test]
    fn member_function() {
        #[rustfmt::skip]
        let data = [
            0x03, 0x00, 0x00, 0x00,     // void
            0x00, 0x11, 0x00, 0x00,     // class
            0x01, 0x11, 0x00, 0x00,     // this
            0x0b,                       // thiscall
            0x02,                       // constructor
            0x00, 0x00,
            0x02, 0x11, 0x00, 0x00,
            0xF8, 0xFF, 0xFF, 0xFF,     // this adjustment -8
        ];
        let mut parser = Parser::new(&data);

        let function = MemberFunctionType::read(&mut parser).unwrap();
        assert_eq!(function.class_type, TypeIndex(0x1100));
        assert_eq!(function.this_type, TypeIndex(0x1101));
        assert_eq!(function.calling_convention, CallingConvention::ThisCall);
        assert!(function.attributes.contains(FunctionAttributes::CONSTRUCTOR));
        assert_eq!(function.this_adjustment, -8);
        assert!(!function.is_static());
        assert!(!parser.has_more_data());
    }

    #[test]
    fn argument_list() {
        let data = [
            0x02, 0x00, 0x00, 0x00, 0x74, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00,
        ];
        let mut parser = Parser::new(&data);

        let list = ArgumentList::read(&mut parser).unwrap();
        assert_eq!(list.arguments, vec![TypeIndex(0x74), TypeIndex(0x1000)]);
    }

    #[test]
    fn argument_list_count_overflow() {
        let data = [0xFF, 0xFF, 0xFF, 0x7F, 0x74, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);

        assert!(matches!(
            ArgumentList::read(&mut parser),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_calling_convention() {
        assert_eq!(CallingConvention::from_raw(0x06), CallingConvention::Unknown(0x06));
        assert_eq!(CallingConvention::from_raw(0x07), CallingConvention::NearStd);
    }
}
