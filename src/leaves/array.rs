//! `LF_ARRAY` and `LF_BITFIELD`.

use crate::{
    file::parser::Parser,
    leaves::{read_name, read_numeric_checked, LeafReaderContext, NumericLiteral, TypeIndex},
    Result,
};

/// A fixed size array type.
///
/// Multi-dimensional arrays are encoded as arrays of arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    /// Type of one element
    pub element_type: TypeIndex,
    /// Type of the index
    pub index_type: TypeIndex,
    /// Total size of the array in bytes (not the element count)
    pub size: NumericLiteral,
    /// Name, usually empty
    pub name: String,
}

impl ArrayType {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        let element_type = TypeIndex(parser.read_le::<u32>()?);
        let index_type = TypeIndex(parser.read_le::<u32>()?);
        let size = read_numeric_checked(context, parser)?;
        let name = read_name(context, parser);

        Ok(ArrayType {
            element_type,
            index_type,
            size,
            name,
        })
    }
}

/// The type of a bit field member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitfieldType {
    /// Underlying integral type
    pub underlying_type: TypeIndex,
    /// Width in bits
    pub length: u8,
    /// Position of the lowest bit
    pub position: u8,
}

impl BitfieldType {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(BitfieldType {
            underlying_type: TypeIndex(parser.read_le::<u32>()?),
            length: parser.read_le::<u8>()?,
            position: parser.read_le::<u8>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_ints() {
        #[rustfmt::skip]
        let data = [
            0x74, 0x00, 0x00, 0x00,     // int
            0x23, 0x00, 0x00, 0x00,     // unsigned __int64
            0x28, 0x00,                 // 40 bytes
            0x00,                       // no name
            0xF1,
        ];
        let context = LeafReaderContext::default();
        let mut parser = Parser::new(&data);

        let array = ArrayType::read(&context, &mut parser).unwrap();
        assert_eq!(array.element_type, TypeIndex(0x74));
        assert_eq!(array.index_type, TypeIndex(0x23));
        assert_eq!(array.size.as_u32(), Some(40));
        assert!(array.name.is_empty());
    }

    #[test]
    fn large_array() {
        #[rustfmt::skip]
        let data = [
            0x20, 0x00, 0x00, 0x00,
            0x23, 0x00, 0x00, 0x00,
            0x04, 0x80, 0x00, 0x00, 0x01, 0x00, // LF_ULONG 0x10000
            0x00,
        ];
        let context = LeafReaderContext::default();
        let mut parser = Parser::new(&data);

        let array = ArrayType::read(&context, &mut parser).unwrap();
        assert_eq!(array.size, NumericLiteral::ULong(0x10000));
    }

    #[test]
    fn bitfield() {
        let data = [0x75, 0x00, 0x00, 0x00, 0x03, 0x05, 0xF2, 0xF1];
        let mut parser = Parser::new(&data);

        let bitfield = BitfieldType::read(&mut parser).unwrap();
        assert_eq!(bitfield.underlying_type, TypeIndex(0x75));
        assert_eq!(bitfield.length, 3);
        assert_eq!(bitfield.position, 5);
        assert_eq!(parser.remaining(), 2);
    }
}
