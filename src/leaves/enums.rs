//! `LF_ENUM` types and their `LF_ENUMERATE` constants.

use crate::{
    file::parser::Parser,
    leaves::{
        class::read_unique_name, read_name, read_numeric_checked, FieldAttributes,
        LeafReaderContext, NumericLiteral, StructureAttributes, TypeIndex,
    },
    Result,
};

/// An enumeration type.
///
/// The enumerators themselves live in the referenced field list as [`EnumerateField`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Number of enumerators
    pub member_count: u16,
    /// Type properties
    pub attributes: StructureAttributes,
    /// Integral type the enumerators are stored as
    pub underlying_type: TypeIndex,
    /// `LF_FIELDLIST` holding the enumerators
    pub field_list: TypeIndex,
    /// Type name
    pub name: String,
    /// Decorated name, present if [`StructureAttributes::HAS_UNIQUE_NAME`] is set
    pub unique_name: Option<String>,
}

impl EnumType {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        let member_count = parser.read_le::<u16>()?;
        let attributes = StructureAttributes::from_bits_retain(parser.read_le::<u16>()?);
        let underlying_type = TypeIndex(parser.read_le::<u32>()?);
        let field_list = TypeIndex(parser.read_le::<u32>()?);
        let name = read_name(context, parser);
        let unique_name = read_unique_name(context, attributes, parser);

        Ok(EnumType {
            member_count,
            attributes,
            underlying_type,
            field_list,
            name,
            unique_name,
        })
    }
}

/// A named enumerator constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerateField {
    /// Access protection of the constant
    pub attributes: FieldAttributes,
    /// The constant's value
    pub value: NumericLiteral,
    /// The constant's name
    pub name: String,
}

impl EnumerateField {
    pub(crate) fn read(context: &LeafReaderContext, parser: &mut Parser<'_>) -> Result<Self> {
        let attributes = FieldAttributes(parser.read_le::<u16>()?);
        let value = read_numeric_checked(context, parser)?;
        let name = read_name(context, parser);

        Ok(EnumerateField {
            attributes,
            value,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaves::MemberAccess;

    #[test]
    fn enum_type() {
        #[rustfmt::skip]
        let data = [
            0x03, 0x00,                     // three enumerators
            0x00, 0x00,
            0x74, 0x00, 0x00, 0x00,         // T_INT4
            0x10, 0x10, 0x00, 0x00,         // field list
            b'C', b'o', b'l', b'o', b'r', 0x00,
        ];

        let context = LeafReaderContext::default();
        let mut parser = Parser::new(&data);
        let value = EnumType::read(&context, &mut parser).unwrap();

        assert_eq!(value.member_count, 3);
        assert!(value.underlying_type.is_simple());
        assert_eq!(value.underlying_type, TypeIndex(0x74));
        assert_eq!(value.field_list, TypeIndex(0x1010));
        assert_eq!(value.name, "Color");
        assert!(value.unique_name.is_none());
    }

    #[test]
    fn enumerate_immediate() {
        let data = [0x03, 0x00, 0x03, 0x00, b'R', b'e', b'd', 0x00];
        let context = LeafReaderContext::default();
        let mut parser = Parser::new(&data);

        let field = EnumerateField::read(&context, &mut parser).unwrap();
        assert_eq!(field.attributes.access(), MemberAccess::Public);
        assert_eq!(field.value, NumericLiteral::Immediate(3));
        assert_eq!(field.name, "Red");
        assert!(!parser.has_more_data());
    }

    #[test]
    fn enumerate_negative() {
        let data = [0x03, 0x00, 0x01, 0x80, 0xFF, 0xFF, b'N', 0x00];
        let context = LeafReaderContext::default();
        let mut parser = Parser::new(&data);

        let field = EnumerateField::read(&context, &mut parser).unwrap();
        assert_eq!(field.value.as_i64(), Some(-1));
        assert_eq!(field.name, "N");
    }
}
