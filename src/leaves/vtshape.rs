//! `LF_VTSHAPE`: the layout of a virtual function table.
//!
//! A count of slots followed by one 4-bit descriptor per slot, two descriptors per byte with the
//! low nibble first.

use strum::Display;

use crate::{file::parser::Parser, Result};

/// Descriptor of one vtable slot (`CV_VTS_desc_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum VTableShapeEntry {
    /// 16-bit near pointer
    Near,
    /// 16:16 far pointer
    Far,
    /// Thin pointer
    Thin,
    /// Address point displacement to outermost class
    Outer,
    /// Far pointer to metaclass descriptor
    Meta,
    /// 32-bit near pointer
    Near32,
    /// 16:32 far pointer
    Far32,
    /// Unused slot
    Unused,
    /// Values 8 to 15
    Reserved(u8),
}

impl VTableShapeEntry {
    /// Maps a 4-bit descriptor.
    #[must_use]
    pub fn from_raw(value: u8) -> Self {
        match value & 0x0f {
            0 => VTableShapeEntry::Near,
            1 => VTableShapeEntry::Far,
            2 => VTableShapeEntry::Thin,
            3 => VTableShapeEntry::Outer,
            4 => VTableShapeEntry::Meta,
            5 => VTableShapeEntry::Near32,
            6 => VTableShapeEntry::Far32,
            7 => VTableShapeEntry::Unused,
            other => VTableShapeEntry::Reserved(other),
        }
    }
}

/// Shape of a virtual function table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VTableShape {
    /// One descriptor per slot
    pub entries: Vec<VTableShapeEntry>,
}

impl VTableShape {
    pub(crate) fn read(parser: &mut Parser<'_>) -> Result<Self> {
        let count = usize::from(parser.read_le::<u16>()?);
        let packed = parser.read_bytes(count.div_ceil(2))?;

        let entries = packed
            .iter()
            .flat_map(|&byte| [byte & 0x0f, byte >> 4])
            .take(count)
            .map(VTableShapeEntry::from_raw)
            .collect();

        Ok(VTableShape { entries })
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn odd_count() {
        // three slots: Near32, Near32, Unused
        let data = [0x03, 0x00, 0x55, 0x07];
        let mut parser = Parser::new(&data);

        let shape = VTableShape::read(&mut parser).unwrap();
        assert_eq!(
            shape.entries,
            vec![
                VTableShapeEntry::Near32,
                VTableShapeEntry::Near32,
                VTableShapeEntry::Unused
            ]
        );
        assert_eq!(shape.len(), 3);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn empty_shape() {
        let data = [0x00, 0x00];
        let mut parser = Parser::new(&data);

        let shape = VTableShape::read(&mut parser).unwrap();
        assert!(shape.is_empty());
    }

    #[test]
    fn truncated_descriptors() {
        let data = [0x05, 0x00, 0x55];
        let mut parser = Parser::new(&data);

        assert!(matches!(
            VTableShape::read(&mut parser),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn reserved_descriptor() {
        assert_eq!(VTableShapeEntry::from_raw(0x0c), VTableShapeEntry::Reserved(0x0c));
        assert_eq!(VTableShapeEntry::from_raw(0x01), VTableShapeEntry::Far);
    }
}
