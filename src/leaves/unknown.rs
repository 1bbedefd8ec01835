//! Opaque fallback for leaf kinds without a structured decoder.

use crate::file::parser::Parser;

/// A record whose kind tag is not decoded.
///
/// Keeps the raw tag and every payload byte after it, so nothing is lost and a later consumer
/// can still interpret the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLeaf {
    /// The kind tag as found in the stream
    pub kind: u16,
    /// Payload bytes following the tag
    pub data: Vec<u8>,
}

impl UnknownLeaf {
    /// Takes the rest of the window as payload.
    pub(crate) fn read(kind: u16, parser: &mut Parser<'_>) -> Self {
        UnknownLeaf {
            kind,
            data: parser.read_to_end().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_remaining_bytes() {
        let data = [0x01, 0x02, 0x03];
        let mut parser = Parser::new(&data);

        let leaf = UnknownLeaf::read(0xFFEE, &mut parser);
        assert_eq!(leaf.kind, 0xFFEE);
        assert_eq!(leaf.data, vec![1, 2, 3]);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn empty_payload() {
        let mut parser = Parser::new(&[]);

        let leaf = UnknownLeaf::read(0x1605, &mut parser);
        assert!(leaf.data.is_empty());
    }
}
