//! `LF_FIELDLIST`: the member list of a class, union or enum.
//!
//! A field list is a sequence of tag-prefixed entries without individual length prefixes. Each
//! entry is decoded through the same dispatcher as top-level records, and the `LF_PAD*` filler
//! bytes that align entries to four bytes are skipped in between. Since entries have no length,
//! an entry of unknown kind swallows the rest of the list.
//!
//! Compilers split long field lists into several records chained through a trailing
//! [`IndexField`]; [`FieldList::continuation`] exposes that link, following it is up to the
//! caller.

use crate::{
    file::parser::Parser,
    leaves::{
        read_leaf_nested, DiagnosticCategory, DiagnosticSeverity, EnumerateField, IndexField,
        LeafData, LeafReaderContext, MemberField, TypeIndex,
    },
    Result,
};

/// Decoded entries of an `LF_FIELDLIST` record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldList {
    /// Entries in stream order
    pub fields: Vec<LeafData>,
}

impl FieldList {
    pub(crate) fn read(
        context: &LeafReaderContext,
        type_index: TypeIndex,
        parser: &mut Parser<'_>,
        depth: usize,
    ) -> Result<Self> {
        let mut fields = Vec::new();

        loop {
            parser.skip_padding();
            if !parser.has_more_data() {
                break;
            }

            let offset = parser.absolute_pos();
            let entry = read_leaf_nested(context, TypeIndex::NONE, parser, depth + 1)?;

            let kind = entry.kind();
            if !kind.is_field() {
                tracing::debug!(%kind, offset, %type_index, "non-field leaf inside field list");
                context.report(
                    DiagnosticSeverity::Warning,
                    DiagnosticCategory::FieldList,
                    format!("unexpected {kind} leaf (0x{:04x}) in field list", kind.to_raw()),
                    offset,
                    Some(type_index),
                );
            }

            fields.push(entry.into_data());
        }

        Ok(FieldList { fields })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &LeafData> {
        self.fields.iter()
    }

    /// The next part of a split list, if this part ends with an `LF_INDEX` entry.
    #[must_use]
    pub fn continuation(&self) -> Option<TypeIndex> {
        self.fields.iter().rev().find_map(|field| match field {
            LeafData::Index(IndexField { continuation }) => Some(*continuation),
            _ => None,
        })
    }

    /// Non-static data members.
    pub fn members(&self) -> impl Iterator<Item = &MemberField> {
        self.fields.iter().filter_map(|field| match field {
            LeafData::Member(member) => Some(member),
            _ => None,
        })
    }

    /// Enumerator constants.
    pub fn enumerates(&self) -> impl Iterator<Item = &EnumerateField> {
        self.fields.iter().filter_map(|field| match field {
            LeafData::Enumerate(enumerate) => Some(enumerate),
            _ => None,
        })
    }
}
