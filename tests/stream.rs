//! End-to-end decoding of synthetic TPI streams.

use cvleaf::prelude::*;
use cvleaf::{
    leaves::{ClassKind, MemberAccess, PointerMode},
    stream::{TPI_HEADER_SIZE, TPI_VERSION_V80},
};

/// Minimal type stream builder: frames records and assigns indices from 0x1000.
struct StreamBuilder {
    records: Vec<u8>,
    next: u32,
}

impl StreamBuilder {
    fn new() -> Self {
        StreamBuilder {
            records: Vec::new(),
            next: 0x1000,
        }
    }

    fn add(&mut self, payload: &[u8]) -> u32 {
        self.records
            .extend_from_slice(&(payload.len() as u16).to_le_bytes());
        self.records.extend_from_slice(payload);
        self.next += 1;
        self.next - 1
    }

    fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&TPI_VERSION_V80.to_le_bytes());
        data.extend_from_slice(&TPI_HEADER_SIZE.to_le_bytes());
        data.extend_from_slice(&0x1000_u32.to_le_bytes());
        data.extend_from_slice(&self.next.to_le_bytes());
        data.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        data.extend_from_slice(&4_u32.to_le_bytes());
        data.extend_from_slice(&0x3FFFF_u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 24]);
        data.extend_from_slice(&self.records);
        data
    }
}

fn align(payload: &mut Vec<u8>) {
    while payload.len() % 4 != 0 {
        payload.push(0xF0 | (4 - payload.len() % 4) as u8);
    }
}

fn member(payload: &mut Vec<u8>, type_index: u32, offset: u16, name: &str) {
    payload.extend_from_slice(&[0x0d, 0x15, 0x03, 0x00]);
    payload.extend_from_slice(&type_index.to_le_bytes());
    payload.extend_from_slice(&offset.to_le_bytes());
    payload.extend_from_slice(name.as_bytes());
    payload.push(0);
    align(payload);
}

fn enumerate(payload: &mut Vec<u8>, value: u16, name: &str) {
    payload.extend_from_slice(&[0x02, 0x15, 0x03, 0x00]);
    payload.extend_from_slice(&value.to_le_bytes());
    payload.extend_from_slice(name.as_bytes());
    payload.push(0);
    align(payload);
}

fn structure(field_list: u32, member_count: u16, size: u16, name: &str) -> Vec<u8> {
    let mut payload = vec![0x05, 0x15];
    payload.extend_from_slice(&member_count.to_le_bytes());
    payload.extend_from_slice(&0_u16.to_le_bytes());
    payload.extend_from_slice(&field_list.to_le_bytes());
    payload.extend_from_slice(&[0u8; 8]);
    payload.extend_from_slice(&size.to_le_bytes());
    payload.extend_from_slice(name.as_bytes());
    payload.push(0);
    align(&mut payload);
    payload
}

/// struct Point { int x; int y; }; enum Color { Red, Green, Blue }; Point* ; const Point
fn sample_stream() -> (Vec<u8>, [u32; 6]) {
    let mut builder = StreamBuilder::new();

    let mut fields = vec![0x03, 0x12];
    member(&mut fields, 0x74, 0, "x");
    member(&mut fields, 0x74, 4, "y");
    let point_fields = builder.add(&fields);

    let point = builder.add(&structure(point_fields, 2, 8, "Point"));

    let mut fields = vec![0x03, 0x12];
    enumerate(&mut fields, 0, "Red");
    enumerate(&mut fields, 1, "Green");
    enumerate(&mut fields, 2, "Blue");
    let color_fields = builder.add(&fields);

    let mut color = vec![0x07, 0x15, 0x03, 0x00, 0x00, 0x00, 0x74, 0x00, 0x00, 0x00];
    color.extend_from_slice(&color_fields.to_le_bytes());
    color.extend_from_slice(b"Color\0");
    let color = builder.add(&color);

    let mut pointer = vec![0x02, 0x10];
    pointer.extend_from_slice(&point.to_le_bytes());
    pointer.extend_from_slice(&0x0001_000c_u32.to_le_bytes());
    let pointer = builder.add(&pointer);

    let mut modifier = vec![0x01, 0x10];
    modifier.extend_from_slice(&point.to_le_bytes());
    modifier.extend_from_slice(&[0x01, 0x00, 0xF2, 0xF1]);
    let modifier = builder.add(&modifier);

    (
        builder.build(),
        [point_fields, point, color_fields, color, pointer, modifier],
    )
}

#[test]
fn resolve_structure_members() {
    let (data, [point_fields, point, ..]) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let leaf = stream.get(TypeIndex(point)).unwrap();
    let LeafData::Class(class) = leaf.data() else {
        panic!("expected class, got {:?}", leaf.kind());
    };
    assert_eq!(class.kind, ClassKind::Structure);
    assert_eq!(class.name, "Point");
    assert_eq!(class.size_in_bytes(), 8);
    assert_eq!(class.field_list, TypeIndex(point_fields));

    let fields = stream.get(class.field_list).unwrap();
    let LeafData::FieldList(list) = fields.data() else {
        panic!("expected field list, got {:?}", fields.kind());
    };

    let members: Vec<_> = list
        .members()
        .map(|m| (m.name.as_str(), m.offset.as_u32(), m.attributes.access()))
        .collect();
    assert_eq!(
        members,
        vec![
            ("x", Some(0), MemberAccess::Public),
            ("y", Some(4), MemberAccess::Public),
        ]
    );
    assert!(stream.context().diagnostics().is_empty());
}

#[test]
fn resolve_enum_constants() {
    let (data, [_, _, _, color, ..]) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let leaf = stream.get(TypeIndex(color)).unwrap();
    let LeafData::Enum(value) = leaf.data() else {
        panic!("expected enum, got {:?}", leaf.kind());
    };
    assert_eq!(value.name, "Color");
    assert!(value.underlying_type.is_simple());

    let fields = stream.get(value.field_list).unwrap();
    let LeafData::FieldList(list) = fields.data() else {
        panic!("expected field list");
    };

    let constants: Vec<_> = list
        .enumerates()
        .map(|e| (e.name.clone(), e.value.as_i64()))
        .collect();
    assert_eq!(
        constants,
        vec![
            ("Red".to_string(), Some(0)),
            ("Green".to_string(), Some(1)),
            ("Blue".to_string(), Some(2)),
        ]
    );
}

#[test]
fn pointer_and_modifier_reference_by_index() {
    let (data, [_, point, _, _, pointer, modifier]) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let leaf = stream.get(TypeIndex(pointer)).unwrap();
    let LeafData::Pointer(pointer) = leaf.data() else {
        panic!("expected pointer");
    };
    assert_eq!(pointer.referent_type, TypeIndex(point));
    assert_eq!(pointer.attributes.mode(), PointerMode::Pointer);
    assert_eq!(pointer.attributes.size(), 8);

    let leaf = stream.get(TypeIndex(modifier)).unwrap();
    assert_eq!(leaf.kind(), LeafKind::Modifier);
    assert_eq!(leaf.data().references(), vec![TypeIndex(point)]);
}

#[test]
fn framing_positions_are_running_sums() {
    let (data, indices) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let mut expected = TPI_HEADER_SIZE as usize;
    for index in indices {
        let offset = stream.record_offset(TypeIndex(index)).unwrap();
        assert_eq!(offset, expected);

        let length = u16::from_le_bytes([data[offset], data[offset + 1]]) as usize;
        expected += 2 + length;
    }
    assert_eq!(expected, data.len());
}

#[test]
fn unknown_record_does_not_stop_the_stream() {
    let mut builder = StreamBuilder::new();
    builder.add(&[0xEE, 0xFF, 0x01, 0x02, 0x03]);
    builder.add(&[0x01, 0x10, 0x74, 0x00, 0x00, 0x00, 0x01, 0x00]);
    let data = builder.build();

    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();
    let leaves: Vec<_> = stream.iter().collect::<Result<_>>().unwrap();

    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].kind(), LeafKind::Unknown(0xFFEE));
    let LeafData::Unknown(unknown) = leaves[0].data() else {
        panic!("expected unknown leaf");
    };
    assert_eq!(unknown.data, vec![1, 2, 3]);

    assert_eq!(leaves[1].kind(), LeafKind::Modifier);
    assert_eq!(leaves[1].type_index(), TypeIndex(0x1001));
}

#[test]
fn rescanning_adds_no_diagnostics() {
    let mut builder = StreamBuilder::new();
    builder.add(&[0xEE, 0xFF, 0x01, 0x02, 0x03]);
    let data = builder.build();

    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();
    for _ in 0..3 {
        assert_eq!(stream.iter().count(), 1);
    }
    assert_eq!(stream.par_leaves().len(), 1);

    assert_eq!(stream.context().diagnostics().len(), 1);
}

#[test]
fn decoding_is_idempotent() {
    let (data, _) = sample_stream();

    let first: Vec<_> = TypeStream::new(&data, LeafReaderContext::default())
        .unwrap()
        .iter()
        .collect::<Result<_>>()
        .unwrap();
    let second: Vec<_> = TypeStream::new(&data, LeafReaderContext::new(ReaderConfig::lenient()))
        .unwrap()
        .iter()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn parallel_matches_sequential() {
    let (data, _) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let sequential: Vec<_> = stream.iter().map(|leaf| leaf.unwrap()).collect();
    let parallel: Vec<_> = stream
        .par_leaves()
        .into_iter()
        .map(|leaf| leaf.unwrap())
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn concurrent_get_decodes_once() {
    let (data, [_, point, ..]) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let leaves: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| stream.get(TypeIndex(point)).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for leaf in &leaves[1..] {
        assert!(std::sync::Arc::ptr_eq(&leaves[0], leaf));
    }
    assert_eq!(stream.cached(), 1);
}

#[test]
fn renumbering_merged_records() {
    let (data, _) = sample_stream();
    let stream = TypeStream::new(&data, LeafReaderContext::default()).unwrap();

    let mut merged: Vec<CodeViewLeaf> = stream.iter().collect::<Result<_>>().unwrap();
    for (i, leaf) in merged.iter_mut().enumerate() {
        leaf.reassign_type_index(TypeIndex(0x2000).offset(i)).unwrap();
    }

    assert_eq!(merged[0].type_index(), TypeIndex(0x2000));
    assert!(matches!(
        merged[0].reassign_type_index(TypeIndex(0x3000)),
        Err(Error::TypeIndexReassigned(_))
    ));
}

#[test]
fn stream_source_from_file() {
    use std::io::Write;

    let (data, [_, point, ..]) = sample_stream();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();

    let source = TypeStreamSource::from_file(file.path(), ReaderConfig::default()).unwrap();
    let stream = source.stream().unwrap();

    assert_eq!(stream.len(), 6);
    assert_eq!(stream.get(TypeIndex(point)).unwrap().name(), Some("Point"));
}
