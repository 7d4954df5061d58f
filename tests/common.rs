use std::{fs::File, io::BufReader, path::Path};

use csv::ReaderBuilder;
use saddlebag::{
    BagHeader, Cursor, FormatVersion, Node, RecordKind, State,
    source::{ByteSource, Sequential},
};

#[test]
fn walk_slice_header_only() {
    const PATH: &str = "fixtures/header-only.bag";
    let data = std::fs::read(PATH).unwrap();
    Validator::new(PATH).walk(&mut Cursor::new(data.as_slice()));
}

#[test]
fn walk_slice_chatter() {
    const PATH: &str = "fixtures/chatter.bag";
    let data = std::fs::read(PATH).unwrap();
    Validator::new(PATH).walk(&mut Cursor::new(data.as_slice()));
}

#[test]
fn walk_reader_chatter() {
    const PATH: &str = "fixtures/chatter.bag";
    let file = BufReader::new(File::open(PATH).unwrap());
    Validator::new(PATH).walk(&mut Cursor::new(Sequential::new(file)));
}

#[test]
fn walk_file_chatter() {
    const PATH: &str = "fixtures/chatter.bag";
    Validator::new(PATH).walk(&mut Cursor::open(PATH).unwrap());
}

#[test]
fn skip_file_chatter() {
    const PATH: &str = "fixtures/chatter.bag";
    let expected = Validator::new(PATH).0;

    let mut cursor = Cursor::open(PATH).unwrap();
    let header = BagHeader::read(&mut cursor).unwrap();
    assert_eq!(header.first_record_offset(), 4117);
    assert_eq!(header.connection_count(), 1);
    assert_eq!(header.chunk_count(), 0);

    // Pass over every remaining record without reading a single value.
    let mut records = 0;
    while cursor.advance().unwrap() {
        cursor.skip().unwrap();
        assert!(cursor.advance().unwrap());

        let expected_data: u32 = expected[records + 1][1].parse().unwrap();
        assert_eq!(cursor.node(), Node::DataLength(expected_data));

        cursor.skip().unwrap();
        assert_eq!(cursor.node(), Node::RecordData(&[]));
        records += 1;
    }

    assert_eq!(records, expected.len() - 1);
    assert_eq!(cursor.state(), State::End);
}

#[test]
fn decode_header_only() {
    let mut cursor = Cursor::open("fixtures/header-only.bag").unwrap();
    let header = BagHeader::read(&mut cursor).unwrap();

    assert_eq!(header.first_record_offset(), 0);
    assert_eq!(header.connection_count(), 2);
    assert_eq!(header.chunk_count(), 5);

    assert_eq!(cursor.format_version(), Some(FormatVersion::V2_0));
    assert!(!cursor.advance().unwrap());
}

/// Expected records of a fixture: the `op` byte, the data length, and then
/// each field name followed by its value in hexadecimal.
struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn walk(mut self, cursor: &mut Cursor<impl ByteSource>) {
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.node(), Node::FormatVersion("#ROSBAG V2.0"));

        while cursor.advance().unwrap() {
            assert_eq!(cursor.state(), State::RecordHeader);
            assert_eq!(cursor.depth(), 1);

            let mut record = self.0.remove(0).into_iter();
            let op: u8 = record.next().unwrap().parse().unwrap();
            let data_length: u32 = record.next().unwrap().parse().unwrap();

            let mut fields = Vec::new();
            assert!(cursor.advance().unwrap());

            while let Node::FieldName(name) = cursor.node() {
                let name = name.to_string();
                assert_eq!(cursor.depth(), 2);

                assert!(cursor.advance().unwrap());
                let Node::FieldValue(value) = cursor.node() else {
                    panic!("expected a field value, found {:?}", cursor.node());
                };
                fields.push([name, hex(value)]);

                assert!(cursor.advance().unwrap());
            }

            assert_eq!(fields.concat(), record.collect::<Vec<_>>());
            assert_eq!(cursor.record_kind(), RecordKind::from_op(op));
            assert_eq!(cursor.node(), Node::DataLength(data_length));

            assert!(cursor.advance().unwrap());
            let Node::RecordData(data) = cursor.node() else {
                panic!("expected record data, found {:?}", cursor.node());
            };
            assert_eq!(data.len(), data_length as usize);
            assert_eq!(cursor.depth(), 0);
        }

        assert!(self.0.is_empty());
        assert_eq!(cursor.state(), State::End);
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
