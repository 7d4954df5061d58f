#![allow(dead_code)]

/// Builds bags in memory, one record at a time.
pub struct Bag(Vec<u8>);

impl Bag {
    pub fn new() -> Self {
        Self(b"#ROSBAG V2.0\n".to_vec())
    }

    pub fn record(mut self, fields: &[(&str, &[u8])], data: &[u8]) -> Self {
        self.0.extend(record(fields, data));
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Encode a header field as `len`, `name`, `=`, `value`.
pub fn field(name: &str, value: &[u8]) -> Vec<u8> {
    let len = (name.len() + 1 + value.len()) as u32;

    let mut out = len.to_le_bytes().to_vec();
    out.extend_from_slice(name.as_bytes());
    out.push(b'=');
    out.extend_from_slice(value);
    out
}

/// Encode a record from its fields and data section.
pub fn record(fields: &[(&str, &[u8])], data: &[u8]) -> Vec<u8> {
    let header: Vec<u8> = fields.iter().flat_map(|(n, v)| field(n, v)).collect();

    let mut out = (header.len() as u32).to_le_bytes().to_vec();
    out.extend(header);
    out.extend((data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// The header record fields of a bag with five chunks and two connections.
pub fn header_fields() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("chunk_count", 5u32.to_le_bytes().to_vec()),
        ("conn_count", 2u32.to_le_bytes().to_vec()),
        ("index_pos", 0u64.to_le_bytes().to_vec()),
        ("op", vec![0x03]),
    ]
}

pub fn borrowed<'a>(fields: &'a [(&'a str, Vec<u8>)]) -> Vec<(&'a str, &'a [u8])> {
    fields.iter().map(|(n, v)| (*n, v.as_slice())).collect()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
