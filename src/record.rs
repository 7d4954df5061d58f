//! Record discriminants.

use zerocopy::TryFromBytes;

/// Name of the header field identifying a record's kind.
pub const OP: &str = "op";

/// The kind of a record, as stored in its `op` header field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum RecordKind {
    /// A serialized message on a connection.
    Message = 0x02,
    /// The bag header, found once as the first record.
    Header = 0x03,
    /// Offsets of messages on one connection within the preceding chunk.
    Index = 0x04,
    /// A block of connection and message records, possibly compressed.
    Chunk = 0x05,
    /// Summary of the messages within a chunk.
    ChunkInfo = 0x06,
    /// A topic and the message type published on it.
    Connection = 0x07,
}

impl RecordKind {
    /// Decode a discriminant byte, if it names a known kind.
    ///
    /// `0x00` is reserved for an unassigned discriminant and never decodes.
    pub fn from_op(op: u8) -> Option<Self> {
        let kind: Result<Self, _> = zerocopy::try_transmute!(op);
        kind.ok()
    }

    pub fn op(self) -> u8 {
        self as u8
    }
}
