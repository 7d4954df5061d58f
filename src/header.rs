//! The bag header record.

use log::debug;
use tartan_bitfield::bitfield;
use thiserror::Error;

use crate::{
    cursor::{Cursor, State},
    error::{Error, Result},
    record::{OP, RecordKind},
    source::ByteSource,
};

const INDEX_POS: &str = "index_pos";
const CONN_COUNT: &str = "conn_count";
const CHUNK_COUNT: &str = "chunk_count";

/// An error decoding the bag header record.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The first record is not a bag header.
    #[error("The first record is not a bag header ({0:?}).")]
    NotHeader(Option<RecordKind>),
    /// A required field never appeared.
    #[error("Required field `{0}` is missing.")]
    MissingField(&'static str),
    /// A known field appeared more than once.
    #[error("Found a duplicate `{0}` field.")]
    DuplicateField(&'static str),
}

/// Summary of a bag, stored once as its first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BagHeader {
    first_record_offset: u64,
    connection_count: u32,
    chunk_count: u32,
}

bitfield! {
    struct Seen(u8) {
        [0] first_record_offset,
        [1] connection_count,
        [2] chunk_count,
        [3] kind,
    }
}

impl BagHeader {
    /// Decode the bag header from a cursor at the start of a bag, or just
    /// after its format version line.
    ///
    /// Unknown fields are passed over, as are any fields following the
    /// required ones. On success, the cursor is left at
    /// [`State::RecordData`] of the header record.
    pub fn read<S: ByteSource>(cursor: &mut Cursor<S>) -> Result<Self> {
        if cursor.state() == State::Start {
            cursor.advance()?;
        }

        if cursor.state() != State::FormatVersion {
            Err(Error::InvalidState {
                operation: "read the bag header",
                state: cursor.state(),
            })?;
        }

        if !cursor.advance()? {
            Err(Error::EndOfSource)?;
        }

        let mut seen = Seen(0);

        let mut first_record_offset = 0;
        let mut connection_count = 0;
        let mut chunk_count = 0;

        while !(seen.first_record_offset()
            && seen.connection_count()
            && seen.chunk_count()
            && seen.kind())
        {
            if cursor.remaining()? == 0 {
                Err(HeaderError::MissingField(first_missing(&seen)))?;
            }

            cursor.advance()?;

            let name = cursor.text()?;
            match name {
                INDEX_POS => {
                    if seen.first_record_offset() {
                        Err(HeaderError::DuplicateField(INDEX_POS))?;
                    }

                    first_record_offset = cursor.read_u64()?;
                    seen.set_first_record_offset(true);
                }
                CONN_COUNT => {
                    if seen.connection_count() {
                        Err(HeaderError::DuplicateField(CONN_COUNT))?;
                    }

                    connection_count = cursor.read_u32()?;
                    seen.set_connection_count(true);
                }
                CHUNK_COUNT => {
                    if seen.chunk_count() {
                        Err(HeaderError::DuplicateField(CHUNK_COUNT))?;
                    }

                    chunk_count = cursor.read_u32()?;
                    seen.set_chunk_count(true);
                }
                OP => {
                    cursor.advance()?;

                    let kind = cursor.record_kind();
                    if kind != Some(RecordKind::Header) {
                        Err(HeaderError::NotHeader(kind))?;
                    }

                    seen.set_kind(true);
                }
                _ => debug!("Skipping unknown bag header field `{name}`."),
            }

            // Pass over anything left of the value.
            cursor.skip()?;
        }

        // Pass over the remaining fields, then the data section.
        cursor.skip()?;
        cursor.advance()?;
        cursor.skip()?;

        Ok(Self {
            first_record_offset,
            connection_count,
            chunk_count,
        })
    }

    /// Offset of the first record after the chunk section.
    pub fn first_record_offset(&self) -> u64 {
        self.first_record_offset
    }

    /// Number of unique connections in the bag.
    pub fn connection_count(&self) -> u32 {
        self.connection_count
    }

    /// Number of chunk records in the bag.
    pub fn chunk_count(&self) -> u32 {
        self.chunk_count
    }
}

fn first_missing(seen: &Seen) -> &'static str {
    if !seen.first_record_offset() {
        INDEX_POS
    } else if !seen.connection_count() {
        CONN_COUNT
    } else if !seen.chunk_count() {
        CHUNK_COUNT
    } else {
        OP
    }
}
