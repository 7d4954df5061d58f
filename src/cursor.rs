//! Forward-only pull-parser over the records of a bag.
//!
//! # Architecture
//!
//! A [`Cursor`] sits at exactly one [`State`] at a time. Calling
//! [`Cursor::advance`] reads the next construct of the file and moves to its
//! successor state, after which the construct just read can be inspected
//! through [`Cursor::node`]. A bag is read in this order:
//!
//! 1. [`State::FormatVersion`], the version line.
//! 2. [`State::RecordHeader`], the header length of a record.
//! 3. For each header field, [`State::FieldName`] and then one or more
//!    [`State::FieldValue`].
//! 4. [`State::DataLength`] and [`State::RecordData`], the data section.
//! 5. Back to 2 for the next record, or [`State::End`].
//!
//! Every length-framed region the cursor enters is tracked on a
//! [`BudgetStack`](budget::BudgetStack), so a malformed length is reported as
//! soon as it disagrees with its enclosing region, and no read ever runs past
//! the end of the region it belongs to.
//!
//! Instead of reading a field value as raw bytes, a caller at
//! [`State::FieldName`] may [`read`](Cursor::read) it as a fixed-width
//! [`Value`], or [`skip`](Cursor::skip) it entirely. Skipping from
//! [`State::RecordHeader`] passes over every remaining field of the header,
//! and skipping from [`State::DataLength`] passes over the data section.
//!
//! Only one record's header field or data section is buffered at a time.

pub mod budget;
pub mod value;

use std::{fs::File, io::BufReader, path::Path};

use log::trace;

use crate::{
    config::Config,
    error::{Error, Result},
    record::{OP, RecordKind},
    source::{ByteSource, Seekable},
    version::FormatVersion,
};

use budget::BudgetStack;
use value::Value;

/// Largest step by which a field value or data section buffer grows.
const FILL_CHUNK: usize = 64 * 1024;

/// The construct a [`Cursor`] last read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Nothing has been read.
    Start,
    /// The format version line.
    FormatVersion,
    /// The header length of a record, or the end of a skipped field.
    RecordHeader,
    /// The name of a header field.
    FieldName,
    /// Some or all of the value of a header field.
    FieldValue,
    /// The data length of a record.
    DataLength,
    /// The data section of a record.
    RecordData,
    /// The source is exhausted.
    End,
}

/// The construct a [`Cursor`] last read, along with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Start,
    FormatVersion(&'a str),
    /// Bytes of header fields left to read in this record.
    RecordHeader {
        remaining: u32,
    },
    FieldName(&'a str),
    /// Raw value bytes. Empty after a typed read.
    FieldValue(&'a [u8]),
    /// Declared length of the data section.
    DataLength(u32),
    RecordData(&'a [u8]),
    End,
}

/// A pull-parser reading a bag from a [`ByteSource`].
///
/// A cursor exclusively owns its source, which is released when the cursor
/// is dropped. Once any operation fails, the position of the cursor is
/// undefined, and it should be discarded.
#[derive(Debug)]
pub struct Cursor<S> {
    source: S,
    config: Config,
    state: State,
    budgets: BudgetStack,

    /// The format version line or the current field name.
    text: String,
    /// The last raw field value or data section.
    bytes: Vec<u8>,

    version: Option<FormatVersion>,
    kind: Option<RecordKind>,
    data_length: u32,
}

impl Cursor<Seekable<BufReader<File>>> {
    /// Open a bag file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(Self::new(Seekable::new(file)?))
    }
}

impl<S: ByteSource> Cursor<S> {
    /// Create a cursor positioned at the start of a bag.
    pub fn new(source: S) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: S, config: Config) -> Self {
        Self {
            source,
            config,
            state: State::Start,
            budgets: BudgetStack::new(),
            text: String::new(),
            bytes: Vec::new(),
            version: None,
            kind: None,
            data_length: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The construct last read, with its payload.
    pub fn node(&self) -> Node<'_> {
        match self.state {
            State::Start => Node::Start,
            State::FormatVersion => Node::FormatVersion(&self.text),
            State::RecordHeader => Node::RecordHeader {
                remaining: self.budgets.top().unwrap_or(0),
            },
            State::FieldName => Node::FieldName(&self.text),
            State::FieldValue => Node::FieldValue(&self.bytes),
            State::DataLength => Node::DataLength(self.data_length),
            State::RecordData => Node::RecordData(&self.bytes),
            State::End => Node::End,
        }
    }

    /// The format version line, or the name of the current header field.
    pub fn text(&self) -> Result<&str> {
        match self.state {
            State::FormatVersion | State::FieldName | State::FieldValue => Ok(&self.text),
            _ => Err(self.invalid("read text")),
        }
    }

    /// The raw field value or data section last read.
    pub fn bytes(&self) -> Result<&[u8]> {
        match self.state {
            State::FieldValue | State::RecordData => Ok(&self.bytes),
            _ => Err(self.invalid("read bytes")),
        }
    }

    /// Bytes left in the innermost open region: the current field while at a
    /// field, otherwise the record header or data section.
    pub fn remaining(&self) -> Result<u32> {
        self.budgets
            .top()
            .map_err(|_| self.invalid("count remaining bytes"))
    }

    /// Number of open length-framed regions.
    pub fn depth(&self) -> usize {
        self.budgets.depth()
    }

    /// Kind of the current record, once its `op` field has been read.
    pub fn record_kind(&self) -> Option<RecordKind> {
        self.kind
    }

    /// Parsed format version, once the version line has been read.
    pub fn format_version(&self) -> Option<FormatVersion> {
        self.version
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// See [`Config::with_header_length_limit`].
    pub fn set_header_length_limit(&mut self, limit: usize) -> Result<()> {
        self.config = self.config.with_header_length_limit(limit)?;
        Ok(())
    }

    /// Release the byte source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read the next construct.
    ///
    /// Returns `false` once the source is exhausted at a record boundary.
    pub fn advance(&mut self) -> Result<bool> {
        match self.state {
            State::Start => self.read_format_version()?,
            State::FormatVersion | State::RecordData => return self.read_record(),
            State::RecordHeader if self.budgets.top()? == 0 => self.read_data_length()?,
            State::RecordHeader => self.read_field_name()?,
            State::FieldName => self.read_field_value()?,
            State::FieldValue if self.budgets.top()? == 0 => {
                self.budgets.pop()?;

                if self.budgets.top()? != 0 {
                    self.read_field_name()?;
                } else {
                    self.read_data_length()?;
                }
            }
            State::FieldValue => self.read_field_value()?,
            State::DataLength => self.read_data()?,
            State::End => return Ok(false),
        }

        Ok(true)
    }

    /// Read the value of the current field as a fixed-width value.
    ///
    /// Only valid at [`State::FieldName`]. Any bytes of the value beyond the
    /// width of `T` are left unread, and can be read by advancing or passed
    /// over by skipping.
    pub fn read<T: Value>(&mut self) -> Result<T> {
        if self.state != State::FieldName {
            Err(self.invalid("read a typed value"))?;
        }

        let mut raw = T::Raw::default();
        let width = raw.as_ref().len();

        let remaining = self.budgets.top()?;
        if (remaining as usize) < width {
            Err(Error::ValueTooSmall { width, remaining })?;
        }

        let is_op = self.text == OP;
        if is_op {
            self.check_op(remaining)?;
        }

        self.fill(raw.as_mut())?;
        self.budgets.consume(width as u32)?;

        if is_op {
            self.set_op(raw.as_ref()[0])?;
        }

        self.bytes.clear();
        self.state = State::FieldValue;

        Ok(T::decode(raw))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read()
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read()
    }

    /// Pass over unread bytes without buffering them.
    ///
    /// - At a field, passes over the rest of its value and returns to
    ///   [`State::RecordHeader`].
    /// - At [`State::RecordHeader`], passes over every remaining field of the
    ///   header. The cursor stays at [`State::RecordHeader`], ready to read
    ///   the data length.
    /// - At [`State::DataLength`], passes over the data section, moving to
    ///   [`State::RecordData`] with an empty payload.
    pub fn skip(&mut self) -> Result<()> {
        match self.state {
            State::FieldName | State::FieldValue => self.skip_field(),
            State::RecordHeader => {
                while self.budgets.top()? != 0 {
                    self.read_field_name()?;
                    self.skip_field()?;
                }

                Ok(())
            }
            State::DataLength => {
                let n = self.budgets.top()?;
                self.discard(n)?;
                self.budgets.consume(n)?;
                self.budgets.close()?;

                self.bytes.clear();
                self.state = State::RecordData;
                Ok(())
            }
            _ => Err(self.invalid("skip")),
        }
    }

    fn read_format_version(&mut self) -> Result<()> {
        self.read_text(b'\n', None)?;
        self.version = FormatVersion::parse(&self.text);
        self.state = State::FormatVersion;
        Ok(())
    }

    fn read_record(&mut self) -> Result<bool> {
        let mut buf = [0; 4];

        let length = match self.source.fill(&mut buf)? {
            0 => {
                trace!("Reached the end of the bag.");
                self.state = State::End;
                return Ok(false);
            }
            4 => u32::from_le_bytes(buf),
            _ => Err(Error::EndOfSource)?,
        };

        trace!("Record with {length} header bytes.");

        self.budgets.push(length);
        self.kind = None;
        self.state = State::RecordHeader;

        Ok(true)
    }

    fn read_field_name(&mut self) -> Result<()> {
        let remaining = self.budgets.top()?;
        if remaining < 4 {
            Err(Error::NestedTooLarge {
                length: 4,
                remaining,
            })?;
        }

        let length = u32::from_le_bytes(self.take()?);
        self.budgets.consume(4)?;
        let remaining = remaining - 4;

        if length == 0 {
            Err(Error::ZeroLengthField)?;
        }
        if length > remaining {
            Err(Error::NestedTooLarge { length, remaining })?;
        }

        self.budgets.consume(length)?;
        self.budgets.push(length);

        self.read_text(b'=', Some(length))?;
        self.budgets.consume(self.text.len() as u32 + 1)?;

        trace!("Field `{}` with {length} bytes.", self.text);

        self.state = State::FieldName;
        Ok(())
    }

    fn read_field_value(&mut self) -> Result<()> {
        let n = self.budgets.top()?;

        let is_op = self.state == State::FieldName && self.text == OP;
        if is_op {
            self.check_op(n)?;
        }

        self.read_bytes(n)?;

        if is_op {
            let op = self.bytes[0];
            self.set_op(op)?;
        }

        self.state = State::FieldValue;
        Ok(())
    }

    fn read_data_length(&mut self) -> Result<()> {
        let length = u32::from_le_bytes(self.take()?);
        self.budgets.replace(length)?;

        self.data_length = length;
        self.state = State::DataLength;
        Ok(())
    }

    fn read_data(&mut self) -> Result<()> {
        let n = self.budgets.top()?;
        self.read_bytes(n)?;
        self.budgets.close()?;

        self.state = State::RecordData;
        Ok(())
    }

    fn skip_field(&mut self) -> Result<()> {
        let n = self.budgets.top()?;
        self.discard(n)?;
        self.budgets.consume(n)?;
        self.budgets.pop()?;

        self.state = State::RecordHeader;
        Ok(())
    }

    fn check_op(&self, size: u32) -> Result<()> {
        if size != 1 {
            Err(Error::DiscriminantSize(size))?;
        }
        if self.kind.is_some() {
            Err(Error::DuplicateDiscriminant)?;
        }

        Ok(())
    }

    fn set_op(&mut self, op: u8) -> Result<()> {
        let kind = RecordKind::from_op(op).ok_or(Error::UnknownRecordKind(op))?;
        self.kind = Some(kind);
        Ok(())
    }

    /// Read a string up to a terminator, which is consumed but not stored.
    ///
    /// The terminator must fall within `bound` bytes, if given.
    fn read_text(&mut self, terminator: u8, bound: Option<u32>) -> Result<()> {
        let limit = self.config.header_length_limit();

        let mut buf = std::mem::take(&mut self.text).into_bytes();
        buf.clear();

        loop {
            if bound.is_some_and(|b| buf.len() >= b as usize) {
                Err(Error::MissingSeparator)?;
            }
            if buf.len() >= limit {
                Err(Error::TextTooLong { limit })?;
            }

            let [b]: [u8; 1] = self.take()?;
            if b == terminator {
                break;
            }

            buf.push(b);
        }

        self.text = String::from_utf8(buf)?;
        Ok(())
    }

    /// Read `n` bytes into the value buffer, consuming them from the budget.
    ///
    /// The buffer grows by at most [`FILL_CHUNK`] bytes ahead of what the
    /// source has delivered.
    fn read_bytes(&mut self, n: u32) -> Result<()> {
        let len = n as usize;
        self.bytes.clear();

        while self.bytes.len() < len {
            let start = self.bytes.len();
            let end = len.min(start + FILL_CHUNK);
            self.bytes.resize(end, 0);

            if self.source.fill(&mut self.bytes[start..])? < end - start {
                Err(Error::EndOfSource)?;
            }
        }

        self.budgets.consume(n)?;
        Ok(())
    }

    /// Take an exact number of bytes from the source.
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.source.fill(buf)? < buf.len() {
            Err(Error::EndOfSource)?;
        }

        Ok(())
    }

    fn discard(&mut self, n: u32) -> Result<()> {
        if self.source.discard(n as u64)? < n as u64 {
            Err(Error::EndOfSource)?;
        }

        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state,
        }
    }
}
