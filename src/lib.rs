//! A streaming pull-parser for ROS bag files.
//!
//! Saddlebag walks a bag record by record and field by field, leaving the
//! caller to decide what to read and what to pass over. It never buffers more
//! than one header field or data section at a time, and checks every nested
//! length against its enclosing region as soon as it is read.
//!
//! Most users should begin by opening a [`Cursor`] and decoding the
//! [`BagHeader`]:
//!
//! ```no_run
//! use saddlebag::{BagHeader, Cursor, Node};
//!
//! fn main() -> saddlebag::Result<()> {
//!     let mut cursor = Cursor::open("session.bag")?;
//!     let header = BagHeader::read(&mut cursor)?;
//!     println!("{} connections", header.connection_count());
//!
//!     while cursor.advance()? {
//!         if let Node::FieldName(name) = cursor.node() {
//!             println!("{name}");
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Unrecognized header fields can always be [skipped](Cursor::skip), so
//! decoders for other record kinds can be written the same way as
//! [`BagHeader::read`].

pub mod config;
pub mod cursor;
pub mod error;
pub mod header;
pub mod record;
pub mod source;
pub mod version;

pub use config::Config;
pub use cursor::{Cursor, Node, State, value::Time, value::Value};
pub use error::{Error, Result};
pub use header::BagHeader;
pub use record::RecordKind;
pub use version::FormatVersion;
