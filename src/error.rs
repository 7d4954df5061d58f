use thiserror::Error;

use crate::{State, cursor::budget::BudgetError, header::HeaderError};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors occurring while reading a bag.
///
/// None of these are recoverable: once an operation fails, the cursor's
/// position is undefined and it must be discarded.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the byte source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The source ended inside a declared length.
    #[error("Unexpectedly reached the end of the source.")]
    EndOfSource,
    /// A length broke the accounting of its enclosing region.
    #[error("Incorrect nested length: {0}")]
    Budget(#[from] BudgetError),
    /// A header field declared a length of zero.
    #[error("Found a header field of length zero.")]
    ZeroLengthField,
    /// A nested length does not fit in the region enclosing it.
    #[error("Nested length ({length}) is larger than the {remaining} bytes left in its parent.")]
    NestedTooLarge { length: u32, remaining: u32 },
    /// A field name ran to the end of its field without a `=`.
    #[error("Header field name has no `=` separator.")]
    MissingSeparator,
    /// A header string exceeded the configured limit.
    #[error("Header string is longer than the limit ({limit}).")]
    TextTooLong { limit: usize },
    /// A header string was not valid UTF-8.
    #[error("Header string is not valid UTF-8.")]
    InvalidText(#[from] std::string::FromUtf8Error),
    /// A record declared its discriminant twice.
    #[error("Found a duplicate `op` field.")]
    DuplicateDiscriminant,
    /// A discriminant value was not exactly one byte.
    #[error("Incorrect `op` field size ({0}).")]
    DiscriminantSize(u32),
    /// A discriminant value names no known record kind.
    #[error("Unknown record kind ({0:#04x}).")]
    UnknownRecordKind(u8),
    /// A typed read was wider than the remaining field value.
    #[error("Field value ({remaining} bytes) is too small for a {width}-byte read.")]
    ValueTooSmall { width: usize, remaining: u32 },
    /// An operation was invoked in a state that does not support it.
    #[error("Cannot {operation} in state {state:?}.")]
    InvalidState {
        operation: &'static str,
        state: State,
    },
    /// A configuration value was out of range.
    #[error("Invalid value ({value}) for `{name}`.")]
    InvalidConfig { name: &'static str, value: usize },
    /// Incorrect bag header.
    #[error("Incorrect bag header: {0}")]
    Header(#[from] HeaderError),
}
