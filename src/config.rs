//! Cursor configuration.

use crate::error::{Error, Result};

/// Tunables for a [`Cursor`](crate::Cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    header_length_limit: usize,
}

impl Config {
    /// Default value of [`header_length_limit`](Self::header_length_limit).
    pub const DEFAULT_HEADER_LENGTH_LIMIT: usize = 256;

    /// Smallest accepted [`header_length_limit`](Self::header_length_limit)
    /// is one more than this.
    pub const HEADER_LENGTH_FLOOR: usize = 8;

    /// Set the maximum number of bytes buffered for a header string (the
    /// format version line or a field name), including its terminator.
    pub fn with_header_length_limit(mut self, limit: usize) -> Result<Self> {
        if limit <= Self::HEADER_LENGTH_FLOOR {
            Err(Error::InvalidConfig {
                name: "header_length_limit",
                value: limit,
            })?;
        }

        self.header_length_limit = limit;
        Ok(self)
    }

    pub fn header_length_limit(&self) -> usize {
        self.header_length_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_length_limit: Self::DEFAULT_HEADER_LENGTH_LIMIT,
        }
    }
}

