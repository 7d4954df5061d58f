//! Nested length accounting.
//!
//! Every length-framed region the cursor is inside of (a record header, a
//! field, a data section) holds one entry on a [`BudgetStack`], counting the
//! bytes left before the region is complete. The innermost region is on top.

use thiserror::Error;
use tinyvec::TinyVec;

/// An error manipulating a [`BudgetStack`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// No region is open.
    #[error("No length-framed region is open.")]
    Empty,
    /// More bytes were consumed than the innermost region holds.
    #[error("Consuming {requested} bytes overruns the {remaining} remaining in this region.")]
    Overrun { requested: u32, remaining: u32 },
    /// A region was closed before all of its bytes were consumed.
    #[error("Region closed with {0} bytes still unread.")]
    Unfinished(u32),
    /// An inner-region pop would have closed the outermost region.
    #[error("The outermost region cannot be closed as an inner region.")]
    Outermost,
    /// The outermost region was closed while inner regions were still open.
    #[error("Cannot close the record with {0} regions open.")]
    Nested(usize),
}

/// A stack of remaining-byte counters, one per open region.
#[derive(Debug, Default)]
pub struct BudgetStack {
    // Records nest at most two deep, so this rarely leaves the inline store.
    budgets: TinyVec<[u32; 4]>,
}

impl BudgetStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a nested region holding `n` bytes.
    pub fn push(&mut self, n: u32) {
        self.budgets.push(n);
    }

    /// Bytes remaining in the innermost region.
    pub fn top(&self) -> Result<u32, BudgetError> {
        self.budgets.last().copied().ok_or(BudgetError::Empty)
    }

    /// Subtract `n` bytes from the innermost region.
    pub fn consume(&mut self, n: u32) -> Result<(), BudgetError> {
        let top = self.budgets.last_mut().ok_or(BudgetError::Empty)?;

        if n > *top {
            Err(BudgetError::Overrun {
                requested: n,
                remaining: *top,
            })?;
        }

        *top -= n;
        Ok(())
    }

    /// Overwrite the innermost budget.
    pub fn replace(&mut self, n: u32) -> Result<(), BudgetError> {
        *self.budgets.last_mut().ok_or(BudgetError::Empty)? = n;
        Ok(())
    }

    /// Close a fully consumed inner region.
    ///
    /// Refuses to close the last open region, which belongs to the record
    /// itself and is closed with [`close`](Self::close).
    pub fn pop(&mut self) -> Result<(), BudgetError> {
        match self.budgets.len() {
            0 => Err(BudgetError::Empty),
            1 => Err(BudgetError::Outermost),
            _ => self.finish(),
        }
    }

    /// Close the fully consumed outermost region, leaving the stack empty.
    pub fn close(&mut self) -> Result<(), BudgetError> {
        match self.budgets.len() {
            0 => Err(BudgetError::Empty),
            1 => self.finish(),
            n => Err(BudgetError::Nested(n)),
        }
    }

    /// Number of open regions.
    pub fn depth(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }

    fn finish(&mut self) -> Result<(), BudgetError> {
        match self.budgets.pop() {
            Some(0) => Ok(()),
            Some(n) => {
                self.budgets.push(n);
                Err(BudgetError::Unfinished(n))
            }
            None => Err(BudgetError::Empty),
        }
    }
}
