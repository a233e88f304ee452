// Cursor Module
//
// This module defines the cursor contract the scanning engine drives. A
// cursor is a forward-only sequence of rows over a fixed set of named columns.

pub mod result_set;

pub use self::result_set::{ResultSet, ResultSetError};

use crate::common::{BoxError, Destination};

/// The Rows trait defines the interface a data source cursor exposes to the
/// scanning engine. Implementations are owned by the caller; the engine
/// borrows one for a single scan call and closes it before returning.
pub trait Rows {
    /// Column names of the current result set, in row order
    fn columns(&self) -> Result<Vec<String>, BoxError>;

    /// Advance to the next row. `false` signals exhaustion or an iteration
    /// error, which is then reported by `err`.
    fn next(&mut self) -> bool;

    /// Write the current row into `dest`, one value per destination
    fn scan(&mut self, dest: &mut [&mut dyn Destination]) -> Result<(), BoxError>;

    /// Take the last error encountered while iterating, if any
    fn err(&mut self) -> Option<BoxError>;

    /// Release the cursor's resources
    fn close(&mut self) -> Result<(), BoxError>;
}

impl<R: Rows + ?Sized> Rows for &mut R {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        (**self).columns()
    }

    fn next(&mut self) -> bool {
        (**self).next()
    }

    fn scan(&mut self, dest: &mut [&mut dyn Destination]) -> Result<(), BoxError> {
        (**self).scan(dest)
    }

    fn err(&mut self) -> Option<BoxError> {
        (**self).err()
    }

    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }
}

impl<R: Rows + ?Sized> Rows for Box<R> {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        (**self).columns()
    }

    fn next(&mut self) -> bool {
        (**self).next()
    }

    fn scan(&mut self, dest: &mut [&mut dyn Destination]) -> Result<(), BoxError> {
        (**self).scan(dest)
    }

    fn err(&mut self) -> Option<BoxError> {
        (**self).err()
    }

    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }
}
