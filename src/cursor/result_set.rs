// In-Memory Result Set
//
// This module implements a cursor over rows that are already materialized in
// memory. It is the reference implementation of the `Rows` contract.

use thiserror::Error;

use crate::common::{BoxError, ConversionError, DataValue, Destination};
use crate::cursor::Rows;

/// Errors reported by a `ResultSet` cursor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultSetError {
    #[error("expected {expected} destination arguments in scan, not {actual}")]
    DestinationCount { expected: usize, actual: usize },
    #[error("scan called without calling next")]
    NotPositioned,
    #[error("rows are closed")]
    Closed,
    #[error("converting column {index} ({name}): {source}")]
    Conversion {
        index: usize,
        name: String,
        #[source]
        source: ConversionError,
    },
    #[error("row {row} has {actual} values, but the result set has {expected} columns")]
    RowWidth { row: usize, expected: usize, actual: usize },
}

/// Query resultset representation
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column names in the resultset
    columns: Vec<String>,
    /// Rows of data, each in column order
    rows: Vec<Vec<DataValue>>,
    /// Index of the current row, `None` before the first `next`
    position: Option<usize>,
    /// Whether `close` has been called
    closed: bool,
}

impl ResultSet {
    /// Create a new empty resultset with column names
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        ResultSet {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            position: None,
            closed: false,
        }
    }

    /// Create a resultset from column names and rows
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<DataValue>>,
    ) -> Result<Self, ResultSetError> {
        let mut result_set = ResultSet::new(columns);
        for row in rows {
            result_set.add_row(row)?;
        }
        Ok(result_set)
    }

    /// Add a row to the resultset
    pub fn add_row(&mut self, row: Vec<DataValue>) -> Result<(), ResultSetError> {
        if row.len() != self.columns.len() {
            return Err(ResultSetError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder form of `add_row`
    pub fn with_row(mut self, row: Vec<DataValue>) -> Result<Self, ResultSetError> {
        self.add_row(row)?;
        Ok(self)
    }

    /// Get the rows in the resultset
    pub fn rows(&self) -> &[Vec<DataValue>] {
        &self.rows
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current(&self) -> Result<&[DataValue], ResultSetError> {
        if self.closed {
            return Err(ResultSetError::Closed);
        }
        match self.position {
            Some(index) if index < self.rows.len() => Ok(&self.rows[index]),
            _ => Err(ResultSetError::NotPositioned),
        }
    }
}

impl Rows for ResultSet {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        if self.closed {
            return Err(Box::new(ResultSetError::Closed));
        }
        Ok(self.columns.clone())
    }

    fn next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let next = self.position.map_or(0, |index| index + 1);
        // Stays past the end once exhausted
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn scan(&mut self, dest: &mut [&mut dyn Destination]) -> Result<(), BoxError> {
        let row = self.current()?;
        if dest.len() != row.len() {
            return Err(Box::new(ResultSetError::DestinationCount {
                expected: row.len(),
                actual: dest.len(),
            }));
        }

        for (index, (slot, value)) in dest.iter_mut().zip(row.iter()).enumerate() {
            slot.assign(value.clone()).map_err(|source| ResultSetError::Conversion {
                index,
                name: self.columns[index].clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn err(&mut self) -> Option<BoxError> {
        None
    }

    fn close(&mut self) -> Result<(), BoxError> {
        self.closed = true;
        Ok(())
    }
}
