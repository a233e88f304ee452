// Collecting Algorithms
//
// Consumption policies built on the row iterator: all rows, exactly one row,
// the first row, at most n rows, and streaming each row to a visitor. Every
// policy closes the cursor exactly once and joins the cursor's iteration and
// close errors onto whatever stopped it.

use crate::column::ColumnSet;
use crate::common::{BoxError, ScanError, ScanResult};
use crate::cursor::Rows;
use crate::executor::context::Context;
use crate::executor::iterator::RowIterator;

impl<'c, T: Default, R: Rows> RowIterator<'c, T, R> {
    /// Collect every row, in cursor order
    pub fn all(mut self) -> ScanResult<Vec<T>> {
        let mut list = Vec::with_capacity(self.config().initial_capacity);

        while self.next() {
            let mut value = T::default();
            if let Err(err) = self.scan(&mut value) {
                return Err(self.fail(err));
            }
            list.push(value);
        }

        self.conclude(None)?;
        Ok(list)
    }

    /// Collect exactly one row. Peeks for a second row before succeeding.
    pub fn one(mut self) -> ScanResult<T> {
        if !self.next() {
            return Err(self.stop(ScanError::NoRows));
        }

        let mut value = T::default();
        if let Err(err) = self.scan(&mut value) {
            return Err(self.fail(err));
        }

        if self.next() {
            return Err(self.stop(ScanError::TooManyRows));
        }

        self.conclude(None)?;
        Ok(value)
    }

    /// Collect the first row and ignore the rest
    pub fn first(mut self) -> ScanResult<T> {
        if !self.next() {
            return Err(self.stop(ScanError::NoRows));
        }

        let mut value = T::default();
        let scanned = self.scan(&mut value).err();
        self.conclude(scanned)?;
        Ok(value)
    }

    /// Collect at most `limit` rows.
    ///
    /// A row beyond the limit fails the call with `TooManyRows`; the rows
    /// collected so far are dropped.
    pub fn limit(mut self, limit: usize) -> ScanResult<Vec<T>> {
        let mut list = Vec::with_capacity(self.config().limit_capacity(limit));

        while self.next() {
            if list.len() >= limit {
                return Err(self.stop(ScanError::TooManyRows));
            }

            let mut value = T::default();
            if let Err(err) = self.scan(&mut value) {
                return Err(self.fail(err));
            }
            list.push(value);
        }

        self.conclude(None)?;
        Ok(list)
    }

    /// Stream every row to `visit`.
    ///
    /// `ctx` is handed to `visit` unchanged; iteration stops only on
    /// exhaustion, a scan failure or an error returned by `visit`.
    pub fn each<F, E>(mut self, ctx: &Context, mut visit: F) -> ScanResult<()>
    where
        F: FnMut(&Context, T) -> Result<(), E>,
        E: Into<BoxError>,
    {
        while self.next() {
            let mut value = T::default();
            if let Err(err) = self.scan(&mut value) {
                return Err(self.fail(err));
            }
            if let Err(err) = visit(ctx, value) {
                return Err(self.fail(ScanError::Visit(err.into())));
            }
        }

        self.conclude(None)
    }
}

/// Create a row iterator over `rows`
pub fn iter<'c, T, R, C>(rows: R, columns: &'c C) -> ScanResult<RowIterator<'c, T, R>>
where
    R: Rows,
    C: ColumnSet<T> + ?Sized,
{
    RowIterator::new(rows, columns)
}

/// Scan every row into a `T`
pub fn all<T, R, C>(rows: R, columns: &C) -> ScanResult<Vec<T>>
where
    T: Default,
    R: Rows,
    C: ColumnSet<T> + ?Sized,
{
    RowIterator::new(rows, columns)?.all()
}

/// Scan exactly one row; `NoRows` when empty, `TooManyRows` when there is a second row
pub fn one<T, R, C>(rows: R, columns: &C) -> ScanResult<T>
where
    T: Default,
    R: Rows,
    C: ColumnSet<T> + ?Sized,
{
    RowIterator::new(rows, columns)?.one()
}

/// Scan the first row; `NoRows` when empty
pub fn first<T, R, C>(rows: R, columns: &C) -> ScanResult<T>
where
    T: Default,
    R: Rows,
    C: ColumnSet<T> + ?Sized,
{
    RowIterator::new(rows, columns)?.first()
}

/// Scan at most `n` rows; `TooManyRows` when there are more
pub fn limit<T, R, C>(n: usize, rows: R, columns: &C) -> ScanResult<Vec<T>>
where
    T: Default,
    R: Rows,
    C: ColumnSet<T> + ?Sized,
{
    RowIterator::new(rows, columns)?.limit(n)
}

/// Stream every row to `visit`, passing `ctx` along
pub fn each<T, R, C, F, E>(ctx: &Context, visit: F, rows: R, columns: &C) -> ScanResult<()>
where
    T: Default,
    R: Rows,
    C: ColumnSet<T> + ?Sized,
    F: FnMut(&Context, T) -> Result<(), E>,
    E: Into<BoxError>,
{
    RowIterator::new(rows, columns)?.each(ctx, visit)
}
