// Row Iterator
//
// The row iterator binds a column set to a live cursor. It resolves the
// binding plan once, then for every row performs one physical scan into the
// bound destinations and applies each column to the target in declared order.

use log::{trace, warn};

use crate::column::{Binding, BindingPlan, ColumnSet};
use crate::common::{Destination, ScanError, ScanResult};
use crate::cursor::Rows;
use crate::executor::config::ScanConfig;

/// Per-call driver binding a column set to a cursor.
///
/// The cursor is closed exactly once: by `close`, by one of the collecting
/// methods, or when the iterator is dropped.
pub struct RowIterator<'c, T, R: Rows> {
    /// The cursor being driven
    rows: R,
    /// Destinations and columns, one per result column position
    plan: BindingPlan<'c, T>,
    /// Collection settings
    config: ScanConfig,
    /// Whether the cursor has been closed
    closed: bool,
}

impl<'c, T, R: Rows> RowIterator<'c, T, R> {
    /// Create an iterator with the default configuration
    pub fn new<C>(rows: R, columns: &'c C) -> ScanResult<Self>
    where
        C: ColumnSet<T> + ?Sized,
    {
        Self::with_config(rows, columns, ScanConfig::default())
    }

    /// Create an iterator, resolving the binding plan against the cursor.
    ///
    /// If the plan cannot be resolved the cursor is closed before returning.
    pub fn with_config<C>(mut rows: R, columns: &'c C, config: ScanConfig) -> ScanResult<Self>
    where
        C: ColumnSet<T> + ?Sized,
    {
        match columns.bind(&rows) {
            Ok(plan) => Ok(RowIterator {
                rows,
                plan,
                config,
                closed: false,
            }),
            Err(err) => {
                let close = rows.close().err().map(ScanError::Close);
                Err(err.join_with([close]))
            }
        }
    }

    /// Advance to the next row. `false` on exhaustion or iteration error.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        !self.closed && self.rows.next()
    }

    /// Scan the current row into `target`.
    ///
    /// Stops at the first failing column; later columns are not applied.
    pub fn scan(&mut self, target: &mut T) -> ScanResult<()> {
        {
            let mut dest: Vec<&mut dyn Destination> = self
                .plan
                .bindings_mut()
                .iter_mut()
                .map(|binding| binding.destination())
                .collect();
            self.rows.scan(&mut dest).map_err(ScanError::Scan)?;
        }

        for binding in self.plan.bindings_mut() {
            if let Binding::Column(column) = binding {
                column.apply(target)?;
            }
        }
        Ok(())
    }

    /// Scan the current row into a fresh value
    pub fn value(&mut self) -> ScanResult<T>
    where
        T: Default,
    {
        let mut value = T::default();
        self.scan(&mut value)?;
        Ok(value)
    }

    /// Take the cursor's iteration error, if any
    pub fn err(&mut self) -> Option<ScanError> {
        self.rows.err().map(ScanError::Iteration)
    }

    /// Close the cursor. Calls after the first are no-ops.
    pub fn close(&mut self) -> ScanResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        trace!("closing rows after scan ({} bound columns)", self.plan.bound());
        self.rows.close().map_err(ScanError::Close)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Finish the call: join `cause` with the iteration error and the close
    /// error
    pub(crate) fn conclude(&mut self, cause: Option<ScanError>) -> ScanResult<()> {
        let iteration = self.err();
        let close = self.close().err();
        ScanError::join_result([cause, iteration, close])
    }

    /// Finish the call after a row-level failure
    pub(crate) fn fail(&mut self, cause: ScanError) -> ScanError {
        let iteration = self.err();
        let close = self.close().err();
        cause.join_with([iteration, close])
    }

    /// Finish the call on a stop condition; the signal is joined last
    pub(crate) fn stop(&mut self, signal: ScanError) -> ScanError {
        let iteration = self.err();
        let close = self.close().err();
        match ScanError::join([iteration, close]) {
            Some(err) => err.join_with([Some(signal)]),
            None => signal,
        }
    }
}

impl<'c, T, R: Rows> Drop for RowIterator<'c, T, R> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.close() {
            warn!("closing rows on drop failed: {}", err);
        }
    }
}
