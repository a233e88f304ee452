// Column Module
//
// A column binds one result column to a mutation of the target value. This
// module defines the column contracts and the two ways of declaring a column
// set: positionally (`ColumnList`) or by result column name (`Columns`).

pub mod func;
pub mod payload;

pub use self::func::{any, any_err, null, null_err, Func};
pub use self::payload::{bincode, bincode_err, json, json_err, payload, payload_err, Bincode, Json, PayloadCodec};

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::common::{BoxError, Destination, Discard, ScanError, ScanResult};
use crate::cursor::Rows;

/// A column bound to one iterator.
///
/// The cursor writes into `scan_slot`, then `apply` turns the scanned value
/// into a mutation of the target.
pub trait Column<T> {
    /// Destination the cursor writes this column's value into
    fn scan_slot(&mut self) -> &mut dyn Destination;

    /// Apply the last scanned value to `target`
    fn apply(&mut self, target: &mut T) -> ScanResult<()>;
}

/// Prototype for columns. Every iterator asks each scanner for a fresh
/// `Column`, so scanned values never outlive the call that produced them.
pub trait Scanner<T> {
    fn column(&self) -> Box<dyn Column<T> + '_>;
}

impl<T, S: Scanner<T> + ?Sized> Scanner<T> for Box<S> {
    fn column(&self) -> Box<dyn Column<T> + '_> {
        (**self).column()
    }
}

impl<T, S: Scanner<T> + ?Sized> Scanner<T> for Arc<S> {
    fn column(&self) -> Box<dyn Column<T> + '_> {
        (**self).column()
    }
}

impl<T, S: Scanner<T> + ?Sized> Scanner<T> for &S {
    fn column(&self) -> Box<dyn Column<T> + '_> {
        (**self).column()
    }
}

/// Boxed scanner stored in column sets
pub type BoxScanner<T> = Box<dyn Scanner<T> + Send + Sync>;

/// One position of a binding plan
pub enum Binding<'c, T> {
    /// The value is scanned into the column and applied to the target
    Column(Box<dyn Column<T> + 'c>),
    /// The value is read and thrown away
    Discard(Discard),
}

impl<'c, T> Binding<'c, T> {
    pub(crate) fn destination(&mut self) -> &mut dyn Destination {
        match self {
            Binding::Column(column) => column.scan_slot(),
            Binding::Discard(discard) => discard,
        }
    }
}

/// Resolved mapping from result column position to column, computed once
/// per iterator
pub struct BindingPlan<'c, T> {
    bindings: Vec<Binding<'c, T>>,
}

impl<'c, T> Default for BindingPlan<'c, T> {
    fn default() -> Self {
        BindingPlan { bindings: Vec::new() }
    }
}

impl<'c, T> BindingPlan<'c, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BindingPlan { bindings: Vec::with_capacity(capacity) }
    }

    /// Bind the next position to `column`
    pub fn bind(&mut self, column: Box<dyn Column<T> + 'c>) {
        self.bindings.push(Binding::Column(column));
    }

    /// Bind the next position to the discard sink
    pub fn discard(&mut self) {
        self.bindings.push(Binding::Discard(Discard));
    }

    /// Number of positions in the plan
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of positions bound to a column
    pub fn bound(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| matches!(b, Binding::Column(_)))
            .count()
    }

    pub(crate) fn bindings_mut(&mut self) -> &mut [Binding<'c, T>] {
        &mut self.bindings
    }
}

/// A declared set of columns that can be bound to a live cursor
pub trait ColumnSet<T> {
    /// Resolve the binding plan for the cursor's current result set
    fn bind<R: Rows + ?Sized>(&self, rows: &R) -> ScanResult<BindingPlan<'_, T>>;
}

fn bind_positional<'c, T, S>(scanners: &'c [S]) -> BindingPlan<'c, T>
where
    S: Scanner<T>,
{
    let mut plan = BindingPlan::with_capacity(scanners.len());
    for scanner in scanners {
        plan.bind(scanner.column());
    }
    plan
}

impl<T, S: Scanner<T>> ColumnSet<T> for [S] {
    fn bind<R: Rows + ?Sized>(&self, _rows: &R) -> ScanResult<BindingPlan<'_, T>> {
        Ok(bind_positional(self))
    }
}

impl<T, S: Scanner<T>> ColumnSet<T> for Vec<S> {
    fn bind<R: Rows + ?Sized>(&self, _rows: &R) -> ScanResult<BindingPlan<'_, T>> {
        Ok(bind_positional(self))
    }
}

impl<T, S: Scanner<T>, const N: usize> ColumnSet<T> for [S; N] {
    fn bind<R: Rows + ?Sized>(&self, _rows: &R) -> ScanResult<BindingPlan<'_, T>> {
        Ok(bind_positional(self))
    }
}

/// Ordered column set. The i-th column binds to the i-th result column.
pub struct ColumnList<T> {
    scanners: Vec<BoxScanner<T>>,
}

impl<T> Default for ColumnList<T> {
    fn default() -> Self {
        ColumnList { scanners: Vec::new() }
    }
}

impl<T> ColumnList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style
    pub fn column<S>(mut self, scanner: S) -> Self
    where
        S: Scanner<T> + Send + Sync + 'static,
    {
        self.push(scanner);
        self
    }

    pub fn push<S>(&mut self, scanner: S)
    where
        S: Scanner<T> + Send + Sync + 'static,
    {
        self.scanners.push(Box::new(scanner));
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

impl<T> ColumnSet<T> for ColumnList<T> {
    fn bind<R: Rows + ?Sized>(&self, _rows: &R) -> ScanResult<BindingPlan<'_, T>> {
        Ok(bind_positional(&self.scanners))
    }
}

/// Column set keyed by result column name.
///
/// Names are matched exactly. Result columns with no entry are discarded and
/// entries with no result column are never invoked.
pub struct Columns<T> {
    scanners: HashMap<String, BoxScanner<T>>,
}

impl<T> Default for Columns<T> {
    fn default() -> Self {
        Columns { scanners: HashMap::new() }
    }
}

impl<T> Columns<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to a column, builder style
    pub fn column<S>(mut self, name: impl Into<String>, scanner: S) -> Self
    where
        S: Scanner<T> + Send + Sync + 'static,
    {
        self.insert(name, scanner);
        self
    }

    /// Map `name` to a column, replacing any previous entry
    pub fn insert<S>(&mut self, name: impl Into<String>, scanner: S)
    where
        S: Scanner<T> + Send + Sync + 'static,
    {
        self.scanners.insert(name.into(), Box::new(scanner));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scanners.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

impl<T> ColumnSet<T> for Columns<T> {
    fn bind<R: Rows + ?Sized>(&self, rows: &R) -> ScanResult<BindingPlan<'_, T>> {
        let names = rows.columns().map_err(ScanError::Source)?;

        let mut plan = BindingPlan::with_capacity(names.len());
        for name in &names {
            match self.scanners.get(name) {
                Some(scanner) => plan.bind(scanner.column()),
                None => plan.discard(),
            }
        }

        debug!(
            "bound {} of {} result columns by name ({} mapped)",
            plan.bound(),
            names.len(),
            self.scanners.len()
        );
        Ok(plan)
    }
}

/// Wrap a setter error as a mutation failure
pub(crate) fn mutation_error<E: Into<BoxError>>(err: E) -> ScanError {
    ScanError::Mutation(err.into())
}
