// Rowscan Result Set Mapping
//
// Maps the rows of a database result cursor onto values through declarative
// column sets. A column set is bound once per cursor, then every row is
// scanned into the bound destinations and applied to a fresh target value.

pub mod column;
pub mod common;
pub mod cursor;
pub mod executor;

// Re-export key items for convenient access
pub use column::{any, any_err, bincode, json, json_err, null, null_err, Column, ColumnList, ColumnSet, Columns, Func, Scanner};
pub use common::{BoxError, DataValue, Destination, FromValue, ScanError, ScanErrorKind, ScanResult};
pub use cursor::{ResultSet, Rows};
pub use executor::{all, each, first, iter, limit, one, CancelHandle, Context, ContextError, RowIterator, ScanConfig};
