// Common Types
//
// Value model and error taxonomy shared by cursors, columns and the executor.

pub mod error;
pub mod value;

pub use self::error::{BoxError, ScanError, ScanErrorKind, ScanResult};
pub use self::value::{ConversionError, ConversionResult, DataValue, Destination, Discard, FromValue, Slot};
