// Scan Executor Module
//
// This module drives cursors through column sets. It implements the
// iterator-based scanning model and the collecting algorithms built on it.

pub mod collect;
pub mod config;
pub mod context;
pub mod iterator;

// Export key types
pub use self::collect::{all, each, first, iter, limit, one};
pub use self::config::ScanConfig;
pub use self::context::{CancelHandle, Context, ContextError};
pub use self::iterator::RowIterator;
