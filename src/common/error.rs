// Scan Errors
//
// This module defines the error taxonomy surfaced by the row scanning engine
// and the join operation that combines several causes into one error.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error produced by cursors, setters and payload codecs
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Represents a row scanning error
#[derive(Error, Debug)]
pub enum ScanError {
    /// The cursor could not report its result columns
    #[error("failed to read result columns: {0}")]
    Source(#[source] BoxError),
    /// The cursor failed to write the current row into the destinations
    #[error("failed to scan row: {0}")]
    Scan(#[source] BoxError),
    /// A column setter rejected its value
    #[error("failed to apply column: {0}")]
    Mutation(#[source] BoxError),
    /// A payload column could not decode its bytes
    #[error("failed to decode {codec} payload: {source}")]
    Decode {
        codec: &'static str,
        #[source]
        source: BoxError,
    },
    /// The cursor reported an error while iterating
    #[error("row iteration failed: {0}")]
    Iteration(#[source] BoxError),
    /// Closing the cursor failed
    #[error("failed to close rows: {0}")]
    Close(#[source] BoxError),
    /// The visit callback of a streaming scan returned an error
    #[error("visit failed: {0}")]
    Visit(#[source] BoxError),
    /// A single row was requested but the result set is empty
    #[error("no rows in result set")]
    NoRows,
    /// The result set holds more rows than the caller accepts
    #[error("too many rows in result set")]
    TooManyRows,
    /// Several errors occurred during one call
    #[error("{}", join_messages(.0))]
    Joined(Vec<ScanError>),
}

/// Discriminant of a `ScanError`, used for cause-identity checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    Source,
    Scan,
    Mutation,
    Decode,
    Iteration,
    Close,
    Visit,
    NoRows,
    TooManyRows,
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

fn join_messages(errors: &[ScanError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ScanError {
    /// Combine errors into one, dropping the absent ones.
    ///
    /// Returns `None` when no error is present and the error itself when
    /// exactly one is. Nested joins are flattened.
    pub fn join<I>(errors: I) -> Option<ScanError>
    where
        I: IntoIterator<Item = Option<ScanError>>,
    {
        let mut causes = Vec::new();
        for err in errors.into_iter().flatten() {
            match err {
                ScanError::Joined(inner) => causes.extend(inner),
                other => causes.push(other),
            }
        }

        match causes.len() {
            0 => None,
            1 => causes.pop(),
            _ => Some(ScanError::Joined(causes)),
        }
    }

    /// Join further causes onto `self`, which stays first
    pub fn join_with<I>(self, others: I) -> ScanError
    where
        I: IntoIterator<Item = Option<ScanError>>,
    {
        match Self::join(std::iter::once(Some(self)).chain(others)) {
            Some(err) => err,
            // The chain always holds `self`
            None => ScanError::Joined(Vec::new()),
        }
    }

    /// Turn the join of `errors` into a result
    pub fn join_result<I>(errors: I) -> ScanResult<()>
    where
        I: IntoIterator<Item = Option<ScanError>>,
    {
        match Self::join(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every non-joined cause held by this error, in join order
    pub fn causes(&self) -> Box<dyn Iterator<Item = &ScanError> + '_> {
        match self {
            ScanError::Joined(inner) => Box::new(inner.iter().flat_map(|e| e.causes())),
            other => Box::new(std::iter::once(other)),
        }
    }

    /// Kind of this error, `None` for a join
    pub fn kind(&self) -> Option<ScanErrorKind> {
        let kind = match self {
            ScanError::Source(_) => ScanErrorKind::Source,
            ScanError::Scan(_) => ScanErrorKind::Scan,
            ScanError::Mutation(_) => ScanErrorKind::Mutation,
            ScanError::Decode { .. } => ScanErrorKind::Decode,
            ScanError::Iteration(_) => ScanErrorKind::Iteration,
            ScanError::Close(_) => ScanErrorKind::Close,
            ScanError::Visit(_) => ScanErrorKind::Visit,
            ScanError::NoRows => ScanErrorKind::NoRows,
            ScanError::TooManyRows => ScanErrorKind::TooManyRows,
            ScanError::Joined(_) => return None,
        };
        Some(kind)
    }

    /// Whether any cause is of the given kind
    pub fn has_kind(&self, kind: ScanErrorKind) -> bool {
        self.causes().any(|e| e.kind() == Some(kind))
    }

    pub fn is_no_rows(&self) -> bool {
        self.has_kind(ScanErrorKind::NoRows)
    }

    pub fn is_too_many_rows(&self) -> bool {
        self.has_kind(ScanErrorKind::TooManyRows)
    }

    /// Find the first error of type `E` among the causes and their source chains
    pub fn find<E: StdError + 'static>(&self) -> Option<&E> {
        for cause in self.causes() {
            let mut current: Option<&(dyn StdError + 'static)> = Some(cause as &(dyn StdError + 'static));
            while let Some(err) = current {
                if let Some(found) = err.downcast_ref::<E>() {
                    return Some(found);
                }
                current = err.source();
            }
        }
        None
    }
}
