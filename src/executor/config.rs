// Scan Configuration
//
// Tuning knobs for the collecting algorithms. None of them change results.

/// Configuration for row collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Rows reserved up front by `all`
    pub initial_capacity: usize,

    /// Upper bound on rows reserved up front by `limit(n)`; larger limits
    /// grow the result as rows arrive
    pub max_preallocation: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_preallocation: 1024,
        }
    }
}

impl ScanConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_max_preallocation(mut self, rows: usize) -> Self {
        self.max_preallocation = rows;
        self
    }

    /// Capacity to reserve for a collection bounded by `limit` rows
    pub(crate) fn limit_capacity(&self, limit: usize) -> usize {
        limit.min(self.max_preallocation)
    }
}
