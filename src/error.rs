//! Error types for the freqlist library.
//!
//! ## Key Components
//!
//! - [`FeatureNotEnabled`]: Returned when an overall-recency operation is
//!   called on a list that was built without a clock.
//! - [`InvariantError`]: Returned by
//!   [`FrequencyList::check_invariants`](crate::FrequencyList::check_invariants)
//!   when the internal link structure is inconsistent.
//!
//! ## Example Usage
//!
//! ```
//! use freqlist::FrequencyList;
//! use freqlist::error::FeatureNotEnabled;
//!
//! let mut list = FrequencyList::new();
//! list.update("a");
//!
//! // Recency operations need a clock chosen at construction time
//! let err: FeatureNotEnabled = list.remove_overall_least_recent(1).unwrap_err();
//! assert_eq!(err.operation(), "remove_overall_least_recent");
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// FeatureNotEnabled
// ---------------------------------------------------------------------------

/// Error returned when overall recency tracking was not enabled.
///
/// This is a usage error: the only way to avoid it is to construct the list
/// with [`FrequencyList::with_clock`](crate::FrequencyList::with_clock) (or a
/// builder with a clock). Carries the name of the refused operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureNotEnabled {
    operation: &'static str,
}

impl FeatureNotEnabled {
    /// Creates a new `FeatureNotEnabled` for `operation`.
    #[inline]
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    /// Returns the name of the operation that was refused.
    #[inline]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl fmt::Display for FeatureNotEnabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` requires overall recency tracking; construct the list with a clock",
            self.operation
        )
    }
}

impl std::error::Error for FeatureNotEnabled {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal list invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- FeatureNotEnabled ------------------------------------------------

    #[test]
    fn feature_display_names_operation() {
        let err = FeatureNotEnabled::new("overall_least_to_most_recent");
        let text = err.to_string();
        assert!(text.contains("overall_least_to_most_recent"));
        assert!(text.contains("clock"));
    }

    #[test]
    fn feature_operation_accessor() {
        let err = FeatureNotEnabled::new("remove_overall_most_recent");
        assert_eq!(err.operation(), "remove_overall_most_recent");
    }

    #[test]
    fn feature_copy_and_eq() {
        let a = FeatureNotEnabled::new("x");
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, FeatureNotEnabled::new("y"));
    }

    #[test]
    fn feature_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<FeatureNotEnabled>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("bucket chain out of order");
        assert_eq!(err.to_string(), "bucket chain out of order");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("bad link");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad link"));
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
