// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::TryReserveError;

use thiserror::Error;

/// An error signaled by the buffer and tokenizer types in this crate.
///
/// Every operation that returns this error leaves the buffer it was called on in its prior state.
/// No previously accumulated bytes are lost or truncated.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Storage for the requested capacity could not be obtained.
    ///
    /// This covers both heap exhaustion and capacities that cannot be represented at all
    /// (e.g. the growth policy overflowing `usize`). In the latter case there is no
    /// underlying allocator error to report.
    #[error("failed to allocate buffer storage for {requested} bytes")]
    AllocationFailure {
        /// The capacity, in bytes, that was requested.
        requested: usize,

        /// The allocator error, if the request reached the allocator.
        #[source]
        source: Option<TryReserveError>,
    },

    /// A delimiter must contain at least one byte, otherwise scanning would never advance.
    #[error("delimiter must not be empty")]
    EmptyDelimiter,
}

impl Error {
    /// Whether this error reports a failure to obtain buffer storage.
    #[must_use]
    pub const fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::AllocationFailure { .. })
    }

    pub(crate) const fn capacity_overflow() -> Self {
        Self::AllocationFailure {
            requested: usize::MAX,
            source: None,
        }
    }
}

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync);

    #[test]
    fn allocation_failure_carries_allocator_source() {
        let source = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();

        let error = Error::AllocationFailure {
            requested: usize::MAX,
            source: Some(source),
        };

        assert!(error.is_allocation_failure());
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains(&usize::MAX.to_string()));
    }

    #[test]
    fn capacity_overflow_has_no_source() {
        let error = Error::capacity_overflow();

        assert!(error.is_allocation_failure());
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn empty_delimiter_is_not_allocation_failure() {
        let error = Error::EmptyDelimiter;

        assert!(!error.is_allocation_failure());
        assert_eq!(error.to_string(), "delimiter must not be empty");
    }
}
