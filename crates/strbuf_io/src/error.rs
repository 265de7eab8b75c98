// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// An error signaled while moving bytes between a buffer and a descriptor.
///
/// The variants keep three conditions apart that must never be confused with one another:
///
/// * [`AllocationFailure`][Self::AllocationFailure] - the buffer could not grow.
/// * [`Io`][Self::Io] - the descriptor itself reported an error.
/// * [`ConnectionClosed`][Self::ConnectionClosed] - the peer closed the connection in an orderly
///   manner before the expected data arrived.
///
/// An orderly end of stream on a single read is not an error at all; it is reported as
/// [`ReadOutcome::EndOfStream`][crate::ReadOutcome::EndOfStream].
///
/// In every case, bytes that were already in the buffer remain untouched.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The buffer needed more storage and it could not be obtained.
    #[error("buffer storage could not be obtained")]
    AllocationFailure(#[source] strbuf::Error),

    /// The descriptor reported an error that retrying cannot resolve.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before the header terminator arrived.
    #[error("connection closed by peer with {buffered} bytes of incomplete header buffered")]
    ConnectionClosed {
        /// Number of bytes received before the peer closed the connection.
        buffered: usize,
    },

    /// More bytes arrived than a header may span without the terminator appearing.
    #[error("header exceeds the limit of {limit} bytes")]
    HeaderTooLarge {
        /// The configured limit, in bytes.
        limit: usize,
    },

    /// A read must request at least 2 bytes, as one byte of the requested size is held back.
    #[error("read size must be at least 2 bytes but was {max_len}")]
    ReadSizeTooSmall {
        /// The read size that was requested.
        max_len: usize,
    },
}

impl Error {
    /// Whether the peer closed the connection in an orderly manner.
    #[must_use]
    pub const fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed { .. })
    }
}

impl From<strbuf::Error> for Error {
    fn from(value: strbuf::Error) -> Self {
        Self::AllocationFailure(value)
    }
}

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents the error as a standard I/O error, for callers that speak `std::io`.
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(error) => error,
            Error::ConnectionClosed { .. } => Self::new(std::io::ErrorKind::UnexpectedEof, value),
            Error::AllocationFailure(_) => Self::new(std::io::ErrorKind::OutOfMemory, value),
            _ => Self::other(value),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync);

    #[test]
    fn into_stdio_error_keeps_io_errors() {
        let error = Error::Io(std::io::Error::new(ErrorKind::ConnectionReset, "reset by peer"));

        let io_error: std::io::Error = error.into();

        assert_eq!(io_error.kind(), ErrorKind::ConnectionReset);
        assert_eq!(io_error.to_string(), "reset by peer");
    }

    #[test]
    fn into_stdio_error_maps_closure_to_eof() {
        let io_error: std::io::Error = Error::ConnectionClosed { buffered: 12 }.into();

        assert_eq!(io_error.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn into_stdio_error_maps_allocation_failure() {
        let source = strbuf::ByteBuffer::create(usize::MAX).unwrap_err();

        let io_error: std::io::Error = Error::from(source).into();

        assert_eq!(io_error.kind(), ErrorKind::OutOfMemory);
    }

    #[test]
    fn into_stdio_error_other_variants() {
        let io_error: std::io::Error = Error::HeaderTooLarge { limit: 8192 }.into();

        assert_eq!(io_error.kind(), ErrorKind::Other);
        assert!(io_error.to_string().contains("8192"));
    }

    #[test]
    fn closure_is_distinct_from_io_failure() {
        assert!(Error::ConnectionClosed { buffered: 0 }.is_connection_closed());
        assert!(!Error::Io(std::io::Error::from(ErrorKind::ConnectionReset)).is_connection_closed());
    }
}
