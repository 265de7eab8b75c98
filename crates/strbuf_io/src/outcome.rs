// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::num::NonZero;

/// The result of a single successful read from a descriptor.
///
/// A read that transfers zero bytes means the other side will never send anything again. This is
/// a normal terminal condition and is reported as [`EndOfStream`][Self::EndOfStream], distinct
/// from both a successful transfer and from an I/O error (which is an `Err`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadOutcome {
    /// This many bytes were appended to the buffer.
    Data(NonZero<usize>),

    /// The descriptor reached an orderly end of stream (e.g. the peer closed the connection).
    /// Nothing was appended.
    EndOfStream,
}

impl ReadOutcome {
    pub(crate) fn from_count(count: usize) -> Self {
        NonZero::new(count).map_or(Self::EndOfStream, Self::Data)
    }

    /// Number of bytes appended; zero at end of stream.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Data(count) => count.get(),
            Self::EndOfStream => 0,
        }
    }

    /// Whether the descriptor reached the end of the stream.
    #[must_use]
    pub const fn is_end_of_stream(self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}
