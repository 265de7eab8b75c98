// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use strbuf::{ByteBuffer, Delimiter, HEADERS_TERMINATOR, View};

use crate::{Error, ReadOutcome, Receive, Result, receive};

/// Default number of bytes requested from the socket per receive call.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Default maximum size of a header, in bytes.
pub const DEFAULT_HEADER_LIMIT: usize = 8192;

/// Where a [`HeaderAccumulator`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccumulatorState {
    /// The terminator has not been seen at the tail of the buffer yet; more bytes are needed.
    Accumulating,

    /// The buffer ends with the terminator and holds the complete header.
    Ready,
}

/// Receives bytes from a socket until they end with a header terminator.
///
/// Bytes are appended to an owned [`ByteBuffer`] one receive call at a time. After each call,
/// only the tail of the buffer is compared with the terminator; the buffer is never searched. A
/// header therefore completes exactly when a receive call leaves the buffer ending in the
/// terminator, and bytes that arrive after the terminator within the same call keep the
/// accumulator waiting.
///
/// Failures are terminal but leave the buffered bytes available through
/// [`buffered()`][Self::buffered]:
///
/// * the peer closing the connection first is [`Error::ConnectionClosed`];
/// * the buffer outgrowing the configured limit is [`Error::HeaderTooLarge`];
/// * socket and allocation failures are forwarded as they are.
///
/// # Example
///
/// ```
/// use strbuf::{FIELD_DELIMITER, LINE_DELIMITER};
/// use strbuf_io::HeaderAccumulator;
/// use strbuf_io::testing::FakeSource;
///
/// let mut socket = FakeSource::builder()
///     .chunk(b"GET /index.html HTTP/1.1\r\n")
///     .chunk(b"Host: localhost\r\n\r\n")
///     .build();
///
/// let mut accumulator = HeaderAccumulator::new();
/// let header = accumulator.accumulate(&mut socket)?;
///
/// let mut request_line = header.cursor().next_token(LINE_DELIMITER).cursor();
/// assert_eq!(request_line.next_token(FIELD_DELIMITER), b"GET");
/// assert_eq!(request_line.next_token(FIELD_DELIMITER), b"/index.html");
/// # Ok::<(), strbuf_io::Error>(())
/// ```
#[derive(Debug)]
pub struct HeaderAccumulator {
    buffer: ByteBuffer,
    chunk_size: usize,
    limit: usize,
    terminator: Delimiter<'static>,
    state: AccumulatorState,
}

impl HeaderAccumulator {
    /// Starts building a new `HeaderAccumulator`.
    #[must_use]
    pub fn builder() -> HeaderAccumulatorBuilder {
        HeaderAccumulatorBuilder {
            chunk_size: DEFAULT_CHUNK_SIZE,
            limit: DEFAULT_HEADER_LIMIT,
            terminator: HEADERS_TERMINATOR,
            buffer: None,
        }
    }

    /// Creates a `HeaderAccumulator` with the default chunk size, limit and terminator.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Whether the complete header has been received.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == AccumulatorState::Ready
    }

    /// The complete header, including its terminator, once the accumulator is ready.
    #[must_use]
    pub fn header(&self) -> Option<View<'_>> {
        self.is_ready().then(|| self.buffer.view())
    }

    /// All bytes received so far, whether or not the header is complete.
    #[must_use]
    pub fn buffered(&self) -> View<'_> {
        self.buffer.view()
    }

    /// Consumes the accumulator and returns the buffer holding the bytes received so far.
    #[must_use]
    pub fn into_buffer(self) -> ByteBuffer {
        self.buffer
    }

    /// Performs a single receive call and re-evaluates the state.
    ///
    /// Does nothing if the accumulator is already [`Ready`][AccumulatorState::Ready].
    ///
    /// # Errors
    ///
    /// * [`Error::ConnectionClosed`] if the peer closed the connection.
    /// * [`Error::HeaderTooLarge`] if more bytes than the limit are buffered.
    /// * Any error of [`receive()`][crate::receive()].
    pub fn step<S>(&mut self, source: &mut S) -> Result<AccumulatorState>
    where
        S: Receive + ?Sized,
    {
        if self.is_ready() {
            return Ok(self.state);
        }

        if receive(&mut self.buffer, source, self.chunk_size)? == ReadOutcome::EndOfStream {
            tracing::debug!(buffered = self.buffer.len(), "peer closed the connection mid-header");
            return Err(Error::ConnectionClosed {
                buffered: self.buffer.len(),
            });
        }

        if self.buffer.len() > self.limit {
            tracing::debug!(buffered = self.buffer.len(), limit = self.limit, "header too large");
            return Err(Error::HeaderTooLarge { limit: self.limit });
        }

        if self.buffer.ends_with(self.terminator) {
            self.state = AccumulatorState::Ready;
            tracing::debug!(bytes = self.buffer.len(), state = ?self.state, "header complete");
        }

        Ok(self.state)
    }

    /// Receives from `source` until the header is complete and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`step()`][Self::step]. Bytes received before the failure remain available through
    /// [`buffered()`][Self::buffered].
    pub fn accumulate<S>(&mut self, source: &mut S) -> Result<View<'_>>
    where
        S: Receive + ?Sized,
    {
        while self.step(source)? == AccumulatorState::Accumulating {}

        Ok(self.buffer.view())
    }
}

impl Default for HeaderAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates an instance of [`HeaderAccumulator`].
///
/// Access through [`HeaderAccumulator::builder()`][HeaderAccumulator::builder].
#[derive(Debug)]
pub struct HeaderAccumulatorBuilder {
    chunk_size: usize,
    limit: usize,
    terminator: Delimiter<'static>,
    buffer: Option<ByteBuffer>,
}

impl HeaderAccumulatorBuilder {
    /// Number of bytes requested per receive call. One byte of it is held back, so at most
    /// `chunk_size - 1` bytes arrive per call.
    ///
    /// Optional. Defaults to [`DEFAULT_CHUNK_SIZE`].
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Maximum number of bytes a header may span.
    ///
    /// Optional. Defaults to [`DEFAULT_HEADER_LIMIT`].
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// The byte sequence that ends a header.
    ///
    /// Optional. Defaults to [`HEADERS_TERMINATOR`].
    #[must_use]
    pub const fn terminator(mut self, terminator: Delimiter<'static>) -> Self {
        self.terminator = terminator;
        self
    }

    /// The buffer to accumulate into, typically created with a capacity suited to the expected
    /// header size. Any data already in it is discarded.
    ///
    /// Optional. Defaults to an empty buffer that grows on the first receive call.
    #[must_use]
    pub fn buffer(mut self, mut buffer: ByteBuffer) -> Self {
        buffer.clear();
        self.buffer = Some(buffer);
        self
    }

    /// Builds the `HeaderAccumulator` with the provided configuration.
    #[must_use]
    pub fn build(self) -> HeaderAccumulator {
        HeaderAccumulator {
            buffer: self.buffer.unwrap_or_default(),
            chunk_size: self.chunk_size,
            limit: self.limit,
            terminator: self.terminator,
            state: AccumulatorState::Accumulating,
        }
    }
}
