// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, ErrorKind};

use strbuf::{ByteBuffer, View};

use crate::{Error, ReadOutcome, Receive, Result};

/// Receives up to `max_len - 1` bytes from a socket and appends them to `buffer`.
///
/// The buffer grows only by what actually arrived, following the same policy as
/// [`ByteBuffer::append()`]; a receive that ends the stream leaves it untouched. One byte of
/// `max_len` is held back, so `max_len` must be at least 2. A single call transfers at most
/// 4096 bytes when they do not fit the spare storage.
///
/// Blocks until data, the end of the stream or an error is available. A receive interrupted by a
/// signal before any data arrived is retried.
///
/// # Errors
///
/// * [`Error::AllocationFailure`] if the buffer cannot grow.
/// * [`Error::Io`] if the socket reports an error.
/// * [`Error::ReadSizeTooSmall`] if `max_len < 2`.
///
/// In all cases the data already in `buffer` is left as it was. An orderly shutdown by the peer is
/// not an error but [`ReadOutcome::EndOfStream`].
///
/// # Example
///
/// ```
/// use strbuf::ByteBuffer;
/// use strbuf_io::testing::FakeSource;
/// use strbuf_io::{ReadOutcome, receive};
///
/// let mut socket = FakeSource::new(b"GET / HTTP/1.1\r\n\r\n");
/// let mut buffer = ByteBuffer::create(256)?;
///
/// while let ReadOutcome::Data(count) = receive(&mut buffer, &mut socket, 256)? {
///     println!("received {count} bytes");
/// }
///
/// assert_eq!(buffer, b"GET / HTTP/1.1\r\n\r\n");
/// # Ok::<(), strbuf_io::Error>(())
/// ```
pub fn receive<S>(buffer: &mut ByteBuffer, source: &mut S, max_len: usize) -> Result<ReadOutcome>
where
    S: Receive + ?Sized,
{
    let outcome = fill(buffer, max_len, |into| source.receive(into))?;

    tracing::trace!(received = outcome.len(), buffered = buffer.len(), "received from socket");

    Ok(outcome)
}

/// Reads up to `max_len - 1` bytes from a local descriptor (file, pipe, ...) and appends them to
/// `buffer`.
///
/// Same contract as [`receive()`], for any [`std::io::Read`] source.
///
/// # Errors
///
/// * [`Error::AllocationFailure`] if the buffer cannot grow.
/// * [`Error::Io`] if the descriptor reports an error.
/// * [`Error::ReadSizeTooSmall`] if `max_len < 2`.
pub fn read<R>(buffer: &mut ByteBuffer, source: &mut R, max_len: usize) -> Result<ReadOutcome>
where
    R: io::Read + ?Sized,
{
    let outcome = fill(buffer, max_len, |into| source.read(into))?;

    tracing::trace!(read = outcome.len(), buffered = buffer.len(), "read from descriptor");

    Ok(outcome)
}

/// Writes every byte of `data` to `sink`, then flushes it.
///
/// Short writes are continued from where they stopped and writes interrupted by a signal are
/// retried, so either all bytes are delivered or an error is returned. Returns the number of bytes
/// written, which is always `data.len()`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the sink reports an error other than an interruption, or if it stops
/// accepting bytes altogether (an error of kind [`WriteZero`][ErrorKind::WriteZero]).
///
/// # Example
///
/// ```
/// use strbuf::View;
/// use strbuf_io::testing::FakeSink;
/// use strbuf_io::write_all;
///
/// // A sink that accepts at most 3 bytes per call.
/// let mut sink = FakeSink::builder().max_write_size(3).build();
///
/// let written = write_all(View::from_static(b"HTTP/1.1 200 OK\r\n"), &mut sink)?;
///
/// assert_eq!(written, 17);
/// assert_eq!(sink.contents(), b"HTTP/1.1 200 OK\r\n");
/// # Ok::<(), strbuf_io::Error>(())
/// ```
pub fn write_all<W>(data: View<'_>, sink: &mut W) -> Result<usize>
where
    W: io::Write + ?Sized,
{
    let mut pending = data.cursor();

    while !pending.is_exhausted() {
        match sink.write(pending.view().as_bytes()) {
            Ok(0) => {
                tracing::debug!(
                    written = data.len() - pending.remaining(),
                    pending = pending.remaining(),
                    "sink stopped accepting bytes"
                );
                return Err(io::Error::from(ErrorKind::WriteZero).into());
            }
            Ok(count) => {
                pending.advance(count);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::debug!(
                    written = data.len() - pending.remaining(),
                    pending = pending.remaining(),
                    error = %e,
                    "write failed"
                );
                return Err(e.into());
            }
        }
    }

    loop {
        match sink.flush() {
            Ok(()) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    tracing::trace!(written = data.len(), "wrote all bytes");

    Ok(data.len())
}

/// Upper bound of a single transfer that does not fit the buffer's spare storage.
const SCRATCH_LEN: usize = 4096;

/// Shared logic of [`receive()`] and [`read()`].
///
/// When the spare storage holds a full `max_len - 1` bytes, the transfer lands there directly and
/// is committed. Otherwise it lands in a scratch region and only the bytes that arrived are
/// appended, so the buffer grows exactly as [`ByteBuffer::append()`] would grow it.
fn fill<F>(buffer: &mut ByteBuffer, max_len: usize, mut transfer: F) -> Result<ReadOutcome>
where
    F: FnMut(&mut [u8]) -> io::Result<usize>,
{
    let read_len = match max_len.checked_sub(1) {
        Some(read_len) if read_len > 0 => read_len,
        _ => return Err(Error::ReadSizeTooSmall { max_len }),
    };

    if buffer.remaining_capacity() >= read_len {
        let count = transfer_retrying(&mut buffer.unfilled_mut()[..read_len], &mut transfer)?;
        buffer.commit(count);

        return Ok(ReadOutcome::from_count(count));
    }

    let mut scratch = [0_u8; SCRATCH_LEN];
    let scratch = &mut scratch[..read_len.min(SCRATCH_LEN)];

    let count = transfer_retrying(scratch, &mut transfer)?;
    buffer.append(&scratch[..count])?;

    Ok(ReadOutcome::from_count(count))
}

/// Runs `transfer` until it is not interrupted and checks the count it reports.
fn transfer_retrying<F>(into: &mut [u8], transfer: &mut F) -> Result<usize>
where
    F: FnMut(&mut [u8]) -> io::Result<usize>,
{
    let count = loop {
        match transfer(&mut *into) {
            Ok(count) => break count,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    };

    if count > into.len() {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("descriptor claimed to transfer {count} bytes into a {} byte region", into.len()),
        )
        .into());
    }

    Ok(count)
}

/// Descriptor I/O as methods on [`ByteBuffer`].
///
/// Forwards to [`receive()`], [`read()`] and [`write_all()`].
///
/// # Example
///
/// ```
/// use strbuf::ByteBuffer;
/// use strbuf_io::BufferIoExt;
/// use strbuf_io::testing::{FakeSink, FakeSource};
///
/// let mut file = FakeSource::new(b"<h1>hello</h1>");
/// let mut socket = FakeSink::new();
///
/// let mut chunk = ByteBuffer::create(256)?;
/// while !chunk.read_from(&mut file, 256)?.is_end_of_stream() {
///     chunk.write_all_to(&mut socket)?;
///     chunk.clear();
/// }
///
/// assert_eq!(socket.contents(), b"<h1>hello</h1>");
/// # Ok::<(), strbuf_io::Error>(())
/// ```
pub trait BufferIoExt {
    /// Receives up to `max_len - 1` bytes from a socket. See [`receive()`].
    ///
    /// # Errors
    ///
    /// See [`receive()`].
    fn receive_from<S: Receive + ?Sized>(&mut self, source: &mut S, max_len: usize) -> Result<ReadOutcome>;

    /// Reads up to `max_len - 1` bytes from a local descriptor. See [`read()`].
    ///
    /// # Errors
    ///
    /// See [`read()`].
    fn read_from<R: io::Read + ?Sized>(&mut self, source: &mut R, max_len: usize) -> Result<ReadOutcome>;

    /// Writes the entire contents to `sink`. See [`write_all()`].
    ///
    /// # Errors
    ///
    /// See [`write_all()`].
    fn write_all_to<W: io::Write + ?Sized>(&self, sink: &mut W) -> Result<usize>;
}

impl BufferIoExt for ByteBuffer {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn receive_from<S: Receive + ?Sized>(&mut self, source: &mut S, max_len: usize) -> Result<ReadOutcome> {
        receive(self, source, max_len)
    }

    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn read_from<R: io::Read + ?Sized>(&mut self, source: &mut R, max_len: usize) -> Result<ReadOutcome> {
        read(self, source, max_len)
    }

    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn write_all_to<W: io::Write + ?Sized>(&self, sink: &mut W) -> Result<usize> {
        write_all(self.view(), sink)
    }
}
