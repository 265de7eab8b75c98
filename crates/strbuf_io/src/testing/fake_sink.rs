// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, ErrorKind};

/// An [`io::Write`] that collects all written data into itself.
///
/// The sink can be configured to behave like a congested socket: accepting only a few bytes per
/// call, being interrupted by signals, filling up or failing outright.
///
/// This is for test and example purposes only.
#[derive(Debug)]
pub struct FakeSink {
    contents: Vec<u8>,
    max_write_size: Option<usize>,
    interrupt_every: Option<usize>,
    capacity: Option<usize>,
    fail_with: Option<ErrorKind>,
    write_calls: usize,
    flushed: bool,
}

impl FakeSink {
    /// Starts building a new `FakeSink`.
    #[must_use]
    pub fn builder() -> FakeSinkBuilder {
        FakeSinkBuilder {
            max_write_size: None,
            interrupt_every: None,
            capacity: None,
            fail_with: None,
        }
    }

    /// Creates a new `FakeSink` that accepts everything written to it.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// References the contents written into the sink so far.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Consumes the instance and returns the contents that were written to it.
    #[must_use]
    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }

    /// Number of write calls made so far, including those that were interrupted or failed.
    #[must_use]
    pub const fn write_calls(&self) -> usize {
        self.write_calls
    }

    /// Whether the sink was flushed after the last byte was written to it.
    #[must_use]
    pub const fn is_flushed(&self) -> bool {
        self.flushed
    }
}

impl Default for FakeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for FakeSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_calls = self.write_calls.saturating_add(1);

        if let Some(kind) = self.fail_with {
            return Err(kind.into());
        }

        if self.interrupt_every.is_some_and(|every| self.write_calls % every == 0) {
            return Err(ErrorKind::Interrupted.into());
        }

        let available = self
            .capacity
            .map_or(usize::MAX, |capacity| capacity.saturating_sub(self.contents.len()));

        let count = buf
            .len()
            .min(self.max_write_size.unwrap_or(usize::MAX))
            .min(available);

        self.contents.extend_from_slice(&buf[..count]);

        if count > 0 {
            self.flushed = false;
        }

        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(kind) = self.fail_with {
            return Err(kind.into());
        }

        self.flushed = true;
        Ok(())
    }
}

/// Creates an instance of [`FakeSink`].
///
/// Access through [`FakeSink::builder()`][FakeSink::builder].
#[derive(Debug)]
pub struct FakeSinkBuilder {
    max_write_size: Option<usize>,
    interrupt_every: Option<usize>,
    capacity: Option<usize>,
    fail_with: Option<ErrorKind>,
}

impl FakeSinkBuilder {
    /// Restricts a single write to accept at most `max_write_size` bytes.
    ///
    /// Optional. Defaults to no limit.
    #[must_use]
    pub const fn max_write_size(mut self, max_write_size: usize) -> Self {
        self.max_write_size = Some(max_write_size);
        self
    }

    /// Makes every `every`-th write call fail with [`ErrorKind::Interrupted`] without accepting
    /// anything.
    ///
    /// Optional. Defaults to never interrupting.
    #[must_use]
    pub const fn interrupt_every(mut self, every: usize) -> Self {
        self.interrupt_every = Some(every);
        self
    }

    /// Stops accepting bytes (writes return `Ok(0)`) once `capacity` bytes have been written.
    ///
    /// Optional. Defaults to unlimited.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Makes every write and flush fail with an error of the given kind.
    ///
    /// Optional. Defaults to never failing.
    #[must_use]
    pub const fn fail_with(mut self, kind: ErrorKind) -> Self {
        self.fail_with = Some(kind);
        self
    }

    /// Builds the `FakeSink` with the provided configuration.
    ///
    /// # Panics
    ///
    /// Panics if the maximum write size or the interruption period was set to zero.
    #[must_use]
    pub fn build(self) -> FakeSink {
        assert!(self.max_write_size != Some(0), "max_write_size must be non-zero");
        assert!(self.interrupt_every != Some(0), "interrupt_every must be non-zero");

        FakeSink {
            contents: Vec::new(),
            max_write_size: self.max_write_size,
            interrupt_every: self.interrupt_every,
            capacity: self.capacity,
            fail_with: self.fail_with,
            write_calls: 0,
            flushed: false,
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn collects_everything_by_default() {
        let mut sink = FakeSink::new();

        assert_eq!(sink.write(b"hello ").unwrap(), 6);
        assert_eq!(sink.write(b"world").unwrap(), 5);
        assert!(!sink.is_flushed());
        sink.flush().unwrap();
        assert!(sink.is_flushed());

        assert_eq!(sink.into_contents(), b"hello world");
    }

    #[test]
    fn short_writes() {
        let mut sink = FakeSink::builder().max_write_size(2).build();

        assert_eq!(sink.write(b"abc").unwrap(), 2);
        assert_eq!(sink.contents(), b"ab");
    }

    #[test]
    fn interrupts_periodically() {
        let mut sink = FakeSink::builder().interrupt_every(3).build();

        assert!(sink.write(b"a").is_ok());
        assert!(sink.write(b"b").is_ok());
        assert_eq!(sink.write(b"c").unwrap_err().kind(), ErrorKind::Interrupted);
        assert!(sink.write(b"c").is_ok());

        assert_eq!(sink.contents(), b"abc");
        assert_eq!(sink.write_calls(), 4);
    }

    #[test]
    fn fills_up() {
        let mut sink = FakeSink::builder().capacity(3).build();

        assert_eq!(sink.write(b"ab").unwrap(), 2);
        assert_eq!(sink.write(b"cd").unwrap(), 1);
        assert_eq!(sink.write(b"d").unwrap(), 0);
        assert_eq!(sink.contents(), b"abc");
    }

    #[test]
    fn fails() {
        let mut sink = FakeSink::builder().fail_with(ErrorKind::BrokenPipe).build();

        assert_eq!(sink.write(b"a").unwrap_err().kind(), ErrorKind::BrokenPipe);
        assert_eq!(sink.flush().unwrap_err().kind(), ErrorKind::BrokenPipe);
        assert!(sink.contents().is_empty());
    }
}
