// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::VecDeque;
use std::io::{self, ErrorKind};

use crate::Receive;

#[derive(Debug)]
enum Step {
    Chunk(Vec<u8>),
    Interrupt,
    Fail(ErrorKind),
}

/// A socket or file that plays back a script of chunks, interruptions and failures.
///
/// Each [`receive`][Receive::receive] or [`read`][io::Read::read] call performs the next step of
/// the script. A chunk larger than the caller's region is delivered over several calls. Once the
/// script is exhausted, every call reports the end of the stream.
///
/// This is for test and example purposes only.
///
/// # Example
///
/// ```
/// use std::io::ErrorKind;
///
/// use strbuf_io::Receive;
/// use strbuf_io::testing::FakeSource;
///
/// let mut source = FakeSource::builder()
///     .chunk(b"GET")
///     .interrupt()
///     .chunk(b" / HTTP/1.1")
///     .fail(ErrorKind::ConnectionReset)
///     .build();
///
/// let mut scratch = [0_u8; 64];
/// assert_eq!(source.receive(&mut scratch).unwrap(), 3);
/// assert_eq!(source.receive(&mut scratch).unwrap_err().kind(), ErrorKind::Interrupted);
/// assert_eq!(source.receive(&mut scratch).unwrap(), 11);
/// assert_eq!(source.receive(&mut scratch).unwrap_err().kind(), ErrorKind::ConnectionReset);
/// assert_eq!(source.receive(&mut scratch).unwrap(), 0);
/// ```
#[derive(Debug)]
pub struct FakeSource {
    script: VecDeque<Step>,
    max_read_size: Option<usize>,
    calls: usize,
}

impl FakeSource {
    /// Starts building a new `FakeSource`.
    #[must_use]
    pub fn builder() -> FakeSourceBuilder {
        FakeSourceBuilder {
            script: VecDeque::new(),
            max_read_size: None,
        }
    }

    /// Creates a `FakeSource` that delivers `contents` and then reports the end of the stream.
    #[must_use]
    pub fn new(contents: impl AsRef<[u8]>) -> Self {
        Self::builder().chunk(contents).build()
    }

    /// Number of scripted bytes not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script
            .iter()
            .map(|step| match step {
                Step::Chunk(bytes) => bytes.len(),
                Step::Interrupt | Step::Fail(_) => 0,
            })
            .sum()
    }

    /// Number of receive or read calls made so far, including those that failed.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }

    fn next_step(&mut self, into: &mut [u8]) -> io::Result<usize> {
        self.calls = self.calls.saturating_add(1);

        let Some(step) = self.script.pop_front() else {
            return Ok(0);
        };

        match step {
            Step::Interrupt => Err(ErrorKind::Interrupted.into()),
            Step::Fail(kind) => Err(kind.into()),
            Step::Chunk(mut bytes) => {
                let count = bytes
                    .len()
                    .min(into.len())
                    .min(self.max_read_size.unwrap_or(usize::MAX));

                into[..count].copy_from_slice(&bytes[..count]);

                if count < bytes.len() {
                    bytes.drain(..count);
                    self.script.push_front(Step::Chunk(bytes));
                }

                Ok(count)
            }
        }
    }
}

impl Receive for FakeSource {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn receive(&mut self, into: &mut [u8]) -> io::Result<usize> {
        self.next_step(into)
    }
}

impl io::Read for FakeSource {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.next_step(buf)
    }
}

/// Creates an instance of [`FakeSource`].
///
/// Access through [`FakeSource::builder()`][FakeSource::builder].
#[derive(Debug)]
pub struct FakeSourceBuilder {
    script: VecDeque<Step>,
    max_read_size: Option<usize>,
}

impl FakeSourceBuilder {
    /// Appends a chunk of data to the script. Empty chunks are ignored.
    #[must_use]
    pub fn chunk(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();

        if !bytes.is_empty() {
            self.script.push_back(Step::Chunk(bytes.to_vec()));
        }

        self
    }

    /// Appends a call that fails with [`ErrorKind::Interrupted`] to the script.
    #[must_use]
    pub fn interrupt(mut self) -> Self {
        self.script.push_back(Step::Interrupt);
        self
    }

    /// Appends a call that fails with an error of the given kind to the script.
    #[must_use]
    pub fn fail(mut self, kind: ErrorKind) -> Self {
        self.script.push_back(Step::Fail(kind));
        self
    }

    /// Restricts a single call to deliver at most `max_read_size` bytes, forcing the caller to
    /// make several calls per chunk.
    ///
    /// Optional. Defaults to no limit.
    #[must_use]
    pub const fn max_read_size(mut self, max_read_size: usize) -> Self {
        self.max_read_size = Some(max_read_size);
        self
    }

    /// Builds the `FakeSource` with the provided configuration.
    ///
    /// # Panics
    ///
    /// Panics if the maximum read size was set to zero, which would be indistinguishable from the
    /// end of the stream.
    #[must_use]
    pub fn build(self) -> FakeSource {
        assert!(self.max_read_size != Some(0), "max_read_size must be non-zero");

        FakeSource {
            script: self.script,
            max_read_size: self.max_read_size,
            calls: 0,
        }
    }
}
