// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Blocking descriptor I/O expressed via `strbuf` types.
//!
//! Bytes are received from sockets ([`Receive`] trait), read from local descriptors such as files
//! ([`std::io::Read`]) and written to sinks ([`std::io::Write`]) directly into and out of a
//! [`ByteBuffer`][strbuf::ByteBuffer]:
//!
//! * [`receive()`] and [`read()`] append at most `max_len - 1` bytes per call and report an
//!   orderly end of stream as [`ReadOutcome::EndOfStream`], never as an error.
//! * [`write_all()`] delivers every byte, continuing after short writes and interruptions.
//! * [`HeaderAccumulator`] repeats [`receive()`] until the buffered bytes end with a protocol
//!   header terminator, enforcing a size limit along the way.
//!
//! All operations block the calling thread. Deadlines are left to the caller, e.g. via
//! [`TcpStream::set_read_timeout`][std::net::TcpStream::set_read_timeout].
//!
//! ```
//! use strbuf::{ByteBuffer, FIELD_DELIMITER, LINE_DELIMITER};
//! use strbuf_io::testing::{FakeSink, FakeSource};
//! use strbuf_io::{HeaderAccumulator, write_all};
//!
//! let mut socket = FakeSource::new(b"GET /hello.html HTTP/1.1\r\n\r\n");
//!
//! let mut accumulator = HeaderAccumulator::new();
//! let header = accumulator.accumulate(&mut socket)?;
//!
//! let mut request_line = header.cursor().next_token(LINE_DELIMITER).cursor();
//! let method = request_line.next_token(FIELD_DELIMITER);
//! let path = request_line.next_token(FIELD_DELIMITER);
//!
//! let mut response = ByteBuffer::new();
//! response.append(b"HTTP/1.1 200 OK\r\n\r\n")?;
//! response.append(method)?;
//! response.append(b" ")?;
//! response.append(path)?;
//!
//! let mut client = FakeSink::new();
//! write_all(response.view(), &mut client)?;
//!
//! assert_eq!(client.contents(), b"HTTP/1.1 200 OK\r\n\r\nGET /hello.html");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The `test-util` feature enables scripted sources and sinks for testing code that uses these
//! operations. These are in the `testing` module.

mod accumulator;
mod buffer_io;
mod error;
mod outcome;
mod receive;

pub use accumulator::{
    AccumulatorState, DEFAULT_CHUNK_SIZE, DEFAULT_HEADER_LIMIT, HeaderAccumulator, HeaderAccumulatorBuilder,
};
pub use buffer_io::{BufferIoExt, read, receive, write_all};
pub use error::{Error, Result};
pub use outcome::ReadOutcome;
pub use receive::Receive;

#[cfg(any(test, feature = "test-util"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub mod testing;
