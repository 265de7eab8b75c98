// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Growable byte buffers and zero-copy cursors for tokenizing protocol bytes.
//!
//! Bytes received from a socket or read from a file are accumulated in a [`ByteBuffer`], which
//! owns its storage and grows it on demand. Once the interesting part of the input has arrived,
//! the buffer is scanned with a [`Cursor`] that splits it into tokens at [`Delimiter`]s. Every
//! token is a [`View`]: a read-only window into the buffer's storage, produced without copying.
//!
//! ```
//! use strbuf::{ByteBuffer, FIELD_DELIMITER, HEADERS_TERMINATOR, LINE_DELIMITER};
//!
//! let mut header = ByteBuffer::create(16)?;
//!
//! // Bytes arrive in arbitrary pieces.
//! for piece in [&b"GET /index.html HT"[..], b"TP/1.1\r\nHost: ex", b"ample\r\n\r\n"] {
//!     assert!(!header.ends_with(HEADERS_TERMINATOR));
//!     header.append(piece)?;
//! }
//!
//! assert!(header.ends_with(HEADERS_TERMINATOR));
//!
//! let mut lines = header.cursor();
//! let mut request_line = lines.next_token(LINE_DELIMITER).cursor();
//!
//! assert_eq!(request_line.next_token(FIELD_DELIMITER), b"GET");
//! assert_eq!(request_line.next_token(FIELD_DELIMITER), b"/index.html");
//! assert_eq!(request_line.next_token(FIELD_DELIMITER), b"HTTP/1.1");
//! # Ok::<(), strbuf::Error>(())
//! ```
//!
//! # Ownership
//!
//! A [`ByteBuffer`] owns its storage. A [`View`] and a [`Cursor`] only borrow it, and the borrow
//! checker makes sure the buffer is not mutated (and therefore never reallocated) while any of
//! them is alive. Where a value may be either owned or borrowed, [`ByteStr`] makes the
//! distinction explicit so that borrowed bytes can never be freed or grown.
//!
//! # Failure
//!
//! Operations that need storage return [`Error::AllocationFailure`] rather than aborting the
//! process, and leave the buffer unmodified when they fail.
//!
//! Reading into and writing from buffers over sockets and files is provided by the companion
//! `strbuf_io` crate.

mod buffer;
mod byte_str;
mod cursor;
mod delimiter;
mod error;
mod view;

pub use buffer::ByteBuffer;
pub use byte_str::ByteStr;
pub use cursor::{Cursor, Tokens};
pub use delimiter::Delimiter;
pub use error::{Error, Result};
pub use view::View;

/// Separates the lines of a protocol header: `CR LF`.
pub const LINE_DELIMITER: Delimiter<'static> = Delimiter::from_static(b"\r\n");

/// Separates the fields of a request line: a single space.
pub const FIELD_DELIMITER: Delimiter<'static> = Delimiter::from_static(b" ");

/// Marks the end of a protocol header section: an empty line, i.e. `CR LF CR LF`.
pub const HEADERS_TERMINATOR: Delimiter<'static> = Delimiter::from_static(b"\r\n\r\n");
