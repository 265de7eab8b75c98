// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A single-shot static file server.
//!
//! The server binds a TCP socket, accepts exactly one connection, answers one HTTP request on it
//! with the contents of a file below its document root and exits. The request header is
//! accumulated with [`strbuf_io::HeaderAccumulator`] and tokenized in place with `strbuf`
//! cursors; the file is streamed back one chunk at a time through a single reused buffer.
//!
//! ```
//! use std::io::{Read, Write};
//! use std::net::TcpStream;
//! use std::thread;
//!
//! use static_httpd::{Config, Server, Status};
//!
//! let root = tempfile::tempdir()?;
//! std::fs::write(root.path().join("index.html"), "<h1>Hello</h1>")?;
//!
//! let server = Server::bind(Config {
//!     address: "127.0.0.1".parse()?,
//!     port: 0,
//!     root: root.path().to_path_buf(),
//!     ..Config::default()
//! })?;
//! let address = server.local_addr()?;
//!
//! let client = thread::spawn(move || -> std::io::Result<String> {
//!     let mut stream = TcpStream::connect(address)?;
//!     stream.write_all(b"GET /index.html HTTP/1.1\r\n\r\n")?;
//!
//!     let mut response = String::new();
//!     stream.read_to_string(&mut response)?;
//!     Ok(response)
//! });
//!
//! let served = server.serve_once()?;
//! assert_eq!(served.status, Status::Ok);
//!
//! let response = client.join().expect("client thread panicked")?;
//! assert!(response.ends_with("\r\n\r\n<h1>Hello</h1>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Only `GET` is served. Everything else about the request beyond its first line is ignored, and
//! the connection is always closed after the response.

mod config;
mod connection;
mod error;
mod request;
mod response;
mod server;

pub use config::{Config, DEFAULT_PORT, DEFAULT_ROOT};
pub use connection::{Served, handle_connection};
pub use error::{Error, Result};
pub use request::{GET, RequestLine};
pub use response::Status;
pub use server::Server;
