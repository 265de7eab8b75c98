// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs::File;
use std::io;
use std::path::Path;

use strbuf::{ByteBuffer, View};
use strbuf_io::{HeaderAccumulator, Receive, read, write_all};

use crate::response::{self, Status};
use crate::{Config, RequestLine, Result};

/// What was sent in response to a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Served {
    /// The status of the response.
    pub status: Status,

    /// Number of body bytes sent after the response head.
    pub body_bytes: usize,
}

/// Receives one request from `stream`, sends the response and returns what was sent.
///
/// The request header is accumulated until it ends with an empty line, then its request line is
/// dispatched:
///
/// * a request line without method, path or version gets `400 Bad Request`;
/// * a `GET` for a regular file below [`Config::root`] gets `200 OK` and the file's contents;
/// * a `GET` for anything else gets `404 Not Found`;
/// * any other method gets `405 Method Not Allowed`.
///
/// The `404` body names the path as it was requested, not the file system path below
/// [`Config::root`] that it resolved to.
///
/// The stream is not closed; that is up to the caller.
///
/// # Errors
///
/// Returns [`Error::Transfer`][crate::Error::Transfer] if the header cannot be received in full
/// (including when the peer closes the connection first or the header exceeds
/// [`Config::max_header_bytes`]) or if the response cannot be sent.
pub fn handle_connection<S>(stream: &mut S, config: &Config) -> Result<Served>
where
    S: Receive + io::Write + ?Sized,
{
    let mut accumulator = HeaderAccumulator::builder()
        .chunk_size(config.chunk_size)
        .limit(config.max_header_bytes)
        .buffer(ByteBuffer::create(config.chunk_size)?)
        .build();

    let header = accumulator.accumulate(stream).inspect_err(|e| {
        tracing::warn!(error = %e, "receiving the request header failed");
    })?;

    tracing::info!(bytes = header.len(), "request header received");

    let Some(request) = RequestLine::parse(header) else {
        tracing::error!(header = %header.escape_ascii(), "malformed request");
        return send_message(stream, Status::BadRequest, "Malformed request: ", header);
    };

    tracing::info!(
        method = %request.method().escape_ascii(),
        path = %request.path().escape_ascii(),
        version = %request.version().escape_ascii(),
        "request parsed"
    );

    if !request.is_get() {
        tracing::error!(method = %request.method().escape_ascii(), "method not allowed");
        return send_message(stream, Status::MethodNotAllowed, "Method not allowed: ", request.method());
    }

    let Some(mut file) = open_static_file(&config.root, &request)? else {
        return send_message(stream, Status::NotFound, "File not found: ", request.path());
    };

    write_all(response::head(Status::Ok)?.view(), stream)?;

    let body_bytes = stream_file(&mut file, stream, config.chunk_size)?;

    tracing::info!(body_bytes, "static resource sent");

    Ok(Served {
        status: Status::Ok,
        body_bytes,
    })
}

/// Sends a complete response whose body is a short message.
fn send_message<W>(stream: &mut W, status: Status, prefix: &str, detail: View<'_>) -> Result<Served>
where
    W: io::Write + ?Sized,
{
    write_all(response::head(status)?.view(), stream)?;
    let body_bytes = write_all(response::message_body(prefix, detail)?.view(), stream)?;

    Ok(Served { status, body_bytes })
}

/// Opens the regular file a request path names below `root`.
///
/// The path is resolved by copying the request path and prepending the root to the copy. Returns
/// `None` for paths that escape the root, are not valid UTF-8 or do not name a readable regular
/// file.
fn open_static_file(root: &Path, request: &RequestLine<'_>) -> Result<Option<File>> {
    let Some(relative) = request.relative_path() else {
        tracing::error!(path = %request.path().escape_ascii(), "path escapes the document root");
        return Ok(None);
    };

    let mut static_path = relative.to_buffer()?;
    static_path.prepend(b"/")?;
    static_path.prepend(root.as_os_str().as_encoded_bytes())?;

    let Ok(static_path) = std::str::from_utf8(static_path.as_bytes()) else {
        tracing::error!(path = %static_path.view().escape_ascii(), "path is not valid UTF-8");
        return Ok(None);
    };

    let file = match File::open(static_path) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(path = static_path, error = %e, "opening static resource failed");
            return Ok(None);
        }
    };

    match file.metadata() {
        Ok(metadata) if metadata.is_file() => {
            tracing::info!(path = static_path, size = metadata.len(), "static resource opened");
            Ok(Some(file))
        }
        Ok(_) => {
            tracing::error!(path = static_path, "static resource is not a regular file");
            Ok(None)
        }
        Err(e) => {
            tracing::error!(path = static_path, error = %e, "inspecting static resource failed");
            Ok(None)
        }
    }
}

/// Copies `file` to `stream` one chunk at a time, reusing a single buffer.
fn stream_file<W>(file: &mut File, stream: &mut W, chunk_size: usize) -> Result<usize>
where
    W: io::Write + ?Sized,
{
    let mut chunk = ByteBuffer::create(chunk_size)?;
    let mut total = 0_usize;

    while !read(&mut chunk, file, chunk_size)?.is_end_of_stream() {
        total = total.saturating_add(write_all(chunk.view(), stream)?);
        chunk.clear();
    }

    Ok(total)
}
