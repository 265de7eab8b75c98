// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use strbuf::{ByteBuffer, View};

/// The response statuses the server sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// `200 OK`: the file follows.
    Ok,
    /// `400 Bad Request`: the request line lacks a method, path or version.
    BadRequest,
    /// `404 Not Found`: the path does not name a servable file.
    NotFound,
    /// `405 Method Not Allowed`: only `GET` is served.
    MethodNotAllowed,
}

impl Status {
    /// The numeric status code, e.g. 404.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
        }
    }

    /// The reason phrase, e.g. `Not Found`.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
        }
    }

    const fn status_line(self) -> &'static [u8] {
        match self {
            Self::Ok => b"HTTP/1.1 200 OK\r\n",
            Self::BadRequest => b"HTTP/1.1 400 Bad Request\r\n",
            Self::NotFound => b"HTTP/1.1 404 Not Found\r\n",
            Self::MethodNotAllowed => b"HTTP/1.1 405 Method Not Allowed\r\n",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// Builds the status line and header fields of a response, up to and including the empty line
/// that separates them from the body.
pub(crate) fn head(status: Status) -> strbuf::Result<ByteBuffer> {
    let mut head = ByteBuffer::create(128)?;

    head.append(status.status_line())?;
    head.append(b"Content-Type: text/html\r\n")?;
    head.append(b"Connection: close\r\n")?;

    if status == Status::MethodNotAllowed {
        head.append(b"Allow: GET\r\n")?;
    }

    head.append(b"\r\n")?;

    Ok(head)
}

/// Builds a short HTML-safe message body: `prefix` followed by an escaped rendition of `detail`.
///
/// Printable ASCII is kept except for the HTML special characters, which become entities. Every
/// other byte is written as an ASCII escape such as `\r` or `\xff`.
pub(crate) fn message_body(prefix: &str, detail: View<'_>) -> strbuf::Result<ByteBuffer> {
    let mut escaped = String::with_capacity(detail.len());

    for byte in detail.as_bytes() {
        match byte {
            b'<' => escaped.push_str("&lt;"),
            b'>' => escaped.push_str("&gt;"),
            b'&' => escaped.push_str("&amp;"),
            b'"' => escaped.push_str("&quot;"),
            b'\'' => escaped.push_str("&#39;"),
            _ => escaped.extend(byte.escape_ascii().map(char::from)),
        }
    }

    let mut body = ByteBuffer::create(prefix.len() + escaped.len())?;
    body.append(prefix)?;
    body.append(escaped)?;

    Ok(body)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Status::Ok, "200 OK")]
    #[case(Status::BadRequest, "400 Bad Request")]
    #[case(Status::NotFound, "404 Not Found")]
    #[case(Status::MethodNotAllowed, "405 Method Not Allowed")]
    fn status_display(#[case] status: Status, #[case] expected: &str) {
        assert_eq!(status.to_string(), expected);
        assert!(String::from_utf8_lossy(status.status_line()).contains(expected));
    }

    #[test]
    fn ok_head() {
        let head = head(Status::Ok).unwrap();

        assert_eq!(
            String::from_utf8_lossy(head.as_bytes()),
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn method_not_allowed_head_lists_allowed_method() {
        let head = head(Status::MethodNotAllowed).unwrap();

        assert_eq!(
            String::from_utf8_lossy(head.as_bytes()),
            "HTTP/1.1 405 Method Not Allowed\r\nContent-Type: text/html\r\nConnection: close\r\nAllow: GET\r\n\r\n"
        );
    }

    #[test]
    fn head_fits_initial_capacity() {
        for status in [Status::Ok, Status::BadRequest, Status::NotFound, Status::MethodNotAllowed] {
            assert_eq!(head(status).unwrap().generation(), 0);
        }
    }

    #[test]
    fn message_body_escapes_detail() {
        let body = message_body("Malformed request: ", View::from_static(b"<b>GET\r\n\xff\"&'")).unwrap();

        assert_eq!(
            String::from_utf8_lossy(body.as_bytes()),
            r"Malformed request: &lt;b&gt;GET\r\n\xff&quot;&amp;&#39;"
        );
    }

    #[test]
    fn message_body_plain_detail() {
        let body = message_body("Method not allowed: ", View::from_static(b"POST")).unwrap();

        assert_eq!(body, b"Method not allowed: POST");
        assert_eq!(body.capacity(), body.len());
    }
}
