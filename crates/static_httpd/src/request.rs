// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use strbuf::{Delimiter, FIELD_DELIMITER, LINE_DELIMITER, View};

/// The only method the server responds to with content.
pub const GET: &[u8] = b"GET";

const PATH_SEPARATOR: Delimiter<'static> = Delimiter::from_static(b"/");

/// The first line of a request header, e.g. `GET /index.html HTTP/1.1`.
///
/// All three fields borrow from the header they were parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestLine<'a> {
    method: View<'a>,
    path: View<'a>,
    version: View<'a>,
}

impl<'a> RequestLine<'a> {
    /// Parses the request line at the start of `header`.
    ///
    /// The first line is split at single spaces into method, path and version. Returns `None` if
    /// any of the three is empty, which makes the request malformed. Anything after the version
    /// on the same line is ignored.
    #[must_use]
    pub fn parse(header: View<'a>) -> Option<Self> {
        let mut fields = header.cursor().next_token(LINE_DELIMITER).cursor();

        let method = fields.next_token(FIELD_DELIMITER);
        let path = fields.next_token(FIELD_DELIMITER);
        let version = fields.next_token(FIELD_DELIMITER);

        if method.is_empty() || path.is_empty() || version.is_empty() {
            return None;
        }

        Some(Self { method, path, version })
    }

    /// The method, e.g. `GET`.
    #[must_use]
    pub const fn method(&self) -> View<'a> {
        self.method
    }

    /// The path exactly as requested, e.g. `/index.html`.
    #[must_use]
    pub const fn path(&self) -> View<'a> {
        self.path
    }

    /// The protocol version, e.g. `HTTP/1.1`.
    #[must_use]
    pub const fn version(&self) -> View<'a> {
        self.version
    }

    /// Whether the method is exactly `GET`. Methods are case-sensitive.
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method.equals(GET)
    }

    /// The path relative to the document root: leading slashes removed.
    ///
    /// Returns `None` if any segment of the path is `..`, as such a path could name a file
    /// outside the document root.
    #[must_use]
    pub fn relative_path(&self) -> Option<View<'a>> {
        let mut relative = self.path.cursor();

        while relative.view().starts_with(b"/") {
            relative.advance_one();
        }

        let relative = relative.view();

        if relative.cursor().tokens(PATH_SEPARATOR).any(|segment| segment.equals(b"..")) {
            return None;
        }

        Some(relative)
    }
}
