// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::iter::FusedIterator;

use crate::{Delimiter, View};

/// A forward-only scanning position over borrowed bytes.
///
/// A cursor tracks how many bytes remain to be scanned and never mutates the bytes it scans.
/// It is a snapshot: it covers the bytes that existed when it was created and holds a shared
/// borrow of their owner, so the owner cannot be appended to or reallocated while the cursor is
/// alive.
///
/// The main operation is [`next_token()`][Self::next_token], which splits off the bytes before
/// the next occurrence of a delimiter:
///
/// ```
/// use strbuf::{Cursor, Delimiter, View};
///
/// let comma = Delimiter::from_static(b",");
/// let mut cursor = Cursor::new(View::from_static(b"a,b,,c"));
///
/// assert_eq!(cursor.next_token(comma), b"a");
/// assert_eq!(cursor.next_token(comma), b"b");
/// assert_eq!(cursor.next_token(comma), b"");
/// assert_eq!(cursor.next_token(comma), b"c");
/// assert!(cursor.is_exhausted());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor<'a> {
    // The bytes not yet scanned. The position of the cursor is the start of this slice.
    remaining: &'a [u8],
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `view`.
    #[must_use]
    pub const fn new(view: View<'a>) -> Self {
        Self {
            remaining: view.as_bytes(),
        }
    }

    /// Number of bytes between the cursor position and the end of the scanned bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether every byte has been scanned.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// A zero-copy view over the bytes not yet scanned.
    #[must_use]
    pub const fn view(&self) -> View<'a> {
        View::new(self.remaining)
    }

    /// Moves the cursor forward by a single byte, returning the new remaining count.
    ///
    /// Does nothing if the cursor is exhausted.
    pub fn advance_one(&mut self) -> usize {
        self.advance(1)
    }

    /// Moves the cursor forward by `count` bytes, returning the new remaining count.
    ///
    /// The movement is clamped to the end of the scanned bytes, so the remaining count never
    /// underflows.
    pub fn advance(&mut self, count: usize) -> usize {
        let count = count.min(self.remaining.len());
        self.remaining = &self.remaining[count..];
        self.remaining.len()
    }

    /// Returns the bytes up to the next occurrence of `delimiter` and moves past the delimiter.
    ///
    /// The search tests, at each byte offset from the current position, whether the remaining
    /// bytes start with the delimiter. The returned view covers the bytes skipped before the match
    /// and is empty if the delimiter is right at the cursor position.
    ///
    /// If the delimiter does not occur, the returned view covers all remaining bytes and the
    /// cursor is left exhausted. Running out of input is not an error - callers validate that the
    /// tokens they need are non-empty.
    ///
    /// The search is `O(n * m)` for `n` remaining bytes and a delimiter of length `m`. This suits
    /// short protocol headers, not bulk payloads.
    pub fn next_token(&mut self, delimiter: Delimiter<'_>) -> View<'a> {
        let start = self.remaining;
        let mut skipped: usize = 0;

        while !self.is_exhausted() {
            if self.view().starts_with(delimiter) {
                self.advance(delimiter.len());
                return View::new(&start[..skipped]);
            }

            self.advance_one();
            skipped = skipped.wrapping_add(1);
        }

        View::new(start)
    }

    /// Returns an iterator that calls [`next_token()`][Self::next_token] until the cursor is
    /// exhausted.
    ///
    /// A delimiter at the very end does not produce a trailing empty token.
    ///
    /// ```
    /// use strbuf::{Cursor, Delimiter, View};
    ///
    /// let cursor = Cursor::new(View::from_static(b"GET /index.html HTTP/1.1"));
    /// let fields: Vec<_> = cursor.tokens(Delimiter::from_static(b" ")).collect();
    ///
    /// assert_eq!(fields, [b"GET".as_slice(), b"/index.html", b"HTTP/1.1"]);
    /// ```
    #[must_use]
    pub const fn tokens<'d>(self, delimiter: Delimiter<'d>) -> Tokens<'a, 'd> {
        Tokens { cursor: self, delimiter }
    }
}

impl<'a> From<View<'a>> for Cursor<'a> {
    fn from(value: View<'a>) -> Self {
        Self::new(value)
    }
}

/// Iterator over the tokens of a [`Cursor`], created by [`Cursor::tokens()`].
#[derive(Clone, Debug)]
pub struct Tokens<'a, 'd> {
    cursor: Cursor<'a>,
    delimiter: Delimiter<'d>,
}

impl<'a> Tokens<'a, '_> {
    /// The cursor positioned after the last token returned.
    #[must_use]
    pub const fn cursor(&self) -> Cursor<'a> {
        self.cursor
    }
}

impl<'a> Iterator for Tokens<'a, '_> {
    type Item = View<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_exhausted() {
            return None;
        }

        Some(self.cursor.next_token(self.delimiter))
    }
}

impl FusedIterator for Tokens<'_, '_> {}
