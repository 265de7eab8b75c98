// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{ByteBuffer, Cursor};

/// A read-only, non-owning view over a contiguous range of bytes.
///
/// A view aliases bytes owned by something else (a [`ByteBuffer`], a static byte string, any
/// byte slice) for as long as the lifetime `'a` allows. It never owns, frees, grows or
/// reallocates the bytes it points at, which is why its [`capacity()`][Self::capacity] is always
/// zero.
///
/// Because a view holds a shared borrow of its owner, the owner cannot be mutated while the view
/// is alive. Any attempt to append to or prepend into a [`ByteBuffer`] while a view over it is
/// still in use is rejected at compile time:
///
/// ```compile_fail
/// use strbuf::ByteBuffer;
///
/// let mut buffer = ByteBuffer::create(8).unwrap();
/// buffer.append(b"GET").unwrap();
///
/// let view = buffer.view();
/// buffer.append(b" /").unwrap(); // may reallocate the storage `view` points into
/// assert_eq!(view, b"GET");
/// ```
///
/// # Example
///
/// ```
/// use strbuf::View;
///
/// let view = View::from_static(b"HTTP/1.1 200 OK");
///
/// assert!(view.starts_with(b"HTTP/"));
/// assert!(view.ends_with(b"OK"));
/// assert_eq!(view.capacity(), 0);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct View<'a> {
    bytes: &'a [u8],
}

impl<'a> View<'a> {
    /// Creates a view over the provided bytes.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Returns a view over zero bytes.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bytes: &[] }
    }

    /// The bytes the view covers.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of bytes in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the view covers zero bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Always zero: a view owns no storage and can never be grown.
    #[cfg_attr(test, mutants::skip)] // Constant, nothing to mutate.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        0
    }

    /// Whether the view contains exactly the same bytes as `other`.
    ///
    /// Both the lengths and the contents must match. A candidate that is a prefix of the view,
    /// or that has the view as its prefix, is never reported equal.
    #[must_use]
    pub fn equals(&self, other: impl AsRef<[u8]>) -> bool {
        self.bytes == other.as_ref()
    }

    /// Whether the view begins with `prefix`.
    ///
    /// Returns `false` if `prefix` is longer than the view.
    #[must_use]
    pub fn starts_with(&self, prefix: impl AsRef<[u8]>) -> bool {
        let prefix = prefix.as_ref();

        if self.bytes.len() < prefix.len() {
            return false;
        }

        &self.bytes[..prefix.len()] == prefix
    }

    /// Whether the view ends with `suffix`.
    ///
    /// Returns `false` if `suffix` is longer than the view.
    #[must_use]
    pub fn ends_with(&self, suffix: impl AsRef<[u8]>) -> bool {
        let suffix = suffix.as_ref();

        let Some(start) = self.bytes.len().checked_sub(suffix.len()) else {
            return false;
        };

        &self.bytes[start..] == suffix
    }

    /// Copies as many bytes as fit into `out`, returning the number of bytes copied.
    ///
    /// This is `min(self.len(), out.len())`. Any remaining bytes of `out` are left untouched.
    pub fn get_bytes(&self, out: &mut [u8]) -> usize {
        let count = self.bytes.len().min(out.len());
        out[..count].copy_from_slice(&self.bytes[..count]);
        count
    }

    /// Starts a forward-only scan over the bytes of the view.
    #[must_use]
    pub const fn cursor(&self) -> Cursor<'a> {
        Cursor::new(*self)
    }

    /// Copies the bytes of the view into a new owned buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if storage
    /// cannot be obtained.
    pub fn to_buffer(&self) -> crate::Result<ByteBuffer> {
        let mut buffer = ByteBuffer::create(self.bytes.len())?;
        buffer.append(self.bytes)?;
        Ok(buffer)
    }

    /// Returns an iterator over the bytes with ASCII control and non-ASCII bytes escaped.
    ///
    /// Intended for logging and diagnostics of raw protocol bytes.
    #[must_use]
    pub fn escape_ascii(&self) -> std::slice::EscapeAscii<'a> {
        self.bytes.escape_ascii()
    }
}

impl View<'static> {
    /// Creates a view over a static byte string.
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View(b\"{}\")", self.bytes.escape_ascii())
    }
}

impl AsRef<[u8]> for View<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for View<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::new(value)
    }
}

impl<'a, const LEN: usize> From<&'a [u8; LEN]> for View<'a> {
    fn from(value: &'a [u8; LEN]) -> Self {
        Self::new(value.as_slice())
    }
}

impl<'a> From<&'a str> for View<'a> {
    fn from(value: &'a str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl<'a> From<&'a ByteBuffer> for View<'a> {
    fn from(value: &'a ByteBuffer) -> Self {
        value.view()
    }
}

impl PartialEq<[u8]> for View<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for View<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl<const LEN: usize> PartialEq<&[u8; LEN]> for View<'_> {
    fn eq(&self, other: &&[u8; LEN]) -> bool {
        self.bytes == other.as_slice()
    }
}

impl PartialEq<ByteBuffer> for View<'_> {
    fn eq(&self, other: &ByteBuffer) -> bool {
        self.bytes == other.as_bytes()
    }
}
