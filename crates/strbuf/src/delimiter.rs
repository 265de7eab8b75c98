// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{Error, Result, View};

/// A non-empty byte sequence that marks the boundary between two tokens.
///
/// Scanning for an empty delimiter would match at every position without ever advancing, so an
/// empty delimiter cannot be constructed. [`new()`][Self::new] reports it as an error and
/// [`from_static()`][Self::from_static] refuses it during constant evaluation:
///
/// ```compile_fail
/// const NOTHING: strbuf::Delimiter<'static> = strbuf::Delimiter::from_static(b"");
/// # let _ = NOTHING;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delimiter<'a> {
    bytes: &'a [u8],
}

impl<'a> Delimiter<'a> {
    /// Creates a delimiter from the provided bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDelimiter`] if `bytes` is empty.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptyDelimiter);
        }

        Ok(Self { bytes })
    }

    /// The bytes of the delimiter. Never empty.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Length of the delimiter in bytes. Never zero.
    #[must_use]
    #[expect(clippy::len_without_is_empty, reason = "a delimiter is never empty")]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A view over the bytes of the delimiter.
    #[must_use]
    pub const fn view(&self) -> View<'a> {
        View::new(self.bytes)
    }
}

impl Delimiter<'static> {
    /// Creates a delimiter from a static byte string.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty. In a `const` context this is a compile-time error.
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        assert!(!bytes.is_empty(), "delimiter must not be empty");
        Self { bytes }
    }
}

impl fmt::Debug for Delimiter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Delimiter(b\"{}\")", self.bytes.escape_ascii())
    }
}

impl AsRef<[u8]> for Delimiter<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> TryFrom<&'a [u8]> for Delimiter<'a> {
    type Error = Error;

    fn try_from(value: &'a [u8]) -> Result<Self> {
        Self::new(value)
    }
}

impl<'a> TryFrom<View<'a>> for Delimiter<'a> {
    type Error = Error;

    fn try_from(value: View<'a>) -> Result<Self> {
        Self::new(value.as_bytes())
    }
}
