// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{ByteBuffer, Result, View};

/// A byte string that either owns its storage or borrows someone else's.
///
/// This is the explicit form of the distinction between [`ByteBuffer`] (owned, growable,
/// freeable) and [`View`] (borrowed, fixed). Code that accepts either can hold a `ByteStr` and
/// still never free or grow storage it does not own:
///
/// * [`free()`][Self::free] releases owned storage and does nothing for a borrowed view.
/// * [`to_mut()`][Self::to_mut] is the only way to get mutable access. For a borrowed view it
///   first copies the bytes into a new owned buffer, leaving the original owner untouched.
///
/// # Example
///
/// ```
/// use strbuf::{ByteStr, View};
///
/// let path = View::from_static(b"/index.html");
/// let mut resolved = ByteStr::from(path);
/// assert!(resolved.is_borrowed());
///
/// resolved.to_mut()?.prepend(b"static")?;
///
/// assert!(!resolved.is_borrowed());
/// assert_eq!(resolved.view(), b"static/index.html");
/// assert_eq!(path, b"/index.html");
/// # Ok::<(), strbuf::Error>(())
/// ```
#[derive(Debug)]
pub enum ByteStr<'a> {
    /// Bytes in storage owned by this value.
    Owned(ByteBuffer),

    /// Bytes in storage owned by someone else.
    Borrowed(View<'a>),
}

impl<'a> ByteStr<'a> {
    /// Whether the bytes are borrowed, i.e. this value must never free or grow them.
    #[must_use]
    pub const fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// A view over the bytes, whoever owns them.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        match self {
            Self::Owned(buffer) => buffer.view(),
            Self::Borrowed(view) => *view,
        }
    }

    /// Number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// Whether there are zero bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    /// Capacity of the owned storage. Always zero for a borrowed view.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        match self {
            Self::Owned(buffer) => buffer.capacity(),
            Self::Borrowed(_) => 0,
        }
    }

    /// Releases owned storage, leaving an empty owned buffer behind.
    ///
    /// For a borrowed view this is a no-op: the view keeps pointing at the same bytes and the
    /// owner of those bytes is not affected in any way.
    pub fn free(&mut self) {
        match self {
            Self::Owned(buffer) => buffer.free(),
            Self::Borrowed(_) => {}
        }
    }

    /// Mutable access to owned storage, copying borrowed bytes into a new buffer first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if a borrowed
    /// view has to be copied and the storage cannot be obtained. The value stays borrowed in
    /// that case.
    pub fn to_mut(&mut self) -> Result<&mut ByteBuffer> {
        match self {
            Self::Owned(buffer) => Ok(buffer),
            Self::Borrowed(view) => {
                *self = Self::Owned(view.to_buffer()?);
                self.to_mut()
            }
        }
    }

    /// Converts into an owned buffer, copying borrowed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if borrowed bytes
    /// have to be copied and the storage cannot be obtained.
    pub fn into_owned(self) -> Result<ByteBuffer> {
        match self {
            Self::Owned(buffer) => Ok(buffer),
            Self::Borrowed(view) => view.to_buffer(),
        }
    }
}

impl From<ByteBuffer> for ByteStr<'_> {
    fn from(value: ByteBuffer) -> Self {
        Self::Owned(value)
    }
}

impl<'a> From<View<'a>> for ByteStr<'a> {
    fn from(value: View<'a>) -> Self {
        Self::Borrowed(value)
    }
}

impl AsRef<[u8]> for ByteStr<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Owned(buffer) => buffer.as_bytes(),
            Self::Borrowed(view) => view.as_bytes(),
        }
    }
}

impl PartialEq for ByteStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Eq for ByteStr<'_> {}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_borrowed_is_noop() {
        let owner = {
            let mut owner = ByteBuffer::create(8).unwrap();
            owner.append(b"abc").unwrap();
            owner
        };

        let mut borrowed = ByteStr::from(owner.view());
        borrowed.free();

        assert_eq!(borrowed.view(), b"abc");
        assert_eq!(borrowed.capacity(), 0);
        assert_eq!(owner, b"abc");
        assert_eq!(owner.capacity(), 8);
    }

    #[test]
    fn free_owned_releases() {
        let mut buffer = ByteBuffer::create(8).unwrap();
        buffer.append(b"abc").unwrap();

        let mut owned = ByteStr::from(buffer);
        owned.free();

        assert!(owned.is_empty());
        assert_eq!(owned.capacity(), 0);
    }

    #[test]
    fn to_mut_copies_borrowed_bytes() {
        let owner = {
            let mut owner = ByteBuffer::create(4).unwrap();
            owner.append(b"/a").unwrap();
            owner
        };

        let mut value = ByteStr::from(owner.view());
        value.to_mut().unwrap().prepend(b"root").unwrap();

        assert!(!value.is_borrowed());
        assert_eq!(value.view(), b"root/a");
        assert_eq!(owner, b"/a");
        assert_eq!(owner.generation(), 0);
    }

    #[test]
    fn to_mut_on_owned_reuses_buffer() {
        let mut value = ByteStr::from(View::from_static(b"ab"));
        value.to_mut().unwrap();

        let first = value.to_mut().unwrap().as_bytes().as_ptr();
        let again = value.to_mut().unwrap();

        assert_eq!(again.as_bytes().as_ptr(), first);
        assert_eq!(again.generation(), 0);
        assert_eq!(value.view(), b"ab");
    }

    #[test]
    fn into_owned_keeps_owned_buffer() {
        let mut buffer = ByteBuffer::create(16).unwrap();
        buffer.append(b"abc").unwrap();

        let owned = ByteStr::from(buffer).into_owned().unwrap();

        assert_eq!(owned, b"abc");
        assert_eq!(owned.capacity(), 16);
    }

    #[test]
    fn equality_ignores_ownership() {
        let mut buffer = ByteBuffer::create(4).unwrap();
        buffer.append(b"same").unwrap();

        assert_eq!(ByteStr::from(buffer), ByteStr::from(View::from_static(b"same")));
    }
}
