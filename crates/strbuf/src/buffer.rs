// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{Cursor, Error, Result, View};

/// Owned, growable byte storage with explicit length and capacity tracking.
///
/// The buffer owns `capacity` bytes of zero-initialized storage, the first `len` of which hold
/// data. Data is added with [`append()`] and [`prepend()`]; when the storage is too small it is
/// replaced by a larger one according to a doubling growth policy:
///
/// ```text
/// new capacity = max(capacity * 2, (len + additional) * 2)
/// ```
///
/// which keeps the amortized cost of appending a byte constant.
///
/// Every operation that may need storage returns [`Error::AllocationFailure`] instead of aborting
/// the process when the storage cannot be obtained. In that case the buffer is left exactly as it
/// was before the call.
///
/// # Views and cursors
///
/// The contents are read through [`view()`] and [`cursor()`], both of which borrow the buffer.
/// The borrow checker guarantees that no view or cursor outlives a reallocation of the storage
/// it points into.
///
/// # Example
///
/// ```
/// use strbuf::ByteBuffer;
///
/// let mut buffer = ByteBuffer::create(4)?;
///
/// buffer.append(b"mid")?;
/// buffer.prepend(b"X")?;
/// buffer.append(b"Y")?;
///
/// assert_eq!(buffer, b"XmidY");
/// assert!(buffer.len() <= buffer.capacity());
/// # Ok::<(), strbuf::Error>(())
/// ```
///
/// [`append()`]: Self::append
/// [`prepend()`]: Self::prepend
/// [`view()`]: Self::view
/// [`cursor()`]: Self::cursor
#[derive(Default)]
pub struct ByteBuffer {
    // Always fully initialized. The length of the boxed slice is the capacity of the buffer.
    storage: Box<[u8]>,

    // Number of bytes of `storage` that hold data. Type invariant: `len <= storage.len()`.
    len: usize,

    // Incremented every time `storage` is replaced by a larger allocation.
    generation: u64,
}

impl ByteBuffer {
    /// Creates an empty buffer without any storage.
    ///
    /// Storage is obtained on the first write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with `capacity` bytes of zero-initialized storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the storage cannot be obtained.
    ///
    /// # Example
    ///
    /// ```
    /// use strbuf::ByteBuffer;
    ///
    /// let buffer = ByteBuffer::create(256)?;
    ///
    /// assert_eq!(buffer.capacity(), 256);
    /// assert!(buffer.is_empty());
    /// # Ok::<(), strbuf::Error>(())
    /// ```
    pub fn create(capacity: usize) -> Result<Self> {
        Ok(Self {
            storage: allocate_zeroed(capacity, &[])?,
            len: 0,
            generation: 0,
        })
    }

    /// Releases the storage. The buffer is empty with zero capacity afterwards.
    ///
    /// Dropping the buffer releases the storage as well; this method exists for callers that want
    /// to keep reusing the same value.
    pub fn free(&mut self) {
        self.storage = Box::default();
        self.len = 0;
    }

    /// Number of bytes of data in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds zero bytes of data.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total size of the owned storage, filled or not.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Storage that has not been filled with data yet.
    #[must_use]
    pub const fn remaining_capacity(&self) -> usize {
        // Cannot wrap: `len <= capacity` is a type invariant.
        self.storage.len().wrapping_sub(self.len)
    }

    /// Counts the reallocations the buffer has gone through.
    ///
    /// The value changes every time the storage is replaced, which is exactly the set of events
    /// that would invalidate a pointer into the previous storage.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The bytes of data in the buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// A zero-copy view over the data in the buffer.
    ///
    /// The buffer cannot be mutated while the view is alive.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        View::new(self.as_bytes())
    }

    /// Starts a forward-only scan over a snapshot of the data in the buffer.
    ///
    /// The buffer cannot be mutated while the cursor is alive.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self.view())
    }

    /// Appends `bytes` after the existing data.
    ///
    /// Returns the number of bytes appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the buffer needs to grow and the storage cannot be
    /// obtained. The buffer is unmodified in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use strbuf::ByteBuffer;
    ///
    /// let mut buffer = ByteBuffer::create(1)?;
    /// buffer.append(b"a")?;
    ///
    /// // The buffer is full, so this replaces the storage with a larger one.
    /// buffer.append(b"b")?;
    ///
    /// assert_eq!(buffer, b"ab");
    /// assert_eq!(buffer.generation(), 1);
    /// # Ok::<(), strbuf::Error>(())
    /// ```
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) -> Result<usize> {
        let bytes = bytes.as_ref();

        self.reserve(bytes.len())?;

        // Cannot overflow: `reserve()` guaranteed the storage holds `len + bytes.len()` bytes.
        let end = self.len.wrapping_add(bytes.len());
        self.storage[self.len..end].copy_from_slice(bytes);
        self.len = end;

        Ok(bytes.len())
    }

    /// Inserts `bytes` in front of the existing data.
    ///
    /// The existing data is moved towards the end of the storage by `bytes.len()` before the new
    /// bytes are written at the front. Returns the number of bytes prepended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the buffer needs to grow and the storage cannot be
    /// obtained. The buffer is unmodified in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use strbuf::ByteBuffer;
    ///
    /// let mut path = ByteBuffer::create(16)?;
    /// path.append(b"/index.html")?;
    /// path.prepend(b"static")?;
    ///
    /// assert_eq!(path, b"static/index.html");
    /// # Ok::<(), strbuf::Error>(())
    /// ```
    pub fn prepend(&mut self, bytes: impl AsRef<[u8]>) -> Result<usize> {
        let bytes = bytes.as_ref();

        self.reserve(bytes.len())?;

        // Cannot overflow: `reserve()` guaranteed the storage holds `len + bytes.len()` bytes.
        let end = self.len.wrapping_add(bytes.len());

        // The source and destination ranges overlap whenever the existing data is longer than
        // the prepended bytes. `copy_within()` has memmove semantics.
        self.storage.copy_within(..self.len, bytes.len());
        self.storage[..bytes.len()].copy_from_slice(bytes);
        self.len = end;

        Ok(bytes.len())
    }

    /// Creates an independent owned copy of the buffer.
    ///
    /// The copy has at least the capacity of the original. Mutating one never affects the other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the storage for the copy cannot be obtained.
    pub fn copy(&self) -> Result<Self> {
        Ok(Self {
            storage: allocate_zeroed(self.capacity(), self.as_bytes())?,
            len: self.len,
            generation: 0,
        })
    }

    /// Whether the buffer contains exactly the same bytes as `other`.
    #[must_use]
    pub fn equals(&self, other: impl AsRef<[u8]>) -> bool {
        self.view().equals(other)
    }

    /// Whether the buffer data begins with `prefix`.
    ///
    /// Returns `false` if `prefix` is longer than the data.
    #[must_use]
    pub fn starts_with(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.view().starts_with(prefix)
    }

    /// Whether the buffer data ends with `suffix`.
    ///
    /// Returns `false` if `suffix` is longer than the data.
    #[must_use]
    pub fn ends_with(&self, suffix: impl AsRef<[u8]>) -> bool {
        self.view().ends_with(suffix)
    }

    /// Copies as many bytes as fit into `out`, returning the number of bytes copied.
    pub fn get_bytes(&self, out: &mut [u8]) -> usize {
        self.view().get_bytes(out)
    }

    /// Discards the data while keeping the storage for reuse.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Ensures the storage can hold at least `additional` more bytes of data.
    ///
    /// Uses the same growth policy as [`append()`][Self::append] and does nothing if the
    /// remaining capacity is already sufficient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the storage cannot be obtained. The buffer is
    /// unmodified in that case.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self.len.checked_add(additional).ok_or_else(Error::capacity_overflow)?;

        if required <= self.capacity() {
            return Ok(());
        }

        let new_capacity = grown_capacity(self.capacity(), required).ok_or_else(Error::capacity_overflow)?;

        self.storage = allocate_zeroed(new_capacity, self.as_bytes())?;
        self.generation = self.generation.wrapping_add(1);

        Ok(())
    }

    /// The unfilled part of the storage, for writing data directly into the buffer.
    ///
    /// Call [`reserve()`][Self::reserve] first to make room and [`commit()`][Self::commit]
    /// afterwards to declare how many bytes were written.
    #[must_use]
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.len..]
    }

    /// Declares that the first `count` bytes of [`unfilled_mut()`][Self::unfilled_mut] now hold
    /// data.
    ///
    /// # Panics
    ///
    /// Panics if `count` is greater than the remaining capacity.
    pub fn commit(&mut self, count: usize) {
        assert!(
            count <= self.remaining_capacity(),
            "attempted to commit {count} bytes with only {} bytes of remaining capacity",
            self.remaining_capacity()
        );

        // Cannot wrap: guarded by the assertion above.
        self.len = self.len.wrapping_add(count);
    }
}

/// Applies the doubling growth policy. Returns `None` if the result is not representable.
fn grown_capacity(capacity: usize, required: usize) -> Option<usize> {
    Some(capacity.checked_mul(2)?.max(required.checked_mul(2)?))
}

/// Obtains `capacity` bytes of zeroed storage starting with a copy of `prefix`.
///
/// The allocation is attempted up front so that failure is reported before any existing storage
/// is touched.
fn allocate_zeroed(capacity: usize, prefix: &[u8]) -> Result<Box<[u8]>> {
    debug_assert!(prefix.len() <= capacity);

    let mut storage = Vec::new();
    storage.try_reserve_exact(capacity).map_err(|e| Error::AllocationFailure {
        requested: capacity,
        source: Some(e),
    })?;

    storage.extend_from_slice(prefix);
    storage.resize(capacity, 0);

    Ok(storage.into_boxed_slice())
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("data", &format_args!("b\"{}\"", self.as_bytes().escape_ascii()))
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("generation", &self.generation)
            .finish()
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteBuffer {}

impl PartialEq<[u8]> for ByteBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for ByteBuffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<const LEN: usize> PartialEq<&[u8; LEN]> for ByteBuffer {
    fn eq(&self, other: &&[u8; LEN]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl PartialEq<View<'_>> for ByteBuffer {
    fn eq(&self, other: &View<'_>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;
    use testing_aids::repeating_incrementing_bytes;

    use super::*;

    assert_impl_all!(ByteBuffer: Send, Sync);

    #[test]
    fn create_is_empty_and_zeroed() {
        let mut buffer = ByteBuffer::create(16).unwrap();

        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 16);
        assert!(buffer.is_empty());
        assert!(buffer.unfilled_mut().iter().all(|b| *b == 0));
    }

    #[test]
    fn create_unrepresentable_capacity_fails() {
        let error = ByteBuffer::create(usize::MAX).unwrap_err();

        assert!(matches!(
            error,
            Error::AllocationFailure {
                requested: usize::MAX,
                source: Some(_)
            }
        ));
    }

    #[test]
    fn append_grows_by_policy() {
        let mut buffer = ByteBuffer::create(4).unwrap();

        buffer.append(b"abc").unwrap();
        assert_eq!(buffer.capacity(), 4);

        // 3 + 2 = 5 > 4: max(4 * 2, 5 * 2) = 10
        buffer.append(b"de").unwrap();
        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer, b"abcde");

        // 5 + 30 = 35 > 10: max(10 * 2, 35 * 2) = 70
        buffer.append([b'x'; 30]).unwrap();
        assert_eq!(buffer.capacity(), 70);
        assert_eq!(buffer.len(), 35);
    }

    #[test]
    fn append_to_full_buffer_reallocates_once() {
        let mut buffer = ByteBuffer::create(1).unwrap();
        buffer.append(b"a").unwrap();
        assert_eq!(buffer.generation(), 0);

        buffer.append(b"b").unwrap();

        assert_eq!(buffer.generation(), 1);
        assert!(buffer.capacity() >= 2);
        assert_eq!(buffer, b"ab");
    }

    #[test]
    fn append_within_capacity_does_not_reallocate() {
        let mut buffer = ByteBuffer::create(8).unwrap();

        buffer.append(b"1234").unwrap();
        buffer.append(b"5678").unwrap();

        assert_eq!(buffer.generation(), 0);
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn append_sequence_concatenates_and_respects_capacity() {
        let mut buffer = ByteBuffer::new();
        let mut expected = Vec::new();

        let mut data = repeating_incrementing_bytes();

        for chunk_len in [0, 1, 2, 3, 7, 0, 64, 1, 255, 13] {
            let chunk: Vec<u8> = data.by_ref().take(chunk_len).collect();

            assert_eq!(buffer.append(&chunk).unwrap(), chunk_len);
            expected.extend_from_slice(&chunk);

            assert!(buffer.len() <= buffer.capacity());
            assert_eq!(buffer.as_bytes(), expected.as_slice());
        }
    }

    #[test]
    fn append_empty_to_storage_less_buffer() {
        let mut buffer = ByteBuffer::new();

        assert_eq!(buffer.append(b"").unwrap(), 0);

        assert_eq!(buffer.capacity(), 0);
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn prepend_then_append() {
        let mut buffer = ByteBuffer::create(3).unwrap();
        buffer.append(b"mid").unwrap();

        buffer.prepend(b"X").unwrap();
        buffer.append(b"Y").unwrap();

        assert_eq!(buffer, b"XmidY");
    }

    #[test]
    fn prepend_longer_than_existing_data() {
        let mut buffer = ByteBuffer::create(32).unwrap();
        buffer.append(b"ab").unwrap();

        buffer.prepend(b"0123456789").unwrap();

        assert_eq!(buffer, b"0123456789ab");
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn prepend_overlapping_shift() {
        let mut buffer = ByteBuffer::create(32).unwrap();
        buffer.append(b"0123456789").unwrap();

        buffer.prepend(b"ab").unwrap();

        assert_eq!(buffer, b"ab0123456789");
    }

    #[test]
    fn prepend_grows_by_policy() {
        let mut buffer = ByteBuffer::create(2).unwrap();
        buffer.append(b"ef").unwrap();

        buffer.prepend(b"abcd").unwrap();

        assert_eq!(buffer, b"abcdef");
        assert_eq!(buffer.capacity(), 12);
        assert_eq!(buffer.generation(), 1);
    }

    #[test]
    fn copy_is_independent() {
        let mut original = ByteBuffer::create(4).unwrap();
        original.append(b"abc").unwrap();

        let mut copy = original.copy().unwrap();
        copy.append(b"defgh").unwrap();
        copy.prepend(b"_").unwrap();

        assert_eq!(original, b"abc");
        assert_eq!(original.capacity(), 4);
        assert_eq!(copy, b"_abcdefgh");
        assert!(copy.capacity() >= original.len());
    }

    #[test]
    fn copy_of_empty_buffer() {
        let copy = ByteBuffer::new().copy().unwrap();

        assert!(copy.is_empty());
        assert_eq!(copy.capacity(), 0);
    }

    #[test]
    fn free_releases_storage() {
        let mut buffer = ByteBuffer::create(8).unwrap();
        buffer.append(b"data").unwrap();

        buffer.free();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 0);

        // Still usable afterwards.
        buffer.append(b"again").unwrap();
        assert_eq!(buffer, b"again");
    }

    #[test]
    fn clear_keeps_storage() {
        let mut buffer = ByteBuffer::create(8).unwrap();
        buffer.append(b"data").unwrap();

        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn predicates() {
        let mut buffer = ByteBuffer::create(8).unwrap();
        buffer.append(b"abc").unwrap();

        assert!(buffer.starts_with(b"ab"));
        assert!(buffer.ends_with(b"bc"));
        assert!(!buffer.starts_with(b"abcd"));
        assert!(!buffer.ends_with(b"zabc"));
        assert!(buffer.equals(b"abc"));
        assert!(!buffer.equals(b"ab"));
        assert!(!buffer.equals(b"abcd"));
    }

    #[test]
    fn get_bytes_copies_min_len() {
        let mut buffer = ByteBuffer::create(8).unwrap();
        buffer.append(b"hello").unwrap();

        let mut out = [0_u8; 2];
        assert_eq!(buffer.get_bytes(&mut out), 2);
        assert_eq!(&out, b"he");
    }

    #[test]
    fn reserve_then_commit() {
        let mut buffer = ByteBuffer::create(2).unwrap();
        buffer.append(b"ab").unwrap();

        buffer.reserve(3).unwrap();
        assert!(buffer.remaining_capacity() >= 3);

        buffer.unfilled_mut()[..3].copy_from_slice(b"cde");
        buffer.commit(3);

        assert_eq!(buffer, b"abcde");
    }

    #[test]
    fn reserve_overflow_leaves_buffer_untouched() {
        let mut buffer = ByteBuffer::create(4).unwrap();
        buffer.append(b"abc").unwrap();

        let error = buffer.reserve(usize::MAX).unwrap_err();

        assert!(error.is_allocation_failure());
        assert_eq!(buffer, b"abc");
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn reserve_beyond_allocator_limit_leaves_buffer_untouched() {
        let mut buffer = ByteBuffer::create(4).unwrap();
        buffer.append(b"abc").unwrap();

        // Representable by the growth policy but larger than any allocation may be.
        let error = buffer.reserve(usize::MAX / 4).unwrap_err();

        assert!(matches!(error, Error::AllocationFailure { source: Some(_), .. }));
        assert_eq!(buffer, b"abc");
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    #[should_panic]
    fn commit_past_capacity_panics() {
        let mut buffer = ByteBuffer::create(2).unwrap();
        buffer.commit(3);
    }

    #[test]
    fn grown_capacity_policy() {
        assert_eq!(grown_capacity(0, 1), Some(2));
        assert_eq!(grown_capacity(1, 2), Some(4));
        assert_eq!(grown_capacity(100, 101), Some(202));
        assert_eq!(grown_capacity(100, 30), Some(200));
        assert_eq!(grown_capacity(usize::MAX, 1), None);
        assert_eq!(grown_capacity(1, usize::MAX), None);
    }

    #[test]
    fn debug_shows_escaped_data() {
        let mut buffer = ByteBuffer::create(4).unwrap();
        buffer.append(b"a\r\n").unwrap();

        let debug = format!("{buffer:?}");

        assert!(debug.contains(r#"b"a\r\n""#), "{debug}");
        assert!(debug.contains("capacity: 4"), "{debug}");
    }
}
