use std::collections::TryReserveError;

use thiserror::Error;


/// A fixed-capacity byte buffer which positional reads write into.
///
/// The buffer owns exactly [`capacity`] bytes of backing storage, of which the first [`len`]
/// bytes are occupied. A [`RandomAccessStream`] fills the backing storage through
/// [`mem_block_mut`] and then records how many bytes it wrote with [`set_len`].
///
/// The buffer is owned by whoever performs the read. A stream only borrows it for the duration
/// of a single call, so one buffer can be reused for any number of reads without reallocating.
///
/// [`capacity`]: Buffer::capacity
/// [`len`]: Buffer::len
/// [`mem_block_mut`]: Buffer::mem_block_mut
/// [`set_len`]: Buffer::set_len
/// [`RandomAccessStream`]: crate::RandomAccessStream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    mem: Box<[u8]>,
    len: usize,
}

impl Buffer {
    /// The largest capacity a `Buffer` may have.
    ///
    /// Read lengths are given as an `i32`, so any storage beyond `i32::MAX` bytes could never
    /// be filled.
    #[expect(
        clippy::as_conversions,
        reason = "`i32::MAX` is nonnegative and fits in a `usize` on every supported target",
    )]
    pub const MAX_CAPACITY: usize = i32::MAX as usize;

    /// Allocate a buffer with exactly `capacity` bytes of zeroed backing storage, and a length
    /// of zero.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero, if it exceeds [`Buffer::MAX_CAPACITY`], or if the
    /// allocation itself fails.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        if capacity > Self::MAX_CAPACITY {
            return Err(BufferError::CapacityTooLarge(capacity));
        }

        let mut mem = Vec::new();
        mem.try_reserve_exact(capacity)?;
        mem.resize(capacity, 0);

        Ok(Self {
            mem: mem.into_boxed_slice(),
            len: 0,
        })
    }

    /// The number of bytes of backing storage, fixed when the buffer was created.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.mem.len()
    }

    /// The number of occupied bytes at the start of the backing storage.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the number of occupied bytes.
    ///
    /// This is normally only called by a [`RandomAccessStream`] after it has written into
    /// [`mem_block_mut`].
    ///
    /// # Panics
    /// Panics if `len` exceeds [`capacity`]. Exceeding the capacity is a bug in the caller,
    /// not a condition to recover from.
    ///
    /// [`RandomAccessStream`]: crate::RandomAccessStream
    /// [`mem_block_mut`]: Buffer::mem_block_mut
    /// [`capacity`]: Buffer::capacity
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.capacity(),
            "attempted to set the length of a Buffer to {len}, which exceeds its capacity of {}",
            self.capacity(),
        );
        self.len = len;
    }

    /// Mark the buffer as holding no bytes. The backing storage is left as-is.
    #[inline]
    pub const fn clear(&mut self) {
        self.len = 0;
    }

    /// The occupied bytes, `len()`-many in total.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        #[expect(clippy::indexing_slicing, reason = "`self.len <= self.mem.len()` is an invariant")]
        &self.mem[..self.len]
    }

    /// The entire backing storage, `capacity()`-many bytes in total.
    ///
    /// Bytes past [`len`] are unspecified.
    ///
    /// [`len`]: Buffer::len
    #[inline]
    #[must_use]
    pub fn mem_block(&self) -> &[u8] {
        &self.mem
    }

    /// Mutable access to the entire backing storage, `capacity()`-many bytes in total.
    ///
    /// Writing through this slice does not change [`len`]; follow up with [`set_len`].
    ///
    /// [`len`]: Buffer::len
    /// [`set_len`]: Buffer::set_len
    #[inline]
    #[must_use]
    pub fn mem_block_mut(&mut self) -> &mut [u8] {
        &mut self.mem
    }
}

/// An error from [`Buffer::new`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("a Buffer must have a nonzero capacity")]
    ZeroCapacity,
    #[error("a Buffer capacity of {0} bytes exceeds the maximum of `i32::MAX` bytes")]
    CapacityTooLarge(usize),
    #[error("could not allocate the backing storage of a Buffer: {0}")]
    Allocation(#[from] TryReserveError),
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn new_buffer_is_empty() {
        let buffer = Buffer::new(42).unwrap();
        assert_eq!(buffer.capacity(), 42);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert!(buffer.as_slice().is_empty());
        assert_eq!(buffer.mem_block().len(), 42);
    }

    #[test]
    fn rejected_capacities() {
        assert_eq!(Buffer::new(0), Err(BufferError::ZeroCapacity));
        assert_eq!(
            Buffer::new(Buffer::MAX_CAPACITY + 1),
            Err(BufferError::CapacityTooLarge(Buffer::MAX_CAPACITY + 1)),
        );
        assert!(matches!(Buffer::new(usize::MAX), Err(BufferError::CapacityTooLarge(_))));
    }

    #[test]
    fn set_len_exposes_written_bytes() {
        let mut buffer = Buffer::new(8).unwrap();
        buffer.mem_block_mut()[..3].copy_from_slice(b"abc");
        assert!(buffer.as_slice().is_empty());

        buffer.set_len(3);
        assert_eq!(buffer.as_slice(), b"abc");

        buffer.set_len(8);
        assert_eq!(buffer.len(), buffer.capacity());

        buffer.clear();
        assert!(buffer.is_empty());
        // Clearing does not touch the backing storage.
        assert_eq!(&buffer.mem_block()[..3], b"abc");
    }

    #[test]
    #[should_panic]
    fn set_len_past_capacity() {
        let mut buffer = Buffer::new(4).unwrap();
        buffer.set_len(5);
    }
}
