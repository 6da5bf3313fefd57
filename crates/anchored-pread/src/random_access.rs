use std::{rc::Rc, sync::Arc};
use std::io::{Error as IoError, ErrorKind, Result as IoResult};


/// A readable source of bytes which can be read at arbitrary offsets, from any number of
/// threads at once.
///
/// Using [`Seek`] and [`Read`] is not threadsafe in the logical sense, since a single file
/// cursor would be shared by every thread, and changed by every seek or read. A thread
/// performing a seek followed by a read could be interrupted, with a different thread seeking
/// elsewhere in the file in the meantime.
///
/// Implementations of [`RandomAccess`] are therefore required to be logically threadsafe:
/// the results of [`RandomAccess::read_at`] must be correct when called by any number of threads.
/// For [`std::fs::File`], this relies on operating system-specific support for positional reads.
///
/// [`Read`]: std::io::Read
/// [`Seek`]: std::io::Seek
pub trait RandomAccess {
    /// Read up to `buf.len()`-many bytes from the source, starting at `offset`.
    ///
    /// On success, the number of bytes read is returned; this has the same semantics as the
    /// return value of [`read`]. In particular, `Ok(0)` is returned at or past the end of the
    /// source.
    ///
    /// [`read`]: std::io::Read::read
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize>;

    /// The current length of the source, in bytes.
    ///
    /// For a file, this queries the file's metadata, and so may change over time if the file is
    /// modified by someone else.
    fn byte_len(&self) -> IoResult<u64>;

    /// Attempt to read exactly `buf.len()`-many bytes from the source, starting at `offset`.
    ///
    /// The function repeatedly calls [`read_at`] until either `buf.len()`-many bytes have been
    /// read, or an error condition is met. Calls to [`read_at`] are retried when
    /// [`ErrorKind::Interrupted`] is returned.
    ///
    /// An error is returned both when [`read_at`] fails with a non-[`ErrorKind::Interrupted`]
    /// error, as well as when end-of-file is reached before `buf.len()`-many bytes are read.
    /// On error, the contents of `buf` are unspecified.
    ///
    /// [`read_at`]: RandomAccess::read_at
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<()> {
        let bytes_read = read_full_at(self, offset, buf, true)?;

        if bytes_read == buf.len() {
            Ok(())
        } else {
            Err(ErrorKind::UnexpectedEof.into())
        }
    }
}

/// Call [`RandomAccess::read_at`] until `buf` is full or the source runs out of data, and return
/// the number of bytes read.
///
/// If `retry_interrupted` is true, [`ErrorKind::Interrupted`] errors are retried; otherwise, they
/// are returned like any other error.
pub(crate) fn read_full_at<R: RandomAccess + ?Sized>(
    source:            &R,
    offset:            u64,
    buf:               &mut [u8],
    retry_interrupted: bool,
) -> IoResult<usize> {
    if u64::try_from(buf.len()).is_err() {
        return Err(IoError::other(
            "cannot read into a buffer with a length of 16 binary exabytes (EiB) or more",
        ));
    }

    let mut bytes_read = 0_usize;

    while bytes_read < buf.len() {
        // By the above check on `buf.len()`, and since `bytes_read` is smaller,
        // we know that `bytes_read` fits in a `u64`.
        #[expect(
            clippy::as_conversions,
            reason = "`bytes_read` is known to fit in u64",
        )]
        let bytes_read_u64 = bytes_read as u64;

        let Some(position) = offset.checked_add(bytes_read_u64) else {
            // Nothing can be stored past `u64::MAX`.
            break;
        };

        #[expect(
            clippy::indexing_slicing,
            reason = "`bytes_read < buf.len()`, so this does not panic",
        )]
        match source.read_at(position, &mut buf[bytes_read..]) {
            Ok(0) => break,
            Ok(additional_bytes) => {
                bytes_read += additional_bytes;
            }
            Err(err) if retry_interrupted && err.kind() == ErrorKind::Interrupted => {}
            Err(other_err) => return Err(other_err),
        }
    }

    Ok(bytes_read)
}

/// Copy from `source[offset..]` into `buf`, returning the number of bytes copied.
fn read_from_slice(source: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(offset) = usize::try_from(offset) else {
        // If the offset is larger than `usize::MAX`, then it must be well past the end of
        // an in-memory slice.
        return 0;
    };

    let Some(source) = source.get(offset..) else {
        // There's no work to do. We read zero bytes.
        return 0;
    };

    let read_len = source.len().min(buf.len());
    #[expect(
        clippy::indexing_slicing,
        reason = "`read_len` is at most either slice's length",
    )]
    buf[..read_len].copy_from_slice(&source[..read_len]);

    read_len
}

impl RandomAccess for [u8] {
    /// Reads from the slice, beginning at `offset`. Never fails.
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        Ok(read_from_slice(self, offset, buf))
    }

    #[inline]
    fn byte_len(&self) -> IoResult<u64> {
        u64::try_from(self.len()).map_err(IoError::other)
    }
}

impl RandomAccess for Vec<u8> {
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        self.as_slice().read_at(offset, buf)
    }

    #[inline]
    fn byte_len(&self) -> IoResult<u64> {
        self.as_slice().byte_len()
    }
}

macro_rules! forward_random_access {
    ($($pointer:ty),* $(,)?) => {
        $(
            impl<R: RandomAccess + ?Sized> RandomAccess for $pointer {
                #[inline]
                fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
                    R::read_at(self, offset, buf)
                }

                #[inline]
                fn byte_len(&self) -> IoResult<u64> {
                    R::byte_len(self)
                }

                #[inline]
                fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<()> {
                    R::read_exact_at(self, offset, buf)
                }
            }
        )*
    };
}

forward_random_access!(&R, Box<R>, Rc<R>, Arc<R>);


#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;


    /// Hands out at most `step` bytes per call, and fails with `Interrupted` every other call.
    struct Flaky {
        data:        Vec<u8>,
        step:        usize,
        interrupt:   Cell<bool>,
    }

    impl RandomAccess for Flaky {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
            let interrupt = self.interrupt.replace(!self.interrupt.get());
            if interrupt {
                return Err(ErrorKind::Interrupted.into());
            }
            let len = buf.len().min(self.step);
            self.data.read_at(offset, &mut buf[..len])
        }

        fn byte_len(&self) -> IoResult<u64> {
            self.data.byte_len()
        }
    }

    #[test]
    fn slice_reads() {
        let data = b"hello world".as_slice();
        let mut buf = [0; 5];

        assert_eq!(data.read_at(0, &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");

        assert_eq!(data.read_at(8, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"rld");

        assert_eq!(data.read_at(11, &mut buf).unwrap(), 0);
        assert_eq!(data.read_at(u64::MAX, &mut buf).unwrap(), 0);
        assert_eq!(data.byte_len().unwrap(), 11);
    }

    #[test]
    fn read_exact_at_retries_and_detects_eof() {
        let flaky = Flaky {
            data:      (0..100).collect(),
            step:      7,
            interrupt: Cell::new(true),
        };

        let mut buf = [0; 30];
        flaky.read_exact_at(50, &mut buf).unwrap();
        assert!(buf.iter().copied().eq(50..80));

        let err = flaky.read_exact_at(90, &mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn interrupts_not_retried_when_disabled() {
        let flaky = Flaky {
            data:      vec![1; 10],
            step:      10,
            interrupt: Cell::new(true),
        };

        let mut buf = [0; 10];
        let err = read_full_at(&flaky, 0, &mut buf, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Interrupted);
        assert_eq!(read_full_at(&flaky, 0, &mut buf, false).unwrap(), 10);
    }

    #[test]
    fn forwarded_through_pointers() {
        let data = Arc::new(vec![3_u8; 4]);
        let mut buf = [0; 8];
        assert_eq!(data.read_at(1, &mut buf).unwrap(), 3);
        assert_eq!(data.byte_len().unwrap(), 4);

        let boxed: Box<dyn RandomAccess> = Box::new(vec![9_u8; 2]);
        assert_eq!(boxed.read_at(0, &mut buf).unwrap(), 2);
    }
}
