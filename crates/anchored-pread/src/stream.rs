use std::{io::Result as IoResult, rc::Rc, sync::Arc};

use tracing::Level;

use crate::{buffer::Buffer, options::StreamOptions};
use crate::{
    error::{InvalidArgument, StreamError},
    random_access::{RandomAccess, read_full_at},
};


/// A fixed-size, addressable range of bytes which can be read at arbitrary offsets by any number
/// of threads at once.
///
/// Implementations hold no read cursor: every call names its own offset, and the result depends
/// only on that call's arguments and on the contents of the underlying source.
pub trait RandomAccessStream {
    /// Positional read: read up to `len` bytes starting at `offset` into `buffer`.
    ///
    /// Arguments are validated before the underlying source is touched:
    /// - a negative `offset` is an [`InvalidArgument::NegativeOffset`] error,
    /// - a negative `len` is an [`InvalidArgument::NegativeLength`] error,
    /// - a `len` greater than `buffer.capacity()` is an [`InvalidArgument::BufferTooSmall`] error.
    ///
    /// In each of those cases, `buffer` is left untouched.
    ///
    /// If `offset` is at or past [`size`] (including when the stream is empty), the length of
    /// `buffer` is set to zero and [`StreamError::OutOfRange`] is returned.
    ///
    /// Otherwise, `min(len, size - offset)` bytes are read into the start of `buffer`'s backing
    /// storage, and the length of `buffer` is set to the number of bytes read. Asking for more
    /// bytes than remain is not an error.
    ///
    /// # Errors
    ///
    /// See above. Failures of the underlying source are returned as [`StreamError::Io`], with
    /// the length of `buffer` set to zero.
    ///
    /// [`size`]: RandomAccessStream::size
    fn pread(&self, offset: i64, len: i32, buffer: &mut Buffer) -> Result<(), StreamError>;

    /// The total number of addressable bytes. Performs no I/O.
    fn size(&self) -> u64;
}

macro_rules! forward_random_access_stream {
    ($($pointer:ty),* $(,)?) => {
        $(
            impl<S: RandomAccessStream + ?Sized> RandomAccessStream for $pointer {
                #[inline]
                fn pread(
                    &self,
                    offset: i64,
                    len:    i32,
                    buffer: &mut Buffer,
                ) -> Result<(), StreamError> {
                    S::pread(self, offset, len, buffer)
                }

                #[inline]
                fn size(&self) -> u64 {
                    S::size(self)
                }
            }
        )*
    };
}

forward_random_access_stream!(&S, Box<S>, Rc<S>, Arc<S>);

/// A [`RandomAccessStream`] over an already-open [`RandomAccess`] source, usually a
/// [`std::fs::File`].
///
/// # Ownership of the source
/// The stream does not open or close anything itself. Whoever opened the file decides how long
/// it lives, through the choice of `Source`:
/// - `&File` borrows the file, and the borrow checker keeps it open for as long as the stream
///   exists. Closing the file is left to its owner.
/// - `Arc<File>` shares ownership; the file is closed when the last handle is dropped.
/// - `File` hands ownership to the stream; dropping the stream closes the file.
///
/// # Size
/// The size of the stream is measured once, when the stream is constructed, and never
/// re-queried. If the file is later extended, the new bytes are not addressable through this
/// stream; if it is truncated, reads stop at the real end of data (see [`pread`]).
///
/// # Concurrency
/// Reads go through [`RandomAccess::read_at`], which takes the offset explicitly, so the stream
/// is safe to share across threads (it is `Sync` whenever `Source` is) without any locking.
///
/// [`pread`]: RandomAccessStream::pread
#[derive(Debug, Clone)]
pub struct FileRandomAccessStream<Source> {
    source:            Source,
    size:              u64,
    retry_interrupted: bool,
}

impl<Source: RandomAccess> FileRandomAccessStream<Source> {
    /// Wrap `source`, measuring its size with [`RandomAccess::byte_len`].
    ///
    /// # Errors
    ///
    /// Propagates any error from querying the size of `source`.
    #[inline]
    pub fn new(source: Source) -> IoResult<Self> {
        Self::with_options(source, StreamOptions::default())
    }

    /// Wrap `source` with the given options.
    ///
    /// If [`StreamOptions::size_override`] is set, the source is not queried at all.
    ///
    /// # Errors
    ///
    /// Propagates any error from querying the size of `source`.
    pub fn with_options(source: Source, options: StreamOptions) -> IoResult<Self> {
        let size = match options.size_override {
            Some(size) => size,
            None       => source.byte_len()?,
        };

        tracing::event!(Level::TRACE, "opened a FileRandomAccessStream of {size} bytes");

        Ok(Self {
            source,
            size,
            retry_interrupted: options.retry_interrupted,
        })
    }
}

impl<Source> FileRandomAccessStream<Source> {
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn into_source(self) -> Source {
        self.source
    }
}

impl<Source: RandomAccess> RandomAccessStream for FileRandomAccessStream<Source> {
    fn pread(&self, offset: i64, len: i32, buffer: &mut Buffer) -> Result<(), StreamError> {
        let Ok(start) = u64::try_from(offset) else {
            return Err(InvalidArgument::NegativeOffset(offset).into());
        };
        let Ok(requested) = usize::try_from(len) else {
            return Err(InvalidArgument::NegativeLength(len).into());
        };
        if requested > buffer.capacity() {
            return Err(InvalidArgument::BufferTooSmall {
                requested,
                capacity: buffer.capacity(),
            }.into());
        }

        if start >= self.size {
            buffer.set_len(0);
            return Err(StreamError::OutOfRange);
        }

        // If the remaining length does not fit in a `usize`, it certainly exceeds `requested`.
        let read_len = usize::try_from(self.size - start)
            .map(|remaining| remaining.min(requested))
            .unwrap_or(requested);

        #[expect(
            clippy::indexing_slicing,
            reason = "`read_len <= requested <= buffer.capacity()`",
        )]
        let dest = &mut buffer.mem_block_mut()[..read_len];

        match read_full_at(&self.source, start, dest, self.retry_interrupted) {
            Ok(0) if read_len > 0 => {
                tracing::event!(
                    Level::DEBUG,
                    "no data at offset {start}, before the end of a stream of {} bytes; \
                     the source may have been truncated",
                    self.size
                );
                buffer.set_len(0);
                Err(StreamError::OutOfRange)
            }
            Ok(bytes_read) => {
                if bytes_read < read_len {
                    tracing::event!(
                        Level::DEBUG,
                        "read {bytes_read} of {read_len} bytes at offset {start} before the \
                         source ran out; the source may have been truncated"
                    );
                }
                buffer.set_len(bytes_read);
                Ok(())
            }
            Err(io_err) => {
                tracing::event!(
                    Level::DEBUG,
                    "positional read of {read_len} bytes at offset {start} failed: {io_err}"
                );
                buffer.set_len(0);
                Err(StreamError::Io(io_err))
            }
        }
    }

    #[inline]
    fn size(&self) -> u64 {
        self.size
    }
}
