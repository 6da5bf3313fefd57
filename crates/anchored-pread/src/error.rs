use std::io::Error as IoError;

use thiserror::Error;


/// The broad category of a [`StreamError`], for callers which only need to branch on the kind of
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamErrorKind {
    /// The request itself was malformed. Retrying the same request cannot succeed.
    InvalidArgument,
    /// The requested start offset was at or past the end of the stream.
    OutOfRange,
    /// The underlying source failed to read.
    Io,
}

/// An error returned by [`RandomAccessStream::pread`] or [`ChunkReader`].
///
/// [`RandomAccessStream::pread`]: crate::RandomAccessStream::pread
/// [`ChunkReader`]: crate::ChunkReader
#[allow(variant_size_differences, reason = "the error enum shouldn't be hot")]
#[derive(Error, Debug)]
pub enum StreamError {
    /// The offset, length, or buffer of a request was invalid. Detected before the underlying
    /// source is touched, and the output buffer is left unmodified.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    /// The requested offset was at or past the end of the stream.
    ///
    /// A request which starts inside the stream but extends past its end is not an error;
    /// it succeeds with fewer bytes than requested.
    #[error("EOF")]
    OutOfRange,
    /// The underlying source reported an error. Not retried, aside from interrupts.
    #[error("failed to read from the underlying source: {0}")]
    Io(#[from] IoError),
}

impl StreamError {
    #[must_use]
    pub const fn kind(&self) -> StreamErrorKind {
        match self {
            Self::InvalidArgument(_) => StreamErrorKind::InvalidArgument,
            Self::OutOfRange         => StreamErrorKind::OutOfRange,
            Self::Io(_)              => StreamErrorKind::Io,
        }
    }

    /// Whether this error signals the end of the stream.
    #[inline]
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::OutOfRange)
    }
}

/// The ways in which a read request can be malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("read offset {0} is negative")]
    NegativeOffset(i64),
    #[error("read length {0} is negative")]
    NegativeLength(i32),
    #[error("read length {requested} exceeds the buffer capacity of {capacity}")]
    BufferTooSmall {
        requested: usize,
        capacity:  usize,
    },
    /// A [`ChunkReader`] needs to make progress with every chunk.
    ///
    /// [`ChunkReader`]: crate::ChunkReader
    #[error("chunk length {0} is not positive")]
    NonPositiveChunkLength(i32),
}
