//! Threadsafe positional reads over an already-open file.
//!
//! A [`FileRandomAccessStream`] wraps some [`RandomAccess`] source (usually a borrowed or shared
//! [`std::fs::File`]) and serves [`pread`] requests from any number of threads at once. Each
//! request names its own offset, so no file cursor is shared between callers. Bytes are written
//! into a caller-owned [`Buffer`], which can be reused across calls without reallocating.
//!
//! [`pread`]: RandomAccessStream::pread

// Caller-owned output buffers
mod buffer;
// The threadsafe positional-read primitive, and impls for in-memory sources
mod random_access;
// Error taxonomy for stream reads
mod error;
// Options for constructing a stream
mod options;
// The stream itself
mod stream;
// Sequential, per-caller iteration over a stream
mod chunks;

// Currently, only unix and windows are supported for `std::fs::File`.
#[cfg(any(unix, windows))]
mod std_fs;


pub use self::{
    buffer::{Buffer, BufferError},
    chunks::ChunkReader,
    error::{InvalidArgument, StreamError, StreamErrorKind},
    options::StreamOptions,
    random_access::RandomAccess,
    stream::{FileRandomAccessStream, RandomAccessStream},
};
