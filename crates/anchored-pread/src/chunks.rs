use crate::{buffer::Buffer, stream::RandomAccessStream};
use crate::error::{InvalidArgument, StreamError};


/// Reads a [`RandomAccessStream`] sequentially, in chunks of a fixed length.
///
/// Each `ChunkReader` keeps its own position, so any number of them (on any number of threads)
/// may walk the same stream at once. The stream itself is never given a cursor.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a, S: ?Sized> {
    stream:    &'a S,
    position:  i64,
    chunk_len: i32,
}

impl<'a, S: RandomAccessStream + ?Sized> ChunkReader<'a, S> {
    /// A reader starting at the beginning of `stream`.
    #[inline]
    #[must_use]
    pub const fn new(stream: &'a S, chunk_len: i32) -> Self {
        Self::starting_at(stream, 0, chunk_len)
    }

    #[inline]
    #[must_use]
    pub const fn starting_at(stream: &'a S, position: i64, chunk_len: i32) -> Self {
        Self {
            stream,
            position,
            chunk_len,
        }
    }

    /// The offset the next chunk will be read from.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> i64 {
        self.position
    }

    /// Read the next chunk into `buffer`, and return the bytes read.
    ///
    /// Returns `Ok(None)` once the end of the stream is reached, in which case `buffer` is left
    /// with a length of zero. The final chunk before the end may be shorter than the chunk
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NonPositiveChunkLength`] if the chunk length is not positive.
    /// Any error from [`RandomAccessStream::pread`] other than end-of-stream is returned
    /// unchanged, and the position is not advanced.
    pub fn next_chunk<'b>(
        &mut self,
        buffer: &'b mut Buffer,
    ) -> Result<Option<&'b [u8]>, StreamError> {
        if self.chunk_len <= 0 {
            return Err(InvalidArgument::NonPositiveChunkLength(self.chunk_len).into());
        }

        match self.stream.pread(self.position, self.chunk_len, buffer) {
            Ok(()) if buffer.is_empty() => Ok(None),
            Ok(()) => {
                let advance = i64::try_from(buffer.len()).unwrap_or(i64::MAX);
                self.position = self.position.saturating_add(advance);
                Ok(Some(buffer.as_slice()))
            }
            Err(StreamError::OutOfRange) => Ok(None),
            Err(other_err) => Err(other_err),
        }
    }

    /// Append every remaining chunk to `out`, and return the number of bytes appended.
    ///
    /// # Errors
    ///
    /// See [`ChunkReader::next_chunk`]. Bytes appended before an error remain in `out`.
    pub fn read_to_end(
        &mut self,
        buffer: &mut Buffer,
        out:    &mut Vec<u8>,
    ) -> Result<usize, StreamError> {
        let start_len = out.len();

        while let Some(chunk) = self.next_chunk(buffer)? {
            out.extend_from_slice(chunk);
        }

        Ok(out.len() - start_len)
    }
}


#[cfg(test)]
mod tests {
    use crate::{error::StreamErrorKind, stream::FileRandomAccessStream};
    use super::*;


    fn stream_of(len: u8) -> FileRandomAccessStream<Vec<u8>> {
        FileRandomAccessStream::new((0..len).collect()).unwrap()
    }

    #[test]
    fn chunks_until_eof() {
        let stream = stream_of(10);
        let mut buffer = Buffer::new(4).unwrap();
        let mut reader = ChunkReader::new(&stream, 4);

        assert_eq!(reader.next_chunk(&mut buffer).unwrap(), Some([0, 1, 2, 3].as_slice()));
        assert_eq!(reader.next_chunk(&mut buffer).unwrap(), Some([4, 5, 6, 7].as_slice()));
        assert_eq!(reader.next_chunk(&mut buffer).unwrap(), Some([8, 9].as_slice()));
        assert_eq!(reader.position(), 10);

        assert_eq!(reader.next_chunk(&mut buffer).unwrap(), None);
        assert_eq!(buffer.len(), 0);
        // Still at the end.
        assert_eq!(reader.next_chunk(&mut buffer).unwrap(), None);
        assert_eq!(reader.position(), 10);
    }

    #[test]
    fn read_to_end_from_offset() {
        let stream = stream_of(50);
        let mut buffer = Buffer::new(7).unwrap();
        let mut out = vec![255];

        let appended = ChunkReader::starting_at(&stream, 20, 7)
            .read_to_end(&mut buffer, &mut out)
            .unwrap();

        assert_eq!(appended, 30);
        assert_eq!(out[0], 255);
        assert!(out[1..].iter().copied().eq(20..50));
    }

    #[test]
    fn empty_stream() {
        let stream = stream_of(0);
        let mut buffer = Buffer::new(1).unwrap();
        let mut out = Vec::new();

        assert_eq!(ChunkReader::new(&stream, 1).read_to_end(&mut buffer, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_chunks() {
        let stream = stream_of(10);
        let mut buffer = Buffer::new(4).unwrap();

        for chunk_len in [0, -3] {
            let err = ChunkReader::new(&stream, chunk_len).next_chunk(&mut buffer).unwrap_err();
            assert!(matches!(
                err,
                StreamError::InvalidArgument(InvalidArgument::NonPositiveChunkLength(_)),
            ));
        }

        // Longer than the buffer.
        let err = ChunkReader::new(&stream, 5).next_chunk(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), StreamErrorKind::InvalidArgument);

        let mut reader = ChunkReader::starting_at(&stream, -1, 4);
        let err = reader.next_chunk(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), StreamErrorKind::InvalidArgument);
        assert_eq!(reader.position(), -1);
    }

    #[test]
    fn works_over_trait_objects() {
        let stream = stream_of(6);
        let dyn_stream: &dyn RandomAccessStream = &stream;
        let mut buffer = Buffer::new(6).unwrap();
        let mut out = Vec::new();

        ChunkReader::new(dyn_stream, 6).read_to_end(&mut buffer, &mut out).unwrap();
        assert_eq!(out, [0, 1, 2, 3, 4, 5]);
    }
}
