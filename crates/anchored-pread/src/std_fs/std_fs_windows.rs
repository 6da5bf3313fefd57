use std::{fs::File, io::Result as IoResult, os::windows::fs::FileExt};

use crate::random_access::RandomAccess;


impl RandomAccess for File {
    /// Windows' [`FileExt::seek_read`] moves the file cursor as a side effect, but its result
    /// never depends on where the cursor was, so concurrent calls cannot observe each other.
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        FileExt::seek_read(self, buf, offset)
    }

    #[inline]
    fn byte_len(&self) -> IoResult<u64> {
        self.metadata().map(|metadata| metadata.len())
    }
}
