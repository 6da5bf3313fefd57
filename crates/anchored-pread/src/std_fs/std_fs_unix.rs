use std::{fs::File, io::Result as IoResult, os::unix::fs::FileExt};

use crate::random_access::RandomAccess;


impl RandomAccess for File {
    /// The file cursor is not affected by (and does not affect) Unix's [`FileExt::read_at`],
    /// which is `pread`, making it threadsafe.
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        FileExt::read_at(self, buf, offset)
    }

    #[inline]
    fn byte_len(&self) -> IoResult<u64> {
        self.metadata().map(|metadata| metadata.len())
    }
}
