/// Options for constructing a [`FileRandomAccessStream`].
///
/// [`FileRandomAccessStream`]: crate::FileRandomAccessStream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Whether reads that fail with [`ErrorKind::Interrupted`] are retried.
    ///
    /// Defaults to `true`. If `false`, interrupts are reported as [`StreamError::Io`].
    ///
    /// [`ErrorKind::Interrupted`]: std::io::ErrorKind::Interrupted
    /// [`StreamError::Io`]: crate::StreamError::Io
    pub retry_interrupted: bool,
    /// The length of the addressable range, if already known.
    ///
    /// If `None` (the default), the length is queried from the source with
    /// [`RandomAccess::byte_len`] when the stream is constructed. Either way, the length is fixed
    /// for the lifetime of the stream.
    ///
    /// [`RandomAccess::byte_len`]: crate::RandomAccess::byte_len
    pub size_override:     Option<u64>,
}

impl StreamOptions {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            retry_interrupted: true,
            size_override:     None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_retry_interrupted(mut self, retry_interrupted: bool) -> Self {
        self.retry_interrupted = retry_interrupted;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size_override = Some(size);
        self
    }
}

impl Default for StreamOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
