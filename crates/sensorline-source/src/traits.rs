use crate::error::Result;

/// A pollable supplier of raw protocol bytes.
///
/// Implementations block for at most their own read timeout. A poll that
/// returns `Ok(0)` means nothing arrived this tick; end of stream is reported
/// as [`SourceError::Closed`](crate::SourceError::Closed).
pub trait SampleSource {
    /// Copy whatever bytes are available into `buf`, returning the count.
    fn poll(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Human-readable description of where the bytes come from.
    fn describe(&self) -> String;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn poll(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).poll(buf)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
