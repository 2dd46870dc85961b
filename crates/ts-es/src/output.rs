//! Sink side of the reader contract.
//!
//! A demultiplexer owns one [`ExtractorOutput`]. Readers register their
//! tracks with it and keep the returned [`TrackOutput`] handle for every
//! later emission.

use bytes::Bytes;

use crate::Result;
use crate::format::{BufferFlags, CryptoData, Format, TrackType};

/// Receives the tracks discovered in a stream
pub trait ExtractorOutput {
    /// Registers the track with the given id and returns its output handle.
    fn track(&mut self, id: u32, track_type: TrackType) -> Box<dyn TrackOutput>;

    /// Signals that every track has been registered.
    fn end_tracks(&mut self);
}

/// Receives the format and samples of a single track
pub trait TrackOutput: Send {
    /// Publishes the track's format.
    fn format(&mut self, format: Format) -> Result<()>;

    /// Appends sample bytes. Calls arrive in stream order.
    fn sample_data(&mut self, data: Bytes) -> Result<()>;

    /// Commits a sample made of previously appended bytes.
    ///
    /// The sample is the `size` bytes that end `offset` bytes before the end
    /// of the data appended so far.
    fn sample_metadata(
        &mut self,
        time_us: i64,
        flags: BufferFlags,
        size: usize,
        offset: usize,
        crypto_data: Option<CryptoData>,
    ) -> Result<()>;
}
