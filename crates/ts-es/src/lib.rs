//! Elementary stream readers for MPEG transport streams.
//!
//! A demultiplexer splits the transport stream into PES packets per
//! elementary stream and drives one [`ElementaryStreamReader`] per stream.
//! The reader reassembles samples from the packet payloads, however they are
//! chunked, and emits them to a [`TrackOutput`].
//!
//! [`Id3Reader`] handles timed ID3 metadata (`stream_type` 0x15).

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod capture;
pub mod error;
pub mod format;
pub mod id3;
pub mod output;
pub mod reader;
pub mod stream_type;
pub mod synchsafe;

pub use capture::{CapturedSample, CapturedTrack, CapturingOutput};
pub use error::TsError;
pub use format::{BufferFlags, CryptoData, CryptoMode, Format, TrackType, mime};
pub use id3::{ID3_HEADER_LEN, Id3Header, Id3Reader};
pub use output::{ExtractorOutput, TrackOutput};
pub use reader::{
    DefaultReaderFactory, ElementaryStreamReader, PayloadReaderFlags, TrackIdGenerator, TrackIds,
};
pub use stream_type::StreamType;
pub use synchsafe::{read_synch_safe_u32, write_synch_safe_u32};

/// Result type for elementary stream operations
pub type Result<T> = std::result::Result<T, TsError>;
