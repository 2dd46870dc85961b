//! The contract between a transport stream demultiplexer and the readers that
//! turn one elementary stream's PES payloads into samples.

use bitflags::bitflags;
use bytes::Bytes;

use crate::Result;
use crate::format::mime;
use crate::id3::Id3Reader;
use crate::output::ExtractorOutput;
use crate::stream_type::StreamType;

bitflags! {
    /// Attributes of a PES packet reported by the demultiplexer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PayloadReaderFlags: u8 {
        /// The adaptation field marked the packet as a random access point.
        const RANDOM_ACCESS_INDICATOR = 1 << 1;
        /// A new access unit starts at the first payload byte.
        const DATA_ALIGNMENT_INDICATOR = 1 << 2;
    }
}

/// Ids allocated for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIds {
    pub track_id: u32,
    pub format_id: String,
}

/// Allocates monotonically increasing track ids for the readers of a program
#[derive(Debug, Clone)]
pub struct TrackIdGenerator {
    format_id_prefix: String,
    first_track_id: u32,
    track_id_increment: u32,
    last_track_id: Option<u32>,
}

impl TrackIdGenerator {
    pub fn new(first_track_id: u32, track_id_increment: u32) -> Self {
        Self {
            format_id_prefix: String::new(),
            first_track_id,
            track_id_increment,
            last_track_id: None,
        }
    }

    /// Creates a generator whose format ids are prefixed with `"{program_number}/"`.
    pub fn with_program(
        program_number: u16,
        first_track_id: u32,
        track_id_increment: u32,
    ) -> Self {
        Self {
            format_id_prefix: format!("{program_number}/"),
            ..Self::new(first_track_id, track_id_increment)
        }
    }

    /// Allocates the next pair of ids.
    pub fn generate_new_id(&mut self) -> TrackIds {
        let track_id = match self.last_track_id {
            Some(last) => last.wrapping_add(self.track_id_increment),
            None => self.first_track_id,
        };
        self.last_track_id = Some(track_id);

        TrackIds {
            track_id,
            format_id: format!("{}{}", self.format_id_prefix, track_id),
        }
    }
}

/// A per-stream-type parser driven by the demultiplexer.
///
/// Calls arrive in this order: [`create_tracks`](Self::create_tracks) once,
/// then for each PES packet [`packet_started`](Self::packet_started), zero or
/// more [`consume`](Self::consume) calls and
/// [`packet_finished`](Self::packet_finished). [`seek`](Self::seek) may be
/// called at any point.
pub trait ElementaryStreamReader: Send {
    /// Drops any partially read sample.
    fn seek(&mut self);

    /// Registers this reader's tracks with `output`.
    fn create_tracks(
        &mut self,
        output: &mut dyn ExtractorOutput,
        id_generator: &mut TrackIdGenerator,
    ) -> Result<()>;

    /// Signals the start of a PES packet.
    fn packet_started(&mut self, pes_time_us: i64, flags: PayloadReaderFlags);

    /// Consumes the next bytes of the current packet's payload.
    ///
    /// The reader advances `data` past the bytes it used.
    fn consume(&mut self, data: &mut Bytes) -> Result<()>;

    /// Signals that the current packet has no more payload.
    fn packet_finished(&mut self, is_end_of_input: bool) -> Result<()>;
}

/// Picks the reader for an elementary stream from its PMT stream type
#[derive(Debug, Clone)]
pub struct DefaultReaderFactory {
    container_mime_type: String,
}

impl Default for DefaultReaderFactory {
    fn default() -> Self {
        Self::new(mime::VIDEO_MP2T)
    }
}

impl DefaultReaderFactory {
    pub fn new(container_mime_type: impl Into<String>) -> Self {
        Self {
            container_mime_type: container_mime_type.into(),
        }
    }

    /// Returns a reader for `stream_type`, or `None` if the type is not handled.
    pub fn create_reader(
        &self,
        stream_type: StreamType,
    ) -> Option<Box<dyn ElementaryStreamReader>> {
        match stream_type {
            StreamType::MetadataPes => {
                Some(Box::new(Id3Reader::new(self.container_mime_type.as_str())))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CapturingOutput;
    use crate::format::TrackType;

    #[test]
    fn test_track_id_generator_sequence() {
        let mut ids = TrackIdGenerator::new(0x100, 1);
        assert_eq!(
            ids.generate_new_id(),
            TrackIds {
                track_id: 0x100,
                format_id: "256".to_string()
            }
        );
        assert_eq!(ids.generate_new_id().track_id, 0x101);
        assert_eq!(ids.generate_new_id().track_id, 0x102);
    }

    #[test]
    fn test_track_id_generator_program_prefix() {
        let mut ids = TrackIdGenerator::with_program(3, 10, 8192);
        assert_eq!(ids.generate_new_id().format_id, "3/10");

        let next = ids.generate_new_id();
        assert_eq!(next.track_id, 8202);
        assert_eq!(next.format_id, "3/8202");
    }

    #[test]
    fn test_factory_creates_id3_reader_for_metadata_pes() {
        let factory = DefaultReaderFactory::default();
        let mut reader = factory
            .create_reader(StreamType::from(0x15))
            .expect("metadata PES should have a reader");

        let mut output = CapturingOutput::new();
        let mut ids = TrackIdGenerator::new(1, 1);
        reader.create_tracks(&mut output, &mut ids).unwrap();

        let track = output.captured_track(1).unwrap();
        assert_eq!(track.track_type, TrackType::Metadata);
    }

    #[test]
    fn test_factory_ignores_other_stream_types() {
        let factory = DefaultReaderFactory::new(mime::VIDEO_MP2T);
        assert!(factory.create_reader(StreamType::H264).is_none());
        assert!(factory.create_reader(StreamType::AdtsAac).is_none());
        assert!(factory.create_reader(StreamType::Unknown(0xC0)).is_none());
    }
}
