//! Timed ID3 metadata carried in PES packets.
//!
//! Every data-aligned PES packet on an ID3 stream starts a complete ID3v2
//! tag. The tag is forwarded to the track output unchanged, header included,
//! and committed as one key-frame sample once all of its bytes have arrived.

use std::cmp::min;
use std::mem;

use bytes::{Buf, Bytes};
use tracing::{debug, trace, warn};

use crate::format::{BufferFlags, Format, TrackType, mime};
use crate::output::{ExtractorOutput, TrackOutput};
use crate::reader::{ElementaryStreamReader, PayloadReaderFlags, TrackIdGenerator};
use crate::synchsafe::{read_synch_safe_u32, write_synch_safe_u32};
use crate::{Result, TsError};

/// Length of the fixed ID3v2 tag header.
pub const ID3_HEADER_LEN: usize = 10;

/// Magic bytes opening every ID3v2 tag.
pub const ID3_MAGIC: &[u8; 3] = b"ID3";

const FLAG_FOOTER_PRESENT: u8 = 0x10;

/// ID3v2 tag header, 10 bytes in total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3Header {
    pub major_version: u8,
    pub revision: u8,
    pub flags: u8,
    /// Tag size excluding the header, decoded from its synch-safe form
    pub size: u32,
}

impl Id3Header {
    /// Parses the header from the first 10 bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < ID3_HEADER_LEN {
            return Err(TsError::InsufficientData {
                expected: ID3_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut reader = &data[..ID3_HEADER_LEN];
        let mut magic = [0u8; 3];
        reader.copy_to_slice(&mut magic);
        if &magic != ID3_MAGIC {
            return Err(TsError::InvalidId3Header(magic));
        }

        let major_version = reader.get_u8();
        let revision = reader.get_u8();
        let flags = reader.get_u8();
        let mut size = [0u8; 4];
        reader.copy_to_slice(&mut size);

        Ok(Id3Header {
            major_version,
            revision,
            flags,
            size: read_synch_safe_u32(size)?,
        })
    }

    /// Total tag length, header included.
    ///
    /// A footer, if flagged, is not counted.
    pub fn tag_len(&self) -> usize {
        ID3_HEADER_LEN + self.size as usize
    }

    pub fn has_footer(&self) -> bool {
        self.flags & FLAG_FOOTER_PRESENT != 0
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> Result<[u8; ID3_HEADER_LEN]> {
        let size = write_synch_safe_u32(self.size)?;
        let mut bytes = [0u8; ID3_HEADER_LEN];
        bytes[..3].copy_from_slice(ID3_MAGIC);
        bytes[3] = self.major_version;
        bytes[4] = self.revision;
        bytes[5] = self.flags;
        bytes[6..].copy_from_slice(&size);
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// No tag in progress.
    Idle,
    /// The current tag had an invalid header; wait for the next aligned packet.
    AwaitingAlignment,
    /// `filled` bytes of the header are in the scratch buffer.
    AccumulatingHeader { time_us: i64, filled: usize },
    /// The header was forwarded; `consumed` of `total` tag bytes are written.
    CopyingPayload {
        time_us: i64,
        total: usize,
        consumed: usize,
    },
}

/// Reassembles ID3 tags from a metadata PES stream
pub struct Id3Reader {
    container_mime_type: String,
    output: Option<Box<dyn TrackOutput>>,
    header: [u8; ID3_HEADER_LEN],
    state: ReaderState,
}

impl Default for Id3Reader {
    fn default() -> Self {
        Self::new(mime::VIDEO_MP2T)
    }
}

impl Id3Reader {
    pub fn new(container_mime_type: impl Into<String>) -> Self {
        Self {
            container_mime_type: container_mime_type.into(),
            output: None,
            header: [0; ID3_HEADER_LEN],
            state: ReaderState::Idle,
        }
    }

    /// Whether a tag is currently being read.
    pub fn is_reading_sample(&self) -> bool {
        matches!(
            self.state,
            ReaderState::AccumulatingHeader { .. } | ReaderState::CopyingPayload { .. }
        )
    }
}

impl ElementaryStreamReader for Id3Reader {
    fn seek(&mut self) {
        if self.is_reading_sample() {
            debug!(state = ?self.state, "Seek dropped partially read ID3 tag");
        }
        self.state = ReaderState::Idle;
    }

    fn create_tracks(
        &mut self,
        output: &mut dyn ExtractorOutput,
        id_generator: &mut TrackIdGenerator,
    ) -> Result<()> {
        let ids = id_generator.generate_new_id();
        let mut track = output.track(ids.track_id, TrackType::Metadata);
        track.format(
            Format::default()
                .with_id(ids.format_id)
                .with_container_mime_type(self.container_mime_type.as_str())
                .with_sample_mime_type(mime::APPLICATION_ID3),
        )?;
        self.output = Some(track);
        Ok(())
    }

    fn packet_started(&mut self, pes_time_us: i64, flags: PayloadReaderFlags) {
        if !flags.contains(PayloadReaderFlags::DATA_ALIGNMENT_INDICATOR) {
            return;
        }
        if self.is_reading_sample() {
            debug!(state = ?self.state, "Aligned packet replaced incomplete ID3 tag");
        }
        self.state = ReaderState::AccumulatingHeader {
            time_us: pes_time_us,
            filled: 0,
        };
    }

    fn consume(&mut self, data: &mut Bytes) -> Result<()> {
        let output = self.output.as_mut().ok_or(TsError::TracksNotCreated)?;

        // A failed sink call leaves the tag abandoned.
        let mut state = mem::replace(&mut self.state, ReaderState::Idle);

        if let ReaderState::AccumulatingHeader { time_us, filled } = state {
            let count = min(data.len(), ID3_HEADER_LEN - filled);
            self.header[filled..filled + count].copy_from_slice(&data[..count]);
            data.advance(count);

            let filled = filled + count;
            if filled < ID3_HEADER_LEN {
                self.state = ReaderState::AccumulatingHeader { time_us, filled };
                return Ok(());
            }

            let header = match Id3Header::parse(&self.header) {
                Ok(header) => header,
                Err(e) => {
                    warn!(error = %e, "Discarding invalid ID3 tag");
                    self.state = ReaderState::AwaitingAlignment;
                    return Ok(());
                }
            };
            trace!(
                version = header.major_version,
                tag_len = header.tag_len(),
                "Read ID3 header"
            );

            output.sample_data(Bytes::copy_from_slice(&self.header))?;
            state = ReaderState::CopyingPayload {
                time_us,
                total: header.tag_len(),
                consumed: ID3_HEADER_LEN,
            };
        }

        if let ReaderState::CopyingPayload {
            total, consumed, ..
        } = &mut state
        {
            let count = min(data.len(), *total - *consumed);
            if count > 0 {
                output.sample_data(data.split_to(count))?;
                *consumed += count;
            }
        }

        self.state = state;
        Ok(())
    }

    fn packet_finished(&mut self, is_end_of_input: bool) -> Result<()> {
        let output = self.output.as_mut().ok_or(TsError::TracksNotCreated)?;

        match mem::replace(&mut self.state, ReaderState::Idle) {
            ReaderState::CopyingPayload {
                time_us,
                total,
                consumed,
            } if consumed == total => {
                output.sample_metadata(time_us, BufferFlags::KEY_FRAME, total, 0, None)?;
            }
            state @ (ReaderState::AccumulatingHeader { .. }
            | ReaderState::CopyingPayload { .. })
                if is_end_of_input =>
            {
                debug!(state = ?state, "Input ended inside ID3 tag, dropping it");
            }
            state => self.state = state,
        }

        Ok(())
    }
}
