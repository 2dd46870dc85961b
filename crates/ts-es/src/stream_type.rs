use crate::format::TrackType;

/// `stream_type` values announced for elementary streams in the PMT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// MPEG-1 Video
    Mpeg1Video,
    /// MPEG-2 Video
    Mpeg2Video,
    /// MPEG-1 Audio
    Mpeg1Audio,
    /// MPEG-2 Audio
    Mpeg2Audio,
    /// MPEG-2 Private PES packets
    Mpeg2PrivatePes,
    /// ADTS AAC Audio
    AdtsAac,
    /// LATM AAC Audio
    LatmAac,
    /// Metadata carried in PES packets (timed ID3)
    MetadataPes,
    /// AVC video stream
    H264,
    /// HEVC video stream
    H265,
    /// AC-3 audio stream (ATSC A/52B)
    Ac3,
    /// DTS audio stream
    Dts,
    /// E-AC-3 audio stream (ATSC A/52B)
    EAc3,
    /// Stream type without a dedicated variant
    Unknown(u8),
}

impl From<u8> for StreamType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => StreamType::Mpeg1Video,
            0x02 => StreamType::Mpeg2Video,
            0x03 => StreamType::Mpeg1Audio,
            0x04 => StreamType::Mpeg2Audio,
            0x06 => StreamType::Mpeg2PrivatePes,
            0x0F => StreamType::AdtsAac,
            0x11 => StreamType::LatmAac,
            0x15 => StreamType::MetadataPes,
            0x1B => StreamType::H264,
            0x24 => StreamType::H265,
            0x81 => StreamType::Ac3,
            0x82 => StreamType::Dts,
            0x87 => StreamType::EAc3,
            _ => StreamType::Unknown(value),
        }
    }
}

impl From<StreamType> for u8 {
    fn from(value: StreamType) -> Self {
        match value {
            StreamType::Mpeg1Video => 0x01,
            StreamType::Mpeg2Video => 0x02,
            StreamType::Mpeg1Audio => 0x03,
            StreamType::Mpeg2Audio => 0x04,
            StreamType::Mpeg2PrivatePes => 0x06,
            StreamType::AdtsAac => 0x0F,
            StreamType::LatmAac => 0x11,
            StreamType::MetadataPes => 0x15,
            StreamType::H264 => 0x1B,
            StreamType::H265 => 0x24,
            StreamType::Ac3 => 0x81,
            StreamType::Dts => 0x82,
            StreamType::EAc3 => 0x87,
            StreamType::Unknown(other) => other,
        }
    }
}

impl StreamType {
    /// Kind of track a stream of this type produces.
    pub fn track_type(&self) -> TrackType {
        match self {
            StreamType::Mpeg1Video
            | StreamType::Mpeg2Video
            | StreamType::H264
            | StreamType::H265 => TrackType::Video,
            StreamType::Mpeg1Audio
            | StreamType::Mpeg2Audio
            | StreamType::AdtsAac
            | StreamType::LatmAac
            | StreamType::Ac3
            | StreamType::Dts
            | StreamType::EAc3 => TrackType::Audio,
            StreamType::MetadataPes => TrackType::Metadata,
            StreamType::Mpeg2PrivatePes | StreamType::Unknown(_) => TrackType::Unknown,
        }
    }
}
