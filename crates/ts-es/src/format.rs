//! Track descriptions and the flag sets exchanged with outputs.

use bitflags::bitflags;
use bytes::Bytes;

/// MIME types understood by the readers in this crate.
pub mod mime {
    /// Timed ID3 metadata.
    pub const APPLICATION_ID3: &str = "application/id3";
    /// MPEG transport stream container.
    pub const VIDEO_MP2T: &str = "video/mp2t";
}

/// Kind of data carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    Unknown,
    Audio,
    Video,
    Text,
    Image,
    Metadata,
}

/// Static description of a track, published once after registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub id: Option<String>,
    pub container_mime_type: Option<String>,
    pub sample_mime_type: Option<String>,
}

impl Format {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_container_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.container_mime_type = Some(mime_type.into());
        self
    }

    pub fn with_sample_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.sample_mime_type = Some(mime_type.into());
        self
    }
}

bitflags! {
    /// Per-sample flags attached to emitted sample metadata.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferFlags: u32 {
        /// The sample is a sync sample and can be decoded on its own.
        const KEY_FRAME = 1;
    }
}

/// Encryption scheme of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoMode {
    AesCtr,
    AesCbc,
}

/// Decryption parameters for an encrypted sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoData {
    pub mode: CryptoMode,
    pub encryption_key: Bytes,
    /// Pattern encryption: encrypted blocks per pattern
    pub encrypted_blocks: u32,
    /// Pattern encryption: clear blocks per pattern
    pub clear_blocks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_builder() {
        let format = Format::default()
            .with_id("1/257")
            .with_container_mime_type(mime::VIDEO_MP2T)
            .with_sample_mime_type(mime::APPLICATION_ID3);

        assert_eq!(format.id.as_deref(), Some("1/257"));
        assert_eq!(format.container_mime_type.as_deref(), Some("video/mp2t"));
        assert_eq!(format.sample_mime_type.as_deref(), Some("application/id3"));
    }

    #[test]
    fn test_buffer_flags() {
        assert!(BufferFlags::KEY_FRAME.contains(BufferFlags::KEY_FRAME));
        assert!(!BufferFlags::empty().contains(BufferFlags::KEY_FRAME));
        assert_eq!(BufferFlags::KEY_FRAME.bits(), 1);
    }
}
