//! Drives an ID3 reader with PES payloads chunked the way a transport stream
//! delivers them (184-byte TS payloads), including a corrupt tag and a seek.
//!
//! Run with `RUST_LOG=debug` to see the reader's diagnostics.

use bytes::Bytes;
use tracing::{Level, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use ts_es::{
    CapturingOutput, DefaultReaderFactory, ExtractorOutput, Id3Header, PayloadReaderFlags,
    StreamType, TrackIdGenerator,
};

const TS_PAYLOAD_SIZE: usize = 184;
const ID3_PID: u32 = 0x102;

fn main() -> ts_es::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let factory = DefaultReaderFactory::default();
    let Some(mut reader) = factory.create_reader(StreamType::MetadataPes) else {
        return Ok(());
    };

    let mut output = CapturingOutput::new();
    let mut ids = TrackIdGenerator::with_program(1, ID3_PID, 8192);
    reader.create_tracks(&mut output, &mut ids)?;
    output.end_tracks();

    let mut corrupt = build_tag(b"TIT2 corrupt")?;
    corrupt[..3].copy_from_slice(b"ID4");

    let packets = [
        (0i64, build_tag(b"TXXX first tag")?),
        (2_000_000, build_tag(&vec![0x20; 700])?),
        (4_000_000, corrupt),
        (6_000_000, build_tag(b"TXXX after corrupt tag")?),
    ];

    for (time_us, pes_payload) in packets {
        reader.packet_started(time_us, PayloadReaderFlags::DATA_ALIGNMENT_INDICATOR);
        for chunk in pes_payload.chunks(TS_PAYLOAD_SIZE) {
            reader.consume(&mut Bytes::copy_from_slice(chunk))?;
        }
        reader.packet_finished(false)?;
    }

    // Start a tag, then seek away before it completes.
    let pending = build_tag(&[0x55; 400])?;
    reader.packet_started(8_000_000, PayloadReaderFlags::DATA_ALIGNMENT_INDICATOR);
    reader.consume(&mut Bytes::copy_from_slice(&pending[..TS_PAYLOAD_SIZE]))?;
    reader.seek();
    reader.packet_finished(true)?;

    if let Some(track) = output.captured_track(ID3_PID) {
        info!(
            format = ?track.format,
            samples = track.samples.len(),
            discarded_bytes = track.discarded_bytes,
            "Metadata track"
        );
        for sample in &track.samples {
            let header = Id3Header::parse(&sample.data)?;
            info!(
                time_us = sample.time_us,
                bytes = sample.data.len(),
                version = header.major_version,
                "ID3 sample"
            );
        }
    }

    Ok(())
}

fn build_tag(body: &[u8]) -> ts_es::Result<Vec<u8>> {
    let header = Id3Header {
        major_version: 4,
        revision: 0,
        flags: 0,
        size: body.len() as u32,
    };
    let mut tag = header.to_bytes()?.to_vec();
    tag.extend_from_slice(body);
    Ok(tag)
}
