use std::hint::black_box;

use bytes::Bytes;
use criterion::{Criterion, criterion_group, criterion_main};
use ts_es::{
    BufferFlags, CryptoData, ElementaryStreamReader, ExtractorOutput, Format, Id3Header,
    Id3Reader, PayloadReaderFlags, TrackIdGenerator, TrackOutput, TrackType,
};

/// Output that only counts bytes, so iterations don't accumulate memory
struct CountingOutput;

struct CountingTrack {
    bytes: usize,
}

impl ExtractorOutput for CountingOutput {
    fn track(&mut self, _id: u32, _track_type: TrackType) -> Box<dyn TrackOutput> {
        Box::new(CountingTrack { bytes: 0 })
    }

    fn end_tracks(&mut self) {}
}

impl TrackOutput for CountingTrack {
    fn format(&mut self, _format: Format) -> ts_es::Result<()> {
        Ok(())
    }

    fn sample_data(&mut self, data: Bytes) -> ts_es::Result<()> {
        self.bytes += data.len();
        Ok(())
    }

    fn sample_metadata(
        &mut self,
        _time_us: i64,
        _flags: BufferFlags,
        size: usize,
        _offset: usize,
        _crypto_data: Option<CryptoData>,
    ) -> ts_es::Result<()> {
        self.bytes -= size.min(self.bytes);
        Ok(())
    }
}

fn benchmark_id3_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("Id3Reader");

    for (name, body_len) in [("64 B tag", 64), ("64 KiB tag", 64 * 1024)] {
        let tag = Bytes::from(create_tag(body_len));

        group.bench_function(format!("{name}, one chunk"), |b| {
            let mut reader = create_reader();
            b.iter(|| feed(&mut reader, black_box(&tag), tag.len()))
        });

        group.bench_function(format!("{name}, 184-byte chunks"), |b| {
            let mut reader = create_reader();
            b.iter(|| feed(&mut reader, black_box(&tag), 184))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_id3_reader);
criterion_main!(benches);

fn create_reader() -> Id3Reader {
    let mut reader = Id3Reader::default();
    reader
        .create_tracks(&mut CountingOutput, &mut TrackIdGenerator::new(1, 1))
        .unwrap();
    reader
}

fn feed(reader: &mut Id3Reader, tag: &Bytes, chunk_size: usize) {
    reader.packet_started(0, PayloadReaderFlags::DATA_ALIGNMENT_INDICATOR);
    let mut offset = 0;
    while offset < tag.len() {
        let end = (offset + chunk_size).min(tag.len());
        let mut chunk = tag.slice(offset..end);
        reader.consume(&mut chunk).unwrap();
        offset = end;
    }
    reader.packet_finished(false).unwrap();
}

fn create_tag(body_len: usize) -> Vec<u8> {
    let header = Id3Header {
        major_version: 4,
        revision: 0,
        flags: 0,
        size: body_len as u32,
    };
    let mut tag = header.to_bytes().unwrap().to_vec();
    tag.resize(tag.len() + body_len, 0x41);
    tag
}
