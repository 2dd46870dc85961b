//! In-memory [`ExtractorOutput`] that records everything readers emit.
//!
//! Each track handed out shares its state with the `CapturingOutput`, so
//! samples can be inspected while the reader still owns the track.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tracing::debug;

use crate::format::{BufferFlags, CryptoData, Format, TrackType};
use crate::output::{ExtractorOutput, TrackOutput};
use crate::{Result, TsError};

/// A committed sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSample {
    pub time_us: i64,
    pub flags: BufferFlags,
    pub data: Bytes,
    pub crypto_data: Option<CryptoData>,
}

/// Everything a reader emitted for one track
#[derive(Debug, Clone)]
pub struct CapturedTrack {
    pub track_type: TrackType,
    pub format: Option<Format>,
    pub samples: Vec<CapturedSample>,
    /// Bytes appended but not yet part of a committed sample
    pub pending: BytesMut,
    /// Appended bytes that were skipped over by a later commit
    pub discarded_bytes: usize,
    pub sample_data_calls: usize,
    pub sample_metadata_calls: usize,
}

impl CapturedTrack {
    fn new(track_type: TrackType) -> Self {
        Self {
            track_type,
            format: None,
            samples: Vec::new(),
            pending: BytesMut::new(),
            discarded_bytes: 0,
            sample_data_calls: 0,
            sample_metadata_calls: 0,
        }
    }
}

type SharedTrack = Arc<Mutex<CapturedTrack>>;

/// Output that keeps registered tracks and their samples in memory
#[derive(Debug, Default)]
pub struct CapturingOutput {
    tracks: BTreeMap<u32, SharedTrack>,
    tracks_ended: bool,
}

impl CapturingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the track registered under `id`.
    pub fn captured_track(&self, id: u32) -> Option<CapturedTrack> {
        self.tracks.get(&id).map(|track| track.lock().clone())
    }

    /// Ids of all registered tracks, ascending.
    pub fn track_ids(&self) -> Vec<u32> {
        self.tracks.keys().copied().collect()
    }

    pub fn tracks_ended(&self) -> bool {
        self.tracks_ended
    }
}

impl ExtractorOutput for CapturingOutput {
    fn track(&mut self, id: u32, track_type: TrackType) -> Box<dyn TrackOutput> {
        let track = self
            .tracks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(CapturedTrack::new(track_type))));

        Box::new(CapturingTrackOutput {
            id,
            track: Arc::clone(track),
        })
    }

    fn end_tracks(&mut self) {
        self.tracks_ended = true;
    }
}

struct CapturingTrackOutput {
    id: u32,
    track: SharedTrack,
}

impl TrackOutput for CapturingTrackOutput {
    fn format(&mut self, format: Format) -> Result<()> {
        self.track.lock().format = Some(format);
        Ok(())
    }

    fn sample_data(&mut self, data: Bytes) -> Result<()> {
        let mut track = self.track.lock();
        track.sample_data_calls += 1;
        track.pending.extend_from_slice(&data);
        Ok(())
    }

    fn sample_metadata(
        &mut self,
        time_us: i64,
        flags: BufferFlags,
        size: usize,
        offset: usize,
        crypto_data: Option<CryptoData>,
    ) -> Result<()> {
        let mut track = self.track.lock();
        track.sample_metadata_calls += 1;

        let pending = track.pending.len();
        if size + offset > pending {
            return Err(TsError::SampleSizeMismatch {
                declared: size + offset,
                pending,
            });
        }

        let end = pending - offset;
        let start = end - size;
        if start > 0 {
            debug!(
                track_id = self.id,
                bytes = start,
                "Discarding sample data not covered by committed sample"
            );
            track.discarded_bytes += start;
        }

        // Anything after `end` stays pending for the next sample.
        let mut committed = track.pending.split_to(end);
        let data = committed.split_off(start).freeze();
        track.samples.push(CapturedSample {
            time_us,
            flags,
            data,
            crypto_data,
        });
        Ok(())
    }
}
