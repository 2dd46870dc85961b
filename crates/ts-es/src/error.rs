use thiserror::Error;

/// Errors produced by elementary stream readers and their outputs
#[derive(Error, Debug)]
pub enum TsError {
    #[error("Reader used before create_tracks was called")]
    TracksNotCreated,

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Invalid ID3 header: expected \"ID3\" magic, got {0:02x?}")]
    InvalidId3Header([u8; 3]),

    #[error("Invalid synch-safe integer: byte 0x{0:02x} has its high bit set")]
    InvalidSynchSafeInteger(u8),

    #[error("Value {0} does not fit in a 28-bit synch-safe integer")]
    SynchSafeOverflow(u32),

    #[error("Sample metadata covers {declared} bytes but only {pending} are pending")]
    SampleSizeMismatch { declared: usize, pending: usize },
}
