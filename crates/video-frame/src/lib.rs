//! Video Frame Library
//!
//! Decoded RGB frames as handed to the landmark detector and the gaze
//! estimator. Provides:
//! - Validated construction from raw RGB buffers
//! - Conversion to and from `image` buffers
//! - Encoded image decoding (JPEG/PNG) and JPEG encoding
//! - Horizontal mirroring for selfie-style display

pub mod frame;

pub use frame::{encode_jpeg, FrameSize, VideoFrame};

use thiserror::Error;

/// Frame error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Buffer size mismatch: expected {expected} bytes for {width}x{height}, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Empty frame ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}
