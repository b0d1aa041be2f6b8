//! Video frame types and conversions

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::FrameError;

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        timestamp_ns: u64,
        sequence: u32,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        })
    }

    /// Wrap an `image` RGB buffer
    pub fn from_image(image: RgbImage) -> Result<Self, FrameError> {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, 0, 0)
    }

    /// Decode an encoded image (JPEG, PNG, ...) into a frame
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| FrameError::Decode(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        debug!("Decoded {}x{} frame", rgb.width(), rgb.height());
        Self::from_image(rgb)
    }

    /// Frame dimensions
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// Copy the pixels into an `image` RGB buffer
    pub fn to_image(&self) -> Result<RgbImage, FrameError> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            FrameError::BufferSize {
                width: self.width,
                height: self.height,
                expected: self.width as usize * self.height as usize * 3,
                actual: self.data.len(),
            },
        )
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Flip the frame around its vertical axis
    pub fn mirrored(&self) -> VideoFrame {
        let row_len = self.width as usize * 3;
        let mut flipped = Vec::with_capacity(self.data.len());

        for row in self.data.chunks(row_len) {
            for pixel in row.chunks(3).rev() {
                flipped.extend_from_slice(pixel);
            }
        }

        VideoFrame {
            data: flipped,
            width: self.width,
            height: self.height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }
}

/// Encode an RGB image as JPEG
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, FrameError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| FrameError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
