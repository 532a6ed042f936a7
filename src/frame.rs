//! Reusable video frame buffer.
//!
//! The broadcast loop allocates exactly one `VideoFrame` and overwrites it
//! in place on every iteration. Refilling reuses the pixel allocation, so
//! a steady-state broadcast performs no per-frame heap allocation once the
//! buffer has grown to its working size.

use crate::error::FrameError;

/// Pixel layouts a frame buffer can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0. Dimensions must be even.
    I420,
    /// Packed 8-bit blue/green/red/alpha.
    Bgra,
}

impl PixelFormat {
    /// Exact byte length of a frame of this format at the given dimensions.
    pub fn frame_len(&self, width: u32, height: u32) -> Result<usize, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyDimensions { width, height });
        }
        let pixels = width as usize * height as usize;
        match self {
            PixelFormat::I420 => {
                if width % 2 != 0 || height % 2 != 0 {
                    return Err(FrameError::OddI420Dimensions { width, height });
                }
                Ok(pixels * 3 / 2)
            }
            PixelFormat::Bgra => Ok(pixels * 4),
        }
    }
}

/// One mutable pixel buffer plus its metadata.
///
/// A freshly constructed frame is empty and invalid; it becomes valid once
/// a source has filled it. Validity is cleared again by `invalidate`.
#[derive(Debug)]
pub struct VideoFrame {
    format: PixelFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
    valid: bool,
}

impl VideoFrame {
    /// An empty, invalid buffer. The format here is only the initial
    /// allocation hint; sources overwrite format and dimensions on fill.
    pub fn empty(format: PixelFormat) -> Self {
        Self {
            format,
            width: 0,
            height: 0,
            data: Vec::new(),
            valid: false,
        }
    }

    /// Overwrite this frame in place, letting the caller write pixels
    /// directly into the resized buffer.
    pub fn overwrite_with<F>(
        &mut self,
        format: PixelFormat,
        width: u32,
        height: u32,
        fill: F,
    ) -> Result<(), FrameError>
    where
        F: FnOnce(&mut [u8]),
    {
        let len = format.frame_len(width, height)?;
        self.data.resize(len, 0);
        fill(&mut self.data);
        self.format = format;
        self.width = width;
        self.height = height;
        self.valid = true;
        Ok(())
    }

    /// Overwrite this frame by copying pixels from a slice. The slice
    /// length must match the format's exact frame length.
    pub fn overwrite(
        &mut self,
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), FrameError> {
        let len = format.frame_len(width, height)?;
        if pixels.len() != len {
            return Err(FrameError::LengthMismatch {
                expected: len,
                actual: pixels.len(),
            });
        }
        self.data.clear();
        self.data.extend_from_slice(pixels);
        self.format = format;
        self.width = width;
        self.height = height;
        self.valid = true;
        Ok(())
    }

    /// Mark the frame stale without releasing its allocation.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer currently holds a fetched frame.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
