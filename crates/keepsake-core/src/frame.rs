// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame buffer: the RGBA pixel grid every pipeline stage consumes and
// produces.

use crate::error::{KeepsakeError, Result};
use crate::types::Rect;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A rectangular grid of 8-bit RGBA samples in row-major order.
///
/// `pixels.len() == width * height * 4` holds for every value of this type:
/// the only way to build one from foreign data is [`FrameBuffer::new`], which
/// rejects mismatched lengths. Stages never mutate a frame in place; they
/// return a new one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw RGBA bytes, validating the length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        Self::check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Copy a borrowed raw buffer after validating it.
    pub fn from_slice(width: u32, height: u32, pixels: &[u8]) -> Result<Self> {
        Self::check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    /// A frame where every pixel has the same colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Number of bytes a `width` x `height` RGBA frame must hold, or `None`
    /// if that does not fit in memory addressing.
    pub fn expected_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(CHANNELS)
    }

    fn check_len(width: u32, height: u32, actual: usize) -> Result<()> {
        match Self::expected_len(width, height) {
            Some(expected) if expected == actual => Ok(()),
            expected => Err(KeepsakeError::InvalidBuffer {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual,
            }),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the frame has zero area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} frame",
            self.width,
            self.height
        );
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Unweighted luma of the pixel at `(x, y)`.
    pub fn luma(&self, x: u32, y: u32) -> f64 {
        luma(&self.pixel(x, y))
    }

    /// Row `y` as a byte slice of `width * 4` samples.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    // -- Derived frames -------------------------------------------------------

    /// Copy the sub-rectangle `rect` into a new, smaller frame.
    ///
    /// Returns `None` when `rect` is empty or reaches outside this frame.
    pub fn crop(&self, rect: &Rect) -> Option<FrameBuffer> {
        if !rect.fits_within(self.width, self.height) {
            return None;
        }
        let offset = rect.x as usize * CHANNELS;
        let span = rect.width as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(rect.height as usize * span);
        for y in rect.y..rect.y + rect.height {
            pixels.extend_from_slice(&self.row(y)[offset..offset + span]);
        }
        Some(FrameBuffer {
            width: rect.width,
            height: rect.height,
            pixels,
        })
    }

    /// A new frame of the same size, produced by letting `f` rewrite a copy of
    /// this frame's bytes. The slice cannot change length, so the result
    /// always satisfies the buffer invariant.
    pub fn transform(&self, f: impl FnOnce(&mut [u8])) -> FrameBuffer {
        let mut pixels = self.pixels.clone();
        f(&mut pixels);
        FrameBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Mean of the unweighted luma over every pixel, `None` for an empty
    /// frame.
    pub fn mean_luma(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total: f64 = self.pixels.chunks_exact(CHANNELS).map(luma).sum();
        Some(total / self.pixel_count() as f64)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Unweighted mean of the R, G and B channels of one RGBA sample.
pub fn luma(px: &[u8]) -> f64 {
    (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0
}
