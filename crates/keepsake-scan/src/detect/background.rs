// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background analysis: how bright is the surface the print was laid on.

use keepsake_core::FrameBuffer;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fraction of each dimension sampled as the border band.
pub const BORDER_FRACTION: f64 = 0.1;

/// Sampling stride along the band.
pub const BORDER_STRIDE: usize = 4;

/// Mean brightness above which the background counts as light.
pub const LIGHT_BACKGROUND_THRESHOLD: f64 = 0.6;

/// Brightness of the frame's border band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BackgroundInfo {
    /// Mean perceptual brightness of the band, 0.0 (black) to 1.0 (white).
    pub brightness: f64,
    /// True when `brightness` exceeds 0.6.
    pub has_light_background: bool,
}

/// Sample the outer 10% on every side of the frame.
///
/// The top and bottom bands are sampled every 4th column, the left and right
/// bands every 4th row. Brightness uses Rec. 601 weights. An empty frame, or
/// one too small to have a band, reports zero brightness.
#[instrument(skip(frame), fields(width = frame.width(), height = frame.height()))]
pub fn analyze_background(frame: &FrameBuffer) -> BackgroundInfo {
    let (width, height) = frame.dimensions();
    let band_w = (width as f64 * BORDER_FRACTION) as u32;
    let band_h = (height as f64 * BORDER_FRACTION) as u32;

    let mut sum = 0.0;
    let mut samples = 0usize;
    let mut sample = |x: u32, y: u32| {
        sum += perceptual_brightness(frame.pixel(x, y));
        samples += 1;
    };

    for y in (0..band_h).chain(height - band_h..height) {
        for x in (0..width).step_by(BORDER_STRIDE) {
            sample(x, y);
        }
    }
    for x in (0..band_w).chain(width - band_w..width) {
        for y in (0..height).step_by(BORDER_STRIDE) {
            sample(x, y);
        }
    }

    if samples == 0 {
        return BackgroundInfo::default();
    }

    let brightness = sum / samples as f64;
    debug!(brightness, samples, "Background sampled");
    BackgroundInfo {
        brightness,
        has_light_background: brightness > LIGHT_BACKGROUND_THRESHOLD,
    }
}

fn perceptual_brightness(px: [u8; 4]) -> f64 {
    (px[0] as f64 * 0.299 + px[1] as f64 * 0.587 + px[2] as f64 * 0.114) / 255.0
}
