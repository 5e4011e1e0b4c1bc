// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global contrast/brightness enhancement for faded prints.

use keepsake_core::FrameBuffer;
use keepsake_core::frame::CHANNELS;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// Contrast stretch around mid-grey.
pub const CONTRAST_FACTOR: f64 = 1.3;

/// Weight of the measured average brightness in the brightness correction.
pub const BRIGHTNESS_WEIGHT: f64 = 0.3;

/// Final gain applied after contrast and brightness.
pub const SHARPNESS_GAIN: f64 = 1.1;

const MID_GREY: f64 = 128.0;

/// Two-pass enhancement.
///
/// Pass 1 measures the average brightness (mean of R, G, B over all pixels).
/// Pass 2 maps every colour channel through
/// `((v - 128) * 1.3 + 128 + (128 - avg * 0.3)) * 1.1`, rounded and clamped
/// to 0..=255. Alpha is untouched. An empty frame is returned as-is.
#[instrument(skip(frame), fields(width = frame.width(), height = frame.height()))]
pub fn enhance(frame: &FrameBuffer) -> FrameBuffer {
    let Some(avg_brightness) = frame.mean_luma() else {
        return frame.clone();
    };
    debug!(avg_brightness, "Average brightness measured");

    let lut = channel_lut(avg_brightness);
    let output = frame.transform(|bytes| {
        bytes.par_chunks_exact_mut(CHANNELS).for_each(|px| {
            for channel in &mut px[..3] {
                *channel = lut[*channel as usize];
            }
        });
    });
    info!(avg_brightness, "Enhancement applied");
    output
}

/// The transform for one channel value, before rounding.
pub fn enhance_value(value: f64, avg_brightness: f64) -> f64 {
    let brightness_adjust = MID_GREY - avg_brightness * BRIGHTNESS_WEIGHT;
    ((value - MID_GREY) * CONTRAST_FACTOR + MID_GREY + brightness_adjust) * SHARPNESS_GAIN
}

/// The per-channel mapping depends only on the input value once the average
/// is known, so it is tabulated.
fn channel_lut(avg_brightness: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        *slot = enhance_value(value as f64, avg_brightness)
            .clamp(0.0, 255.0)
            .round() as u8;
    }
    lut
}
