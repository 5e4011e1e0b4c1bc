// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glare suppression: pulls overexposed highlights (reflections off glossy
// prints) back down towards the threshold.

use std::sync::atomic::{AtomicUsize, Ordering};

use keepsake_core::FrameBuffer;
use keepsake_core::frame::{CHANNELS, luma};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Brightness above which a pixel counts as glare.
pub const GLARE_THRESHOLD: f64 = 220.0;

/// Fraction of the excess over the threshold removed from each channel.
pub const GLARE_REDUCTION: f64 = 0.5;

/// Attenuate every pixel whose brightness exceeds [`GLARE_THRESHOLD`].
///
/// Each of R, G and B is reduced by `(brightness - 220) * 0.5`, floored at 0.
/// Alpha is untouched. Pixels at or below the threshold are left exactly as
/// they were.
#[instrument(skip(frame), fields(width = frame.width(), height = frame.height()))]
pub fn remove_glare(frame: &FrameBuffer) -> FrameBuffer {
    let affected = AtomicUsize::new(0);
    let output = frame.transform(|bytes| {
        bytes.par_chunks_exact_mut(CHANNELS).for_each(|px| {
            if suppress(px) {
                affected.fetch_add(1, Ordering::Relaxed);
            }
        });
    });
    debug!(affected = affected.into_inner(), "Glare suppression complete");
    output
}

/// Apply the reduction to one RGBA sample. Returns whether it changed.
fn suppress(px: &mut [u8]) -> bool {
    let brightness = luma(px);
    if brightness <= GLARE_THRESHOLD {
        return false;
    }
    let reduction = (brightness - GLARE_THRESHOLD) * GLARE_REDUCTION;
    for channel in &mut px[..3] {
        *channel = (*channel as f64 - reduction).max(0.0).round() as u8;
    }
    true
}
