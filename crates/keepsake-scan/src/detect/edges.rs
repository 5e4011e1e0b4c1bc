// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contrast-based edge detection: finds where a physical photo sits against
// the background it was photographed on.

use keepsake_core::frame::{CHANNELS, luma};
use keepsake_core::{FrameBuffer, Rect};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

/// Minimum mean adjacent-pixel luma difference for a row or column to count
/// as part of the photo.
pub const EDGE_CONTRAST_THRESHOLD: f64 = 0.1;

/// Pixels added around the first and last high-contrast row/column.
pub const EDGE_MARGIN: u32 = 5;

/// The detected region must exceed this fraction of each frame dimension.
pub const MIN_EDGE_COVERAGE: f64 = 0.3;

/// Locate the photo's bounding box from row and column contrast.
///
/// Rows are scanned top-to-bottom and bottom-to-top for the first row whose
/// contrast exceeds [`EDGE_CONTRAST_THRESHOLD`]; columns likewise from the
/// left and right. Each hit is widened by [`EDGE_MARGIN`] and clamped to the
/// frame.
///
/// Returns `None` ("no edges found") when no row or column qualifies, or when
/// the region is not wider than 30% of the frame width and taller than 30% of
/// the frame height. Callers then keep the full frame.
#[instrument(skip(frame), fields(width = frame.width(), height = frame.height()))]
pub fn detect_photo_edges(frame: &FrameBuffer) -> Option<Rect> {
    if frame.is_empty() {
        warn!("Empty frame; no edges to detect");
        return None;
    }
    let (width, height) = frame.dimensions();

    let plane = luma_plane(frame);
    let rows = row_contrast_profile(&plane, width, height);
    let columns = column_contrast_profile(&plane, width, height);

    let Some((top, bottom)) = find_bounds(&rows) else {
        info!("No row exceeds the contrast threshold; no edges found");
        return None;
    };
    let Some((left, right)) = find_bounds(&columns) else {
        info!("No column exceeds the contrast threshold; no edges found");
        return None;
    };
    debug!(top, bottom, left, right, "Contrast bounds located");

    let rect = Rect::new(left, top, right - left, bottom - top);
    if !is_acceptable(&rect, width, height) {
        info!(%rect, "Detected region too small; rejecting as a false positive");
        return None;
    }

    info!(%rect, "Photo edges detected");
    Some(rect)
}

/// Unweighted luma of every pixel, row-major.
fn luma_plane(frame: &FrameBuffer) -> Vec<f64> {
    frame.pixels().par_chunks_exact(CHANNELS).map(luma).collect()
}

/// Mean absolute luma difference between horizontally adjacent pixels, one
/// value per row. The sum over `width - 1` pairs is divided by `width`.
fn row_contrast_profile(plane: &[f64], width: u32, height: u32) -> Vec<f64> {
    let w = width as usize;
    (0..height as usize)
        .into_par_iter()
        .map(|y| {
            let row = &plane[y * w..(y + 1) * w];
            let sum: f64 = row.windows(2).map(|pair| (pair[1] - pair[0]).abs()).sum();
            sum / w as f64
        })
        .collect()
}

/// Mean absolute luma difference between vertically adjacent pixels, one
/// value per column. The sum over `height - 1` pairs is divided by `height`.
fn column_contrast_profile(plane: &[f64], width: u32, height: u32) -> Vec<f64> {
    let (w, h) = (width as usize, height as usize);
    (0..w)
        .into_par_iter()
        .map(|x| {
            let sum: f64 = (1..h)
                .map(|y| (plane[y * w + x] - plane[(y - 1) * w + x]).abs())
                .sum();
            sum / h as f64
        })
        .collect()
}

/// First and last index above the threshold, widened by the margin.
/// Returns `(start, end)` with `end` exclusive.
fn find_bounds(profile: &[f64]) -> Option<(u32, u32)> {
    let first = profile.iter().position(|&c| c > EDGE_CONTRAST_THRESHOLD)?;
    let last = profile.iter().rposition(|&c| c > EDGE_CONTRAST_THRESHOLD)?;
    let start = (first as u32).saturating_sub(EDGE_MARGIN);
    let end = (last as u32 + 1 + EDGE_MARGIN).min(profile.len() as u32);
    Some((start, end))
}

fn is_acceptable(rect: &Rect, frame_width: u32, frame_height: u32) -> bool {
    rect.width as f64 > frame_width as f64 * MIN_EDGE_COVERAGE
        && rect.height as f64 > frame_height as f64 * MIN_EDGE_COVERAGE
}
