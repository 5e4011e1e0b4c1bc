// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face detection capability and the heuristic stand-ins shipped with Keepsake.
//
// The pipeline only depends on the `FaceDetector` trait; a real model-backed
// detector plugs in without touching the crop geometry.

use keepsake_core::{FaceRegion, FrameBuffer};
use tracing::{debug, trace};

/// Fraction of the frame's shorter side used as the face square's side.
pub const FACE_FRACTION: f64 = 0.3;

/// Grid spacing, in pixels, of the darkest-region search.
pub const DARK_SEARCH_STEP: usize = 10;

/// Darkness (1 - luma/255) a sample must exceed to count as a face.
pub const DARK_FACE_THRESHOLD: f64 = 0.3;

/// Locates a face in a frame.
///
/// Returning `None` is a detection miss: the face-aware crop stage is then
/// skipped, never treated as an error.
pub trait FaceDetector: Send + Sync {
    /// Find a face in `frame`, in that frame's pixel coordinates.
    fn detect(&self, frame: &FrameBuffer) -> Option<FaceRegion>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<T: FaceDetector + ?Sized> FaceDetector for Box<T> {
    fn detect(&self, frame: &FrameBuffer) -> Option<FaceRegion> {
        (**self).detect(frame)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: FaceDetector + ?Sized> FaceDetector for &T {
    fn detect(&self, frame: &FrameBuffer) -> Option<FaceRegion> {
        (**self).detect(frame)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapter turning a closure into a [`FaceDetector`].
pub struct FnDetector<F>(pub F);

impl<F> FaceDetector for FnDetector<F>
where
    F: Fn(&FrameBuffer) -> Option<FaceRegion> + Send + Sync,
{
    fn detect(&self, frame: &FrameBuffer) -> Option<FaceRegion> {
        (self.0)(frame)
    }
}

/// Wrap a closure as a detector.
pub fn from_fn<F>(f: F) -> FnDetector<F>
where
    F: Fn(&FrameBuffer) -> Option<FaceRegion> + Send + Sync,
{
    FnDetector(f)
}

/// Side of the face square for a frame.
fn face_side(frame: &FrameBuffer) -> u32 {
    (frame.width().min(frame.height()) as f64 * FACE_FRACTION) as u32
}

// -- Centre placeholder --------------------------------------------------------

/// Placeholder detector: a square at the frame centre, 30% of the shorter
/// dimension on a side.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterFaceDetector;

impl FaceDetector for CenterFaceDetector {
    fn detect(&self, frame: &FrameBuffer) -> Option<FaceRegion> {
        if frame.is_empty() {
            return None;
        }
        let side = face_side(frame);
        let x = (frame.width() - side) / 2;
        let y = (frame.height() - side) / 2;
        Some(FaceRegion::new(x, y, side, side))
    }

    fn name(&self) -> &str {
        "center"
    }
}

// -- Darkest-region heuristic --------------------------------------------------

/// Looks for the darkest sample near the centre of the frame on a coarse grid
/// and reports a face there when it is dark enough.
///
/// Portrait subjects (hair, eyes, shadowed features) tend to be darker than
/// the washed-out surrounds of old prints.
#[derive(Debug, Clone, Copy, Default)]
pub struct DarkestRegionDetector;

impl FaceDetector for DarkestRegionDetector {
    fn detect(&self, frame: &FrameBuffer) -> Option<FaceRegion> {
        if frame.is_empty() {
            return None;
        }
        let (width, height) = frame.dimensions();
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let radius = width.min(height) as f64 * FACE_FRACTION;

        let x_range = search_range(cx, radius, width);
        let y_range = search_range(cy, radius, height);

        let mut darkest: Option<(u32, u32, f64)> = None;
        for y in y_range.clone().step_by(DARK_SEARCH_STEP) {
            for x in x_range.clone().step_by(DARK_SEARCH_STEP) {
                let darkness = 1.0 - frame.luma(x, y) / 255.0;
                if darkest.is_none_or(|(_, _, best)| darkness > best) {
                    darkest = Some((x, y, darkness));
                }
            }
        }

        let (px, py, darkness) = darkest?;
        trace!(px, py, darkness, "Darkest sample located");
        if darkness <= DARK_FACE_THRESHOLD {
            debug!(darkness, "Darkest sample too bright for a face");
            return None;
        }

        let side = face_side(frame);
        let x = px.saturating_sub(side / 2).min(width - side);
        let y = py.saturating_sub(side / 2).min(height - side);
        Some(FaceRegion::new(x, y, side, side))
    }

    fn name(&self) -> &str {
        "darkest_region"
    }
}

/// Integer sample positions in `[center - radius, center + radius)` that lie
/// inside `0..extent`.
fn search_range(center: f64, radius: f64, extent: u32) -> std::ops::Range<u32> {
    let start = (center - radius).floor().max(0.0) as u32;
    let end = ((center + radius).ceil().max(0.0) as u32).min(extent);
    start.min(end)..end
}
