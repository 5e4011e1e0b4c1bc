// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face-aware cropping: trims a frame to a target aspect ratio while keeping
// the detected face as close to the centre of the crop as the frame allows.

use keepsake_core::{FaceRegion, FrameBuffer, Rect};
use tracing::{debug, instrument, warn};

/// Slideshow aspect ratio (16:9).
pub const TARGET_ASPECT: f64 = 16.0 / 9.0;

/// Absorbs float error when a product lands just under an integer.
const LENGTH_EPSILON: f64 = 1e-9;

/// Compute a `target_aspect` crop of `frame` centred on `face`.
///
/// See [`aspect_crop_rect`]; this is the same computation over a frame's
/// dimensions.
pub fn crop_to_aspect_focused_on_face(
    frame: &FrameBuffer,
    face: &FaceRegion,
    target_aspect: f64,
) -> Option<Rect> {
    aspect_crop_rect(frame.width(), frame.height(), face, target_aspect)
}

/// Compute a `target_aspect` crop of a `width` x `height` frame centred on
/// `face`.
///
/// A frame wider than the target keeps its full height and loses columns; a
/// frame as tall or taller keeps its full width and loses rows. The crop is
/// first centred on the face's midpoint and only then clamped into the frame,
/// so a face near an edge pulls the crop against that edge instead of pushing
/// it out of bounds. A zero-size face is treated as a point.
///
/// Returns `None` for degenerate geometry: an empty frame, a non-positive or
/// non-finite aspect, or a crop that rounds down to zero width or height.
#[instrument(skip(face), fields(face_x = face.x, face_y = face.y))]
pub fn aspect_crop_rect(
    width: u32,
    height: u32,
    face: &FaceRegion,
    target_aspect: f64,
) -> Option<Rect> {
    if width == 0 || height == 0 || !target_aspect.is_finite() || target_aspect <= 0.0 {
        warn!("Cannot compute an aspect crop for this geometry");
        return None;
    }

    let (face_cx, face_cy) = face.center();
    let frame_aspect = width as f64 / height as f64;

    let rect = if frame_aspect > target_aspect {
        // Wider than target: trim the sides.
        let crop_w = floor_len(height as f64 * target_aspect).min(width);
        let x = centered_offset(face_cx, crop_w, width);
        Rect::new(x, 0, crop_w, height)
    } else {
        // Taller or equal: trim top and bottom.
        let crop_h = floor_len(width as f64 / target_aspect).min(height);
        let y = centered_offset(face_cy, crop_h, height);
        Rect::new(0, y, width, crop_h)
    };

    let clamped = rect.clamp_to(width, height);
    match clamped {
        Some(r) => debug!(rect = %r, "Aspect crop computed"),
        None => warn!(%rect, "Aspect crop collapsed to zero size"),
    }
    clamped
}

fn floor_len(value: f64) -> u32 {
    (value + LENGTH_EPSILON).floor() as u32
}

/// Offset placing a span of `len` centred on `center`, clamped to
/// `[0, extent - len]`.
fn centered_offset(center: f64, len: u32, extent: u32) -> u32 {
    let max = extent.saturating_sub(len);
    let ideal = center - len as f64 / 2.0;
    (ideal.clamp(0.0, max as f64).round() as u32).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_frame_centred_face() {
        let face = FaceRegion::new(35, 35, 30, 30);
        let rect = aspect_crop_rect(100, 100, &face, TARGET_ASPECT).unwrap();
        // 100 / (16/9) = 56.25 → 56 rows, centred on y = 50.
        assert_eq!(rect, Rect::new(0, 22, 100, 56));
    }

    #[test]
    fn face_near_top_clamps_to_zero() {
        let face = FaceRegion::new(40, 0, 20, 10);
        let rect = aspect_crop_rect(100, 100, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 100, 56));
    }

    #[test]
    fn face_near_bottom_clamps_to_max_offset() {
        let face = FaceRegion::new(40, 90, 20, 10);
        let rect = aspect_crop_rect(100, 100, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect, Rect::new(0, 44, 100, 56));
    }

    #[test]
    fn wide_frame_trims_columns_around_face() {
        // 400x100 is 4:1; target width = 100 * 16/9 = 177.
        let face = FaceRegion::new(300, 40, 20, 20);
        let rect = aspect_crop_rect(400, 100, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect.width, 177);
        assert_eq!(rect.height, 100);
        // Centre 310 - 88.5 = 221.5, within [0, 223].
        assert_eq!(rect.x, 222);
        assert!(rect.fits_within(400, 100));
    }

    #[test]
    fn wide_frame_face_at_right_edge() {
        let face = FaceRegion::new(399, 50, 1, 1);
        let rect = aspect_crop_rect(400, 100, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect.x + rect.width, 400);
    }

    #[test]
    fn matching_aspect_keeps_whole_frame() {
        let face = FaceRegion::new(0, 0, 0, 0);
        let rect = aspect_crop_rect(160, 90, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect, Rect::full(160, 90));
    }

    #[test]
    fn degenerate_face_still_gives_valid_crop() {
        let face = FaceRegion::new(50, 50, 0, 0);
        let rect = aspect_crop_rect(100, 100, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect, Rect::new(0, 22, 100, 56));
    }

    #[test]
    fn face_outside_frame_is_clamped() {
        let face = FaceRegion::new(5000, 5000, 10, 10);
        let rect = aspect_crop_rect(100, 100, &face, TARGET_ASPECT).unwrap();
        assert_eq!(rect, Rect::new(0, 44, 100, 56));
    }

    #[test]
    fn sliver_frame_is_degenerate() {
        let face = FaceRegion::new(0, 0, 1, 1);
        // 1 / (16/9) rounds down to zero rows.
        assert_eq!(aspect_crop_rect(1, 1000, &face, TARGET_ASPECT), None);
        assert_eq!(aspect_crop_rect(0, 10, &face, TARGET_ASPECT), None);
        assert_eq!(aspect_crop_rect(10, 10, &face, 0.0), None);
        assert_eq!(aspect_crop_rect(10, 10, &face, f64::NAN), None);
    }

    #[test]
    fn crops_always_fit_the_frame() {
        for (w, h) in [(1u32, 1u32), (2, 1), (17, 3), (640, 480), (480, 640), (1920, 1080), (3, 4000)] {
            for (fx, fy) in [(0, 0), (w / 2, h / 2), (w, h), (w.saturating_sub(1), 0)] {
                let face = FaceRegion::new(fx, fy, 7, 7);
                if let Some(rect) = aspect_crop_rect(w, h, &face, TARGET_ASPECT) {
                    assert!(rect.fits_within(w, h), "{rect} escapes {w}x{h}");
                }
            }
        }
    }
}
