// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Keepsake photo pipeline.

use serde::{Deserialize, Serialize};

/// An axis-aligned crop region in pixel coordinates.
///
/// A rectangle is only meaningful relative to a frame; use
/// [`Rect::fits_within`] to check it against one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width` x `height` frame.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle is non-empty and lies entirely inside a
    /// `frame_width` x `frame_height` frame.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        !self.is_empty()
            && self.right() <= frame_width as u64
            && self.bottom() <= frame_height as u64
    }

    /// Clip the rectangle to a frame. Returns `None` when nothing non-empty
    /// survives the clip.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<Rect> {
        let x = self.x.min(frame_width);
        let y = self.y.min(frame_height);
        let right = self.right().min(frame_width as u64) as u32;
        let bottom = self.bottom().min(frame_height as u64) as u32;
        let clipped = Rect::new(x, y, right - x, bottom - y);
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Intersection of two rectangles, `None` when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x as u64 || bottom <= y as u64 {
            return None;
        }
        Some(Rect::new(x, y, (right - x as u64) as u32, (bottom - y as u64) as u32))
    }

    /// Whether `self` covers the entire `frame_width` x `frame_height` frame.
    pub fn is_full_frame(&self, frame_width: u32, frame_height: u32) -> bool {
        *self == Rect::full(frame_width, frame_height)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Where a face was found in a frame.
///
/// Detectors may report a zero-size region (a single point); consumers treat
/// that as a point at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point of the region in sub-pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Which pipeline stages run for one processing pass.
///
/// Missing fields deserialize to `true`, so `{"enhance": false}` disables only
/// enhancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessingOptions {
    /// Crop to the physical photo's edges against the background.
    pub auto_crop: bool,
    /// Attenuate overexposed highlights.
    pub remove_glare: bool,
    /// Apply the global contrast/brightness transform.
    pub enhance: bool,
    /// Crop to 16:9 around the detected face.
    pub face_aware_crop: bool,
}

impl ProcessingOptions {
    /// Every stage disabled; processing returns the original unchanged.
    pub fn none() -> Self {
        Self {
            auto_crop: false,
            remove_glare: false,
            enhance: false,
            face_aware_crop: false,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.auto_crop || self.remove_glare || self.enhance || self.face_aware_crop
    }
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            auto_crop: true,
            remove_glare: true,
            enhance: true,
            face_aware_crop: true,
        }
    }
}
