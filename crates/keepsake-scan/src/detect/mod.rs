// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection: locating the photo against its background, finding a face, and
// sampling the background brightness. Nothing here modifies pixels.

pub mod background;
pub mod edges;
pub mod face;

pub use background::{BackgroundInfo, analyze_background};
pub use edges::detect_photo_edges;
pub use face::{CenterFaceDetector, DarkestRegionDetector, FaceDetector};
