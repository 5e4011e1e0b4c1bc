// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// keepsake-scan: Photo digitization pipeline for Keepsake.
//
// Turns a raw camera frame of a printed photograph into a cleaned-up digital
// image: contrast-based edge cropping, face-aware 16:9 cropping, glare
// suppression and global contrast/brightness enhancement. Every stage is a
// pure buffer-in/buffer-out function over `keepsake_core::FrameBuffer`.

pub mod adjust;
pub mod codec;
pub mod crop;
pub mod detect;
pub mod pipeline;
pub mod session;

// Re-export the primary entry points so callers can use `keepsake_scan::ScanPipeline` etc.
pub use adjust::{enhance, remove_glare};
pub use crop::crop_to_aspect_focused_on_face;
pub use detect::{
    BackgroundInfo, CenterFaceDetector, DarkestRegionDetector, FaceDetector, analyze_background,
    detect_photo_edges,
};
pub use pipeline::{ProcessedImage, ScanMetadata, ScanPipeline, Stage, process};
pub use session::ScanSession;
