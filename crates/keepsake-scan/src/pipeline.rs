// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestration: runs the enabled stages over a capture in a fixed
// order and reports what was done.

use keepsake_core::error::Result;
use keepsake_core::{FaceRegion, FrameBuffer, ProcessingOptions, Rect};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::adjust::{enhance, remove_glare};
use crate::crop::{TARGET_ASPECT, crop_to_aspect_focused_on_face};
use crate::detect::{
    BackgroundInfo, CenterFaceDetector, FaceDetector, analyze_background, detect_photo_edges,
};

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AutoCrop,
    FaceAwareCrop,
    RemoveGlare,
    Enhance,
}

/// What the pipeline found and did for one capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Final width in pixels.
    pub width: u32,
    /// Final height in pixels.
    pub height: u32,
    /// `width / height`, or 0 for an empty result.
    pub aspect_ratio: f64,
    /// Photo edges found in the original capture, if any.
    pub edge_crop: Option<Rect>,
    /// Detected face, in the coordinates of the final image. `None` if no
    /// face was detected or the crop cut it off.
    pub face: Option<FaceRegion>,
    /// Aspect crop applied to the edge-cropped frame, if any.
    pub face_crop: Option<Rect>,
    /// Border brightness of the original capture.
    pub background: BackgroundInfo,
    /// Stages that changed the image, in order.
    pub stages: Vec<Stage>,
}

impl ScanMetadata {
    /// Metadata for `frame` as it stands, before any stage has touched it.
    fn unprocessed(frame: &FrameBuffer, background: BackgroundInfo) -> Self {
        let (width, height) = frame.dimensions();
        let aspect_ratio = if height == 0 {
            0.0
        } else {
            width as f64 / height as f64
        };
        Self {
            width,
            height,
            aspect_ratio,
            edge_crop: None,
            face: None,
            face_crop: None,
            background,
            stages: Vec::new(),
        }
    }
}

/// The result of one pipeline run: the final frame and the options that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    frame: FrameBuffer,
    options: ProcessingOptions,
    metadata: ScanMetadata,
}

impl ProcessedImage {
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn options(&self) -> ProcessingOptions {
        self.options
    }

    pub fn metadata(&self) -> &ScanMetadata {
        &self.metadata
    }

    /// Consume the result and return the final frame.
    pub fn into_frame(self) -> FrameBuffer {
        self.frame
    }
}

/// Sequences crop → face-crop → glare removal → enhancement over a capture.
///
/// The pipeline holds no per-capture state: every call works on its own copy
/// of the input, so one pipeline can serve many threads and repeated calls
/// with the same arguments produce identical output.
#[derive(Debug, Clone, Default)]
pub struct ScanPipeline<D = CenterFaceDetector> {
    detector: D,
}

impl ScanPipeline<CenterFaceDetector> {
    /// A pipeline backed by the centre-of-frame face placeholder.
    pub fn new() -> Self {
        Self::with_detector(CenterFaceDetector)
    }
}

impl<D: FaceDetector> ScanPipeline<D> {
    // -- Construction ---------------------------------------------------------

    pub fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    // -- Processing -----------------------------------------------------------

    /// Validate a raw RGBA buffer and process it.
    ///
    /// A buffer whose length disagrees with `width * height * 4` is rejected
    /// with `KeepsakeError::InvalidBuffer` before any stage runs.
    pub fn process_raw(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        options: ProcessingOptions,
    ) -> Result<ProcessedImage> {
        let original = FrameBuffer::from_slice(width, height, pixels)
            .inspect_err(|err| warn!(error = %err, "Rejecting malformed capture"))?;
        Ok(self.process(&original, options))
    }

    /// Run the enabled stages over `original`.
    ///
    /// Stages that cannot proceed (no edges, no face, degenerate crop) pass
    /// the image through unchanged. `original` is never modified; to try other
    /// options, call this again with the same original.
    #[instrument(
        skip(self, original),
        fields(width = original.width(), height = original.height(), detector = self.detector.name())
    )]
    pub fn process(&self, original: &FrameBuffer, options: ProcessingOptions) -> ProcessedImage {
        info!(?options, "Processing capture");

        let background = analyze_background(original);
        if !options.any_enabled() {
            debug!("Every stage disabled; returning the capture unchanged");
            return ProcessedImage {
                frame: original.clone(),
                options,
                metadata: ScanMetadata::unprocessed(original, background),
            };
        }

        let mut current = original.clone();
        let mut stages = Vec::new();
        let mut edge_crop = None;
        let mut face = None;
        let mut face_crop = None;

        // Step 1: crop to the physical photo.
        if options.auto_crop {
            edge_crop = detect_photo_edges(&current);
            match edge_crop {
                Some(rect) if rect.is_full_frame(current.width(), current.height()) => {
                    debug!("Photo fills the frame; nothing to crop");
                }
                Some(rect) => {
                    if apply_crop(&mut current, &rect) {
                        stages.push(Stage::AutoCrop);
                    }
                }
                None => info!("No photo edges found; keeping the full frame"),
            }
        }

        // Step 2: 16:9 crop around the face.
        if options.face_aware_crop && !current.is_empty() {
            match self.detector.detect(&current) {
                Some(found) => {
                    debug!(?found, "Face detected");
                    face = Some(found);
                    match crop_to_aspect_focused_on_face(&current, &found, TARGET_ASPECT) {
                        Some(rect) => {
                            face_crop = Some(rect);
                            face = face_within(&found, &rect);
                            if !rect.is_full_frame(current.width(), current.height())
                                && apply_crop(&mut current, &rect)
                            {
                                stages.push(Stage::FaceAwareCrop);
                            }
                        }
                        None => warn!("Face-aware crop is degenerate; skipping"),
                    }
                }
                None => info!("No face detected; skipping face-aware crop"),
            }
        }

        // Step 3: glare.
        if options.remove_glare {
            let next = remove_glare(&current);
            if next != current {
                stages.push(Stage::RemoveGlare);
                current = next;
            }
        }

        // Step 4: contrast/brightness.
        if options.enhance {
            let next = enhance(&current);
            if next != current {
                stages.push(Stage::Enhance);
                current = next;
            }
        }

        let metadata = ScanMetadata {
            edge_crop,
            face,
            face_crop,
            stages,
            ..ScanMetadata::unprocessed(&current, background)
        };
        info!(
            width = metadata.width,
            height = metadata.height,
            stages = ?metadata.stages,
            "Capture processed"
        );

        ProcessedImage {
            frame: current,
            options,
            metadata,
        }
    }

    /// Process independent captures in parallel. Results are in input order
    /// and identical to processing each capture alone.
    #[instrument(skip_all, fields(count = frames.len()))]
    pub fn process_batch(
        &self,
        frames: &[FrameBuffer],
        options: ProcessingOptions,
    ) -> Vec<ProcessedImage> {
        frames
            .par_iter()
            .map(|frame| self.process(frame, options))
            .collect()
    }
}

/// Process `original` with `options` using `detector` for face detection.
pub fn process(
    original: &FrameBuffer,
    options: ProcessingOptions,
    detector: &impl FaceDetector,
) -> ProcessedImage {
    ScanPipeline::with_detector(detector).process(original, options)
}

/// Replace `frame` with its `rect` sub-image. Leaves `frame` alone and
/// returns false when the rectangle does not fit.
fn apply_crop(frame: &mut FrameBuffer, rect: &Rect) -> bool {
    match frame.crop(rect) {
        Some(cropped) => {
            debug!(%rect, "Cropped");
            *frame = cropped;
            true
        }
        None => {
            warn!(%rect, "Crop rectangle is degenerate; skipping");
            false
        }
    }
}

/// Re-express `face` relative to `crop`, clipped to it.
fn face_within(face: &FaceRegion, crop: &Rect) -> Option<FaceRegion> {
    if face.is_degenerate() {
        let inside = face.x >= crop.x
            && (face.x as u64) < crop.right()
            && face.y >= crop.y
            && (face.y as u64) < crop.bottom();
        return inside.then(|| FaceRegion::new(face.x - crop.x, face.y - crop.y, 0, 0));
    }
    let visible = face.as_rect().intersect(crop)?;
    Some(FaceRegion::new(
        visible.x - crop.x,
        visible.y - crop.y,
        visible.width,
        visible.height,
    ))
}
