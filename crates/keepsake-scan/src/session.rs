// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session: one captured photo and its latest processed result.

use keepsake_core::error::Result;
use keepsake_core::{FrameBuffer, ProcessingOptions};
use tracing::{debug, info};

use crate::detect::{CenterFaceDetector, FaceDetector};
use crate::pipeline::{ProcessedImage, ScanPipeline};

/// Holds the original capture so the user can toggle stages and compare
/// results.
///
/// Every [`reprocess`](Self::reprocess) starts again from the untouched
/// original; earlier results never feed into later ones, so lossy
/// adjustments do not compound.
pub struct ScanSession<D = CenterFaceDetector> {
    pipeline: ScanPipeline<D>,
    original: FrameBuffer,
    latest: Option<ProcessedImage>,
}

impl<D: FaceDetector> ScanSession<D> {
    // -- Construction ---------------------------------------------------------

    /// Start a session for a captured frame. Nothing is processed yet.
    pub fn new(pipeline: ScanPipeline<D>, original: FrameBuffer) -> Self {
        info!(
            width = original.width(),
            height = original.height(),
            "Scan session started"
        );
        Self {
            pipeline,
            original,
            latest: None,
        }
    }

    /// Start a session from raw RGBA bytes, rejecting malformed buffers.
    pub fn from_raw(
        pipeline: ScanPipeline<D>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self> {
        let original = FrameBuffer::from_slice(width, height, pixels)?;
        Ok(Self::new(pipeline, original))
    }

    // -- Accessors ------------------------------------------------------------

    pub fn original(&self) -> &FrameBuffer {
        &self.original
    }

    /// The most recent result, if the capture has been processed.
    pub fn latest(&self) -> Option<&ProcessedImage> {
        self.latest.as_ref()
    }

    // -- Processing -----------------------------------------------------------

    /// Process the original capture with `options`, replacing any previous
    /// result.
    pub fn reprocess(&mut self, options: ProcessingOptions) -> &ProcessedImage {
        debug!(?options, "Reprocessing from the original capture");
        let result = self.pipeline.process(&self.original, options);
        self.latest.insert(result)
    }

    /// Replace the capture with a new one and drop the old result.
    pub fn retake(&mut self, frame: FrameBuffer) {
        info!(width = frame.width(), height = frame.height(), "Capture retaken");
        self.original = frame;
        self.latest = None;
    }

    /// Consume the session and return the latest result.
    pub fn into_latest(self) -> Option<ProcessedImage> {
        self.latest
    }
}
