// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration, persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ProcessingOptions;

/// Encoded format for processed photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Guess the format from a file extension (`png`, `jpg`, `jpeg`).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Which face-detection stand-in backs the face-aware crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceDetectorKind {
    /// Square at the frame centre.
    #[default]
    Center,
    /// Darkest point near the centre, if dark enough.
    DarkestRegion,
}

/// Persistent scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Stage toggles applied to every capture.
    pub options: ProcessingOptions,
    /// Encoding for processed photos.
    pub output_format: OutputFormat,
    /// JPEG quality (1-100). Ignored for PNG.
    pub jpeg_quality: u8,
    /// Face detector used for face-aware cropping.
    pub face_detector: FaceDetectorKind,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            options: ProcessingOptions::default(),
            output_format: OutputFormat::Jpeg,
            jpeg_quality: 90,
            face_detector: FaceDetectorKind::Center,
        }
    }
}

impl ScanConfig {
    /// Read a config file. Out-of-range values are normalised.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: ScanConfig = serde_json::from_str(&data)?;
        Ok(config.normalized())
    }

    /// Read a config file, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match std::fs::metadata(path.as_ref()) {
            Ok(_) => Self::load(path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Clamp `jpeg_quality` into 1..=100.
    pub fn normalized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }
}
