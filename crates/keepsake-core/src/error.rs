// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Keepsake.

use thiserror::Error;

/// Top-level error type for all Keepsake operations.
///
/// Detection misses and degenerate crop geometry are deliberately absent: the
/// pipeline recovers from those locally and never surfaces them to callers.
#[derive(Debug, Error)]
pub enum KeepsakeError {
    // -- Input errors --
    #[error(
        "malformed frame buffer: {width}x{height} needs {expected} bytes, got {actual}"
    )]
    InvalidBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    // -- Codec errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KeepsakeError {
    /// True when the error means the supplied pixel data itself is corrupt,
    /// as opposed to a failure elsewhere in the surrounding flow.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, KeepsakeError::InvalidBuffer { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KeepsakeError>;
