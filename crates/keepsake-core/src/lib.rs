// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Keepsake: Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod frame;
pub mod human_errors;
pub mod types;

pub use config::ScanConfig;
pub use error::KeepsakeError;
pub use frame::FrameBuffer;
pub use types::*;
