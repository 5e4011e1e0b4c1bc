// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tonal adjustments: glare suppression and contrast/brightness enhancement.
// Both are per-pixel transforms and run across rayon's thread pool.

pub mod enhance;
pub mod glare;

pub use enhance::enhance;
pub use glare::remove_glare;
