// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for families digitizing printed photos.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the capture UI presents the message.

use crate::error::KeepsakeError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something on this device hiccupped; trying again may work.
    Transient,
    /// The user must do something (retake the photo, pick another file).
    ActionRequired,
    /// Cannot be fixed by retrying: a broken setting or unsupported data.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the operation can simply be retried.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `KeepsakeError` into a `HumanError`.
pub fn humanize_error(err: &KeepsakeError) -> HumanError {
    match err {
        KeepsakeError::InvalidBuffer { .. } => HumanError {
            message: "This photo's image data is damaged.".into(),
            suggestion: "Please take the picture again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        KeepsakeError::ImageError(detail) => {
            if detail.contains("decode") || detail.contains("open") {
                HumanError {
                    message: "We couldn't read this picture.".into(),
                    suggestion: "Try a JPEG or PNG photo, or scan the print again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "We couldn't save the finished photo.".into(),
                    suggestion: "Please try again in a moment.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        KeepsakeError::Config(_) | KeepsakeError::Serialization(_) => HumanError {
            message: "A scanner setting is not valid.".into(),
            suggestion: "Reset the scanner settings to their defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        KeepsakeError::Io(io) => match io.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "We couldn't find that photo.".into(),
                suggestion: "Check that the file still exists and choose it again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We aren't allowed to use that file.".into(),
                suggestion: "Choose a different folder or allow access to your photos.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "Something went wrong while reading or saving.".into(),
                suggestion: "Please try again.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },
    }
}
