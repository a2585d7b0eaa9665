// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Unified error types for Firmador.

use thiserror::Error;

/// Top-level error type for all Firmador operations.
#[derive(Debug, Error)]
pub enum FirmadorError {
    // -- Document errors --
    #[error("cannot process document: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Form errors --
    /// One aggregate condition listing every missing mandatory field, so the
    /// caller can report them all at once instead of failing field by field.
    #[error("incomplete form, missing: {}", .0.join(", "))]
    IncompleteForm(Vec<String>),

    #[error("invalid RUT: {0}")]
    InvalidRut(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FirmadorError>;
