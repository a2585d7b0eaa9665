// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Width the signature raster is scaled to when placed on the page
    /// (height follows from the source aspect ratio).
    pub signature_width: f32,
    /// Font size for field values written next to their anchor labels.
    pub field_font_size: f32,
    /// Font size for the free text inside the observation box.
    pub observation_font_size: f32,
    /// Width of the bordered observation box.
    pub observation_box_width: f32,
    /// Height of the bordered observation box.
    pub observation_box_height: f32,
    /// Initials of the signers that appear in output filenames.
    pub signer_initials: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            signature_width: 120.0,
            field_font_size: 11.0,
            observation_font_size: 10.0,
            observation_box_width: 280.0,
            observation_box_height: 45.0,
            signer_initials: vec!["FVM".to_string(), "JSC".to_string()],
        }
    }
}
