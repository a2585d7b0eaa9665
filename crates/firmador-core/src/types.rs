// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Core domain types for the Firmador annotation engine.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates.
///
/// The origin is the top-left corner of the page with y increasing downward,
/// matching the coordinate system of the text-position index. Conversion to
/// PDF's bottom-left origin happens only at content-stream emission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One text field to write next to a located anchor label.
///
/// The insertion point is derived from the anchor box at write time
/// (`anchor.x1 + offset_x`, `anchor.y0 + offset_y`), never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Literal label text to locate on the page (e.g. `"Nombre:"`).
    pub label: String,
    /// Value to write next to the label. Empty values are skipped.
    pub value: String,
    /// Horizontal offset from the right edge of the anchor box.
    pub offset_x: f32,
    /// Vertical offset from the top edge of the anchor box.
    pub offset_y: f32,
}

impl FieldSpec {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        offset_x: f32,
        offset_y: f32,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            offset_x,
            offset_y,
        }
    }
}
