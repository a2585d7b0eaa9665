// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Built-in glyph width tables for the fonts the annotation engine measures
// against. Widths are in 1/1000 em-square units, indexed by WinAnsiEncoding
// character code, sourced from the Adobe AFM specifications. They serve two
// callers: glyph advances in the text-position index, and label measurement
// for the observation-block centring computation.

/// Glyph widths for one font, indexed by character code (0-255).
#[derive(Debug)]
pub struct FontWidths {
    widths: [u16; 256],
}

impl FontWidths {
    /// Width of one encoded character in 1/1000 em units.
    ///
    /// Codes without AFM data (control characters) fall back to 500, a
    /// mid-range guess that keeps bounding boxes sane on odd input.
    pub fn glyph(&self, code: u8) -> u16 {
        match self.widths[code as usize] {
            0 => 500,
            w => w,
        }
    }

    /// Width of a string at the given font size, in page units.
    ///
    /// Characters outside Latin-1 are measured at the fallback width; the
    /// documents this engine handles are Latin-script invoices.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| {
                if (c as u32) < 256 {
                    u32::from(self.glyph(c as u8))
                } else {
                    500
                }
            })
            .sum();
        units as f32 / 1000.0 * size
    }
}

/// Look up widths by PDF /BaseFont name.
///
/// Subset prefixes (`ABCDEF+Helvetica`) are stripped before matching.
/// Unknown fonts fall back to Helvetica, which is both the font the engine
/// writes with and a reasonable proportional-width stand-in.
pub fn lookup(base_font: &str) -> &'static FontWidths {
    let name = base_font
        .split_once('+')
        .map(|(_, rest)| rest)
        .unwrap_or(base_font);
    match name {
        "Helvetica" | "Helvetica-Oblique" | "Arial" | "ArialMT" => &HELVETICA,
        "Helvetica-Bold" | "Helvetica-BoldOblique" | "Arial-BoldMT" => &HELVETICA_BOLD,
        "Courier" | "Courier-Bold" | "Courier-Oblique" | "Courier-BoldOblique" => &COURIER,
        _ => &HELVETICA,
    }
}

/// Widths of the font the engine writes annotations with.
pub fn helvetica() -> &'static FontWidths {
    &HELVETICA
}

/// Helvetica ascender as a fraction of the font size (AFM: 718/1000).
pub const ASCENT: f32 = 0.718;
/// Helvetica descender as a fraction of the font size (AFM: 207/1000).
pub const DESCENT: f32 = 0.207;

// ---------------------------------------------------------------------------
// Width data
// ---------------------------------------------------------------------------

// Courier is monospaced at 600 units.
static COURIER: FontWidths = FontWidths {
    widths: [600; 256],
};

// Helvetica (also used for Helvetica-Oblique), Adobe AFM via WinAnsiEncoding.
#[rustfmt::skip]
static HELVETICA: FontWidths = FontWidths {
    widths: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        // space ! " # $ % & ' ( ) * + , - . /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9 : ; < = > ?
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        // @ A-O
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        // P-Z [ \ ] ^ _
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        // ` a-o
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        // p-z { | } ~ DEL
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
        556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
        278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
    ],
};

// Helvetica-Bold (also used for Helvetica-BoldOblique).
#[rustfmt::skip]
static HELVETICA_BOLD: FontWidths = FontWidths {
    widths: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
        556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
        278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
        611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
    ],
};
