// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Text-position index for one PDF page.
//
// A reduced content-stream interpreter walks the page's text operators
// (BT/ET, Tf, Td, TD, TL, Tm, T*, Tj, TJ, ', ", Tc, Tw) and records one
// positioned glyph per output character, with bounding boxes converted to
// top-left page coordinates (y increasing downward). Glyph advances come
// from the standard-14 AFM width tables in [`crate::fonts`], resolved per
// page through /Resources /Font /BaseFont.
//
// Deliberate simplifications, adequate for the unrotated single-column
// invoices this engine annotates:
// - the text matrix is tracked as a translation only (no rotation/skew);
// - string bytes are decoded as Latin-1, which matches WinAnsiEncoding for
//   the printable range the anchor labels use;
// - horizontal scaling (Tz) and rise (Ts) are ignored.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::warn;

use firmador_core::error::{FirmadorError, Result};
use firmador_core::types::Rect;

use crate::fonts::{self, FontWidths};

/// One positioned character on the page.
#[derive(Debug, Clone)]
struct Glyph {
    ch: char,
    rect: Rect,
}

/// Queryable text index of a single page.
///
/// Supports "find all occurrences of substring S, each as a bounding box in
/// page coordinates" — the contract the annotation engine locates its
/// anchors with.
pub struct PageText {
    glyphs: Vec<Glyph>,
    text: String,
    /// Maps each byte of `text` to the index of the glyph it came from.
    byte_to_glyph: Vec<usize>,
}

impl PageText {
    /// Build the index for `page_id`.
    ///
    /// `page_height` is needed to flip the PDF's bottom-left origin into
    /// top-left coordinates. A page without readable content produces an
    /// empty index (anchors simply come back absent), not an error.
    pub(crate) fn build(doc: &Document, page_id: ObjectId, page_height: f32) -> Result<Self> {
        let content_bytes = match doc.get_page_content(page_id) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%err, "page has no readable content stream");
                Vec::new()
            }
        };
        let content = Content::decode(&content_bytes)
            .map_err(|err| FirmadorError::PdfError(format!("content stream decode: {err}")))?;

        let font_map = page_font_widths(doc, page_id);
        let mut interp = Interpreter::new(page_height, font_map);
        for op in &content.operations {
            interp.step(&op.operator, &op.operands);
        }

        let glyphs = interp.glyphs;
        let mut text = String::with_capacity(glyphs.len());
        let mut byte_to_glyph = Vec::with_capacity(glyphs.len());
        for (i, g) in glyphs.iter().enumerate() {
            let start = text.len();
            text.push(g.ch);
            for _ in start..text.len() {
                byte_to_glyph.push(i);
            }
        }

        Ok(Self {
            glyphs,
            text,
            byte_to_glyph,
        })
    }

    /// Concatenated page text, with `\n` between separate text runs.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bounding box of the first occurrence of `label`, in document text
    /// order. Exact, case-sensitive substring match; `None` when absent.
    ///
    /// When a label appears more than once, the first occurrence wins. That
    /// is a deliberate simplification carried over from the document
    /// templates this engine targets; use [`PageText::find_all`] if the
    /// distinction matters.
    pub fn find(&self, label: &str) -> Option<Rect> {
        if label.is_empty() {
            return None;
        }
        self.text
            .find(label)
            .map(|start| self.union_bbox(start, label.len()))
    }

    /// Bounding boxes of every occurrence of `label`, in text order.
    pub fn find_all(&self, label: &str) -> Vec<Rect> {
        if label.is_empty() {
            return Vec::new();
        }
        self.text
            .match_indices(label)
            .map(|(start, matched)| self.union_bbox(start, matched.len()))
            .collect()
    }

    /// Union of the glyph boxes covering `len` bytes of `text` at `start`.
    fn union_bbox(&self, start: usize, len: usize) -> Rect {
        let mut bbox: Option<Rect> = None;
        let mut last_glyph = usize::MAX;
        for offset in start..start + len {
            let idx = self.byte_to_glyph[offset];
            if idx == last_glyph {
                continue;
            }
            last_glyph = idx;
            let rect = self.glyphs[idx].rect;
            bbox = Some(match bbox {
                Some(b) => b.union(&rect),
                None => rect,
            });
        }
        // `len > 0` is guaranteed by the callers, so there is always a glyph.
        bbox.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }
}

// ---------------------------------------------------------------------------
// Content-stream interpreter
// ---------------------------------------------------------------------------

struct Interpreter {
    page_height: f32,
    fonts: HashMap<Vec<u8>, &'static FontWidths>,
    widths: &'static FontWidths,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Start of the current text line, PDF coordinates (baseline).
    line_x: f32,
    line_y: f32,
    /// Current horizontal cursor.
    cur_x: f32,
    glyphs: Vec<Glyph>,
}

impl Interpreter {
    fn new(page_height: f32, fonts: HashMap<Vec<u8>, &'static FontWidths>) -> Self {
        Self {
            page_height,
            fonts,
            widths: fonts::helvetica(),
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            cur_x: 0.0,
            glyphs: Vec::new(),
        }
    }

    fn step(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "BT" => {
                self.line_x = 0.0;
                self.line_y = 0.0;
                self.cur_x = 0.0;
                self.push_separator();
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.widths = self
                        .fonts
                        .get(name.as_slice())
                        .copied()
                        .unwrap_or_else(fonts::helvetica);
                }
                self.font_size = operand_f32(operands.get(1));
            }
            "TL" => self.leading = operand_f32(operands.first()),
            "Tc" => self.char_spacing = operand_f32(operands.first()),
            "Tw" => self.word_spacing = operand_f32(operands.first()),
            "Td" => {
                let ty = operand_f32(operands.get(1));
                if ty != 0.0 {
                    self.push_separator();
                }
                self.line_x += operand_f32(operands.first());
                self.line_y += ty;
                self.cur_x = self.line_x;
            }
            "TD" => {
                let ty = operand_f32(operands.get(1));
                self.leading = -ty;
                if ty != 0.0 {
                    self.push_separator();
                }
                self.line_x += operand_f32(operands.first());
                self.line_y += ty;
                self.cur_x = self.line_x;
            }
            "Tm" => {
                let e = operand_f32(operands.get(4));
                let f = operand_f32(operands.get(5));
                if f != self.line_y {
                    self.push_separator();
                }
                self.line_x = e;
                self.line_y = f;
                self.cur_x = e;
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.emit(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.emit(bytes);
                }
            }
            "\"" => {
                self.word_spacing = operand_f32(operands.first());
                self.char_spacing = operand_f32(operands.get(1));
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.emit(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.emit(bytes),
                            // Positive adjustments move the cursor left.
                            other => {
                                self.cur_x -=
                                    operand_f32(Some(other)) / 1000.0 * self.font_size;
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        self.push_separator();
        self.line_y -= self.leading;
        self.cur_x = self.line_x;
    }

    /// Record a run separator so substring searches cannot silently bridge
    /// two unrelated text runs.
    fn push_separator(&mut self) {
        if matches!(self.glyphs.last(), Some(g) if g.ch != '\n') {
            let x = self.cur_x;
            let y = self.page_height - self.line_y;
            self.glyphs.push(Glyph {
                ch: '\n',
                rect: Rect::new(x, y, x, y),
            });
        }
    }

    /// Emit one glyph per byte of a shown string, Latin-1 decoded.
    fn emit(&mut self, bytes: &[u8]) {
        let ascent = fonts::ASCENT * self.font_size;
        let descent = fonts::DESCENT * self.font_size;
        let y0 = self.page_height - self.line_y - ascent;
        let y1 = self.page_height - self.line_y + descent;

        for &b in bytes {
            let glyph_width = f32::from(self.widths.glyph(b)) / 1000.0 * self.font_size;
            let mut advance = glyph_width + self.char_spacing;
            if b == b' ' {
                advance += self.word_spacing;
            }
            self.glyphs.push(Glyph {
                ch: b as char,
                rect: Rect::new(self.cur_x, y0, self.cur_x + glyph_width, y1),
            });
            self.cur_x += advance;
        }
    }
}

fn operand_f32(obj: Option<&Object>) -> f32 {
    match obj {
        Some(Object::Integer(i)) => *i as f32,
        Some(Object::Real(r)) => *r as f32,
        _ => 0.0,
    }
}

/// Resolve the page's font resources to width tables, keyed by resource
/// name. Fonts without AFM data fall back to Helvetica metrics.
fn page_font_widths(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, &'static FontWidths> {
    let mut map = HashMap::new();
    let Some(fonts_dict) = page_fonts_dict(doc, page_id) else {
        return map;
    };
    for (name, font_obj) in fonts_dict.iter() {
        let widths = resolve(doc, font_obj)
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|dict| dict.get(b"BaseFont").ok())
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| match obj {
                Object::Name(base) => Some(fonts::lookup(&String::from_utf8_lossy(base))),
                _ => None,
            })
            .unwrap_or_else(fonts::helvetica);
        map.insert(name.clone(), widths);
    }
    map
}

fn page_fonts_dict<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a lopdf::Dictionary> {
    let page = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let resources = resolve(doc, page.get(b"Resources").ok()?)?.as_dict().ok()?;
    resolve(doc, resources.get(b"Font").ok()?)?.as_dict().ok()
}

/// Follow at most a few levels of indirect references.
fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> Option<&'a Object> {
    for _ in 0..4 {
        match obj {
            Object::Reference(id) => obj = doc.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}
