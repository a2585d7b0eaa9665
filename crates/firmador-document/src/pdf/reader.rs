// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// PDF reader — open and inspect the invoice document using the `lopdf`
// crate. The document is decoded once per annotation call and serialised
// back to bytes at the end; the input buffer is never mutated in place.

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, instrument};

use firmador_core::error::{FirmadorError, Result};

use super::text_index::PageText;

/// An invoice document loaded into memory.
///
/// Wraps `lopdf::Document` and provides the handful of operations the
/// annotation engine needs: page lookup, media-box resolution, a
/// text-position index per page, and re-serialisation.
pub struct InvoicePdf {
    pub(crate) document: Document,
}

impl InvoicePdf {
    /// Decode a PDF from raw bytes.
    ///
    /// Failure here is the single fatal "cannot process document"
    /// condition: no partial output is ever produced from an undecodable
    /// input.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| FirmadorError::PdfError(format!("failed to decode PDF: {err}")))?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object IDs in document order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().into_values().collect()
    }

    /// Object ID of the last page — the only page the engine annotates.
    pub fn last_page_id(&self) -> Result<ObjectId> {
        self.document
            .get_pages()
            .into_values()
            .last()
            .ok_or_else(|| FirmadorError::PdfError("document has no pages".to_string()))
    }

    /// Resolve a page's /MediaBox as `[x0, y0, x1, y1]` in PDF coordinates.
    ///
    /// Handles both inline and referenced arrays and walks up the page tree
    /// with a depth limit; pages without a resolvable media box default to
    /// US Letter.
    pub fn media_box(&self, page_id: ObjectId) -> Result<[f32; 4]> {
        let page = self
            .document
            .get_object(page_id)
            .map_err(|err| FirmadorError::PdfError(format!("cannot read page object: {err}")))?;
        Ok(media_box_recursive(&self.document, page, 10))
    }

    /// Page extent as (width, height).
    pub fn page_size(&self, page_id: ObjectId) -> Result<(f32, f32)> {
        let mb = self.media_box(page_id)?;
        Ok((mb[2] - mb[0], mb[3] - mb[1]))
    }

    /// Build the text-position index for a page.
    pub fn page_text(&self, page_id: ObjectId) -> Result<PageText> {
        let (_, height) = self.page_size(page_id)?;
        PageText::build(&self.document, page_id, height)
    }

    /// Serialise the document to a fresh byte buffer.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|err| FirmadorError::PdfError(format!("failed to serialise PDF: {err}")))?;
        Ok(output)
    }
}

fn media_box_recursive(doc: &Document, page_obj: &Object, depth: usize) -> [f32; 4] {
    const LETTER: [f32; 4] = [0.0, 0.0, 612.0, 792.0];
    if depth == 0 {
        return LETTER;
    }

    if let Object::Dictionary(dict) = page_obj {
        if let Ok(mb) = dict.get(b"MediaBox") {
            let arr = match mb {
                Object::Array(arr) => Some(arr),
                Object::Reference(id) => match doc.get_object(*id) {
                    Ok(Object::Array(arr)) => Some(arr),
                    _ => None,
                },
                _ => None,
            };
            if let Some(arr) = arr {
                let values: Vec<f32> = arr
                    .iter()
                    .filter_map(|o| match o {
                        Object::Integer(i) => Some(*i as f32),
                        Object::Real(r) => Some(*r as f32),
                        _ => None,
                    })
                    .collect();
                if values.len() == 4 {
                    return [values[0], values[1], values[2], values[3]];
                }
            }
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            if let Ok(parent) = doc.get_object(*parent_id) {
                return media_box_recursive(doc, parent, depth - 1);
            }
        }
    }

    LETTER
}
