// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// firmador-document — PDF field-annotation engine for Firmador.
//
// Given an invoice PDF and a set of textual anchors on its final page, the
// engine locates each anchor, computes an insertion point relative to it,
// and overlays typed content (field values, the signature raster, a
// bordered observation block) without disturbing the rest of the document.

pub mod fonts;
pub mod form;
pub mod pdf;

// Re-export the primary types so callers can use `firmador_document::Annotator` etc.
pub use form::InvoiceForm;
pub use pdf::annotate::{AnnotateOptions, Annotator, InvoiceFields, SignatureImage};
pub use pdf::invoice::extract_invoice_number;
pub use pdf::reader::InvoicePdf;
pub use pdf::text_index::PageText;
