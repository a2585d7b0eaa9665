// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Invoice-number extraction — a shallow text scan that pre-fills the
// document-number field. The result is a default suggestion only; the
// caller keeps the field editable and never treats this value as
// authoritative.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, instrument};

use firmador_core::error::Result;

use super::reader::InvoicePdf;

lazy_static! {
    /// Invoice-number marker followed by a 5-8 digit run, e.g. "Nº 123456",
    /// "N°123456", "No 123456", "Nro. 99999999". Longer alternatives come
    /// first so "Nro" is not half-consumed by "No".
    static ref INVOICE_NUMBER_RE: Regex =
        Regex::new(r"(?i)(?:N\.o|Nro\.?|Nº|N°|No)\s*([0-9]{5,8})").unwrap();
}

/// Scan every page's text, in document order, for the first invoice-number
/// marker and return its digit run.
///
/// `Ok(None)` means no page matched — that is a normal outcome, not an
/// error; only an undecodable document fails.
#[instrument(skip_all, fields(bytes_len = pdf_bytes.len()))]
pub fn extract_invoice_number(pdf_bytes: &[u8]) -> Result<Option<String>> {
    let pdf = InvoicePdf::from_bytes(pdf_bytes)?;
    for page_id in pdf.page_ids() {
        let text = pdf.page_text(page_id)?;
        if let Some(caps) = INVOICE_NUMBER_RE.captures(text.text()) {
            let number = caps[1].to_string();
            debug!(%number, "invoice number detected");
            return Ok(Some(number));
        }
    }
    debug!("no invoice number marker found");
    Ok(None)
}

/// Scan plain text for an invoice-number marker (the per-page primitive
/// behind [`extract_invoice_number`], useful on already-extracted text).
pub fn find_invoice_number(text: &str) -> Option<String> {
    INVOICE_NUMBER_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_with_ordinal_sign() {
        assert_eq!(find_invoice_number("FACTURA Nº 123456"), Some("123456".into()));
    }

    #[test]
    fn marker_nro_with_dot_and_eight_digits() {
        assert_eq!(
            find_invoice_number("Nro. 99999999 ELECTRONICA"),
            Some("99999999".into())
        );
    }

    #[test]
    fn marker_without_space() {
        assert_eq!(find_invoice_number("N°123456"), Some("123456".into()));
    }

    #[test]
    fn lowercase_marker_matches() {
        assert_eq!(find_invoice_number("no 55555"), Some("55555".into()));
    }

    #[test]
    fn too_few_digits_is_no_match() {
        assert_eq!(find_invoice_number("Nº 1234"), None);
    }

    #[test]
    fn text_without_marker_is_no_match() {
        assert_eq!(find_invoice_number("FACTURA ELECTRONICA 123456"), None);
    }
}
