// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Anchor location and invoice-number extraction over synthetic documents.

mod common;

use common::{fixture_pdf, Run};
use firmador_document::{extract_invoice_number, InvoicePdf};

// Helvetica ascent fraction used by the text index (AFM 718/1000).
const ASCENT: f32 = 0.718;

#[test]
fn locate_returns_box_of_known_label() {
    let bytes = fixture_pdf(&[vec![Run::new("RUT:", 100.0, 700.0)]]);
    let pdf = InvoicePdf::from_bytes(&bytes).unwrap();
    let page_id = pdf.last_page_id().unwrap();
    let text = pdf.page_text(page_id).unwrap();

    let anchor = text.find("RUT:").expect("label should be found");
    assert!((anchor.x0 - 100.0).abs() < 1e-3);
    // R(722) U(722) T(611) :(278) = 2333/1000 em at 11 pt.
    assert!((anchor.width() - 2.333 * 11.0).abs() < 0.01);
    // Top edge sits one ascent above the baseline, in top-left coordinates.
    let expected_y0 = 792.0 - 700.0 - ASCENT * 11.0;
    assert!((anchor.y0 - expected_y0).abs() < 0.01);
}

#[test]
fn locate_missing_label_is_absent() {
    let bytes = fixture_pdf(&[vec![Run::new("RUT:", 100.0, 700.0)]]);
    let pdf = InvoicePdf::from_bytes(&bytes).unwrap();
    let text = pdf.page_text(pdf.last_page_id().unwrap()).unwrap();
    assert!(text.find("NoSuchLabel").is_none());
}

#[test]
fn locate_duplicated_label_returns_first_in_text_order() {
    let bytes = fixture_pdf(&[vec![
        Run::new("Fecha:", 60.0, 700.0),
        Run::new("Fecha:", 60.0, 300.0),
    ]]);
    let pdf = InvoicePdf::from_bytes(&bytes).unwrap();
    let text = pdf.page_text(pdf.last_page_id().unwrap()).unwrap();

    let first = text.find("Fecha:").unwrap();
    let all = text.find_all("Fecha:");
    assert_eq!(all.len(), 2);
    assert_eq!(first, all[0]);
    // The first run in content order is the higher one on the page.
    assert!(all[0].y0 < all[1].y0);
}

#[test]
fn search_does_not_bridge_separate_runs() {
    // "Fec" and "ha:" are different runs on different lines; the index must
    // not let a substring match span them.
    let bytes = fixture_pdf(&[vec![
        Run::new("Fec", 60.0, 700.0),
        Run::new("ha:", 60.0, 680.0),
    ]]);
    let pdf = InvoicePdf::from_bytes(&bytes).unwrap();
    let text = pdf.page_text(pdf.last_page_id().unwrap()).unwrap();
    assert!(text.find("Fecha:").is_none());
}

#[test]
fn page_count_and_last_page() {
    let bytes = fixture_pdf(&[
        vec![Run::new("primera", 50.0, 700.0)],
        vec![Run::new("ultima", 50.0, 700.0)],
    ]);
    let pdf = InvoicePdf::from_bytes(&bytes).unwrap();
    assert_eq!(pdf.page_count(), 2);
    let text = pdf.page_text(pdf.last_page_id().unwrap()).unwrap();
    assert!(text.find("ultima").is_some());
    assert!(text.find("primera").is_none());
}

#[test]
fn undecodable_document_is_fatal() {
    assert!(InvoicePdf::from_bytes(b"not a pdf at all").is_err());
}

#[test]
fn invoice_number_with_ordinal_marker() {
    let bytes = fixture_pdf(&[vec![Run::new("FACTURA ELECTRONICA Nº 123456", 50.0, 740.0)]]);
    assert_eq!(
        extract_invoice_number(&bytes).unwrap(),
        Some("123456".to_string())
    );
}

#[test]
fn invoice_number_nro_dot_eight_digits() {
    let bytes = fixture_pdf(&[vec![Run::new("Nro. 99999999", 50.0, 740.0)]]);
    assert_eq!(
        extract_invoice_number(&bytes).unwrap(),
        Some("99999999".to_string())
    );
}

#[test]
fn invoice_number_absent_without_marker() {
    let bytes = fixture_pdf(&[vec![Run::new("GUIA DE DESPACHO 123456", 50.0, 740.0)]]);
    assert_eq!(extract_invoice_number(&bytes).unwrap(), None);
}

#[test]
fn invoice_number_first_page_wins() {
    let bytes = fixture_pdf(&[
        vec![Run::new("Nº 111111", 50.0, 740.0)],
        vec![Run::new("Nº 222222", 50.0, 740.0)],
    ]);
    assert_eq!(
        extract_invoice_number(&bytes).unwrap(),
        Some("111111".to_string())
    );
}
