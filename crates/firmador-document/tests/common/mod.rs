// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Shared fixture builder: synthetic invoice PDFs with Helvetica text runs
// at known positions, built directly with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// One text run placed on a fixture page, `x`/`y` in PDF coordinates
/// (bottom-left origin, `y` is the baseline).
pub struct Run {
    pub text: &'static str,
    pub x: f32,
    pub y: f32,
}

impl Run {
    pub fn new(text: &'static str, x: f32, y: f32) -> Self {
        Self { text, x, y }
    }
}

/// Encode text as Latin-1 bytes, the encoding the engine's text index
/// assumes for WinAnsi fonts.
pub fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b'?' })
        .collect()
}

/// Build a PDF with one page per entry of `pages`, each page US Letter with
/// an 11 pt Helvetica font under /F1 and the given text runs.
pub fn fixture_pdf(pages: &[Vec<Run>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::new();
    for runs in pages {
        let mut operations = Vec::new();
        for run in runs {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(run.x), Object::Real(run.y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(latin1(run.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode fixture content"),
        ));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(page_tree_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        page_tree_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(page_count)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(page_tree_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("save fixture PDF");
    output
}

/// A single-page fixture carrying every anchor label the engine knows.
pub fn invoice_fixture() -> Vec<u8> {
    fixture_pdf(&[vec![
        Run::new("Nombre:", 60.0, 700.0),
        Run::new("Recinto:", 60.0, 680.0),
        Run::new("RUT:", 60.0, 660.0),
        Run::new("Fecha:", 60.0, 640.0),
        Run::new("Firma", 400.0, 200.0),
        Run::new("CEDIBLE", 270.0, 120.0),
    ]])
}

/// Re-serialise a document unchanged, for byte-identical no-op comparisons.
pub fn round_trip(bytes: &[u8]) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).expect("load round-trip fixture");
    let mut output = Vec::new();
    doc.save_to(&mut output).expect("save round-trip fixture");
    output
}
