// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Annotation engine — overlays field values, the signature raster, and the
// optional observation block onto the last page of an invoice PDF.
//
// All geometry is computed in top-left page coordinates (matching the
// text-position index) and converted to PDF's bottom-left origin only when
// content-stream operators are emitted. Each call decodes the input bytes,
// appends one content stream to the last page, and serialises a fresh
// output buffer; the input is never mutated.

use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument};

use firmador_core::config::AppConfig;
use firmador_core::error::{FirmadorError, Result};
use firmador_core::types::{FieldSpec, Rect};

use crate::fonts;
use super::reader::InvoicePdf;

/// Resource names for the objects the engine adds to the page.
const FONT_RES_NAME: &str = "FfHelv";
const SIGNATURE_RES_NAME: &str = "FfSig";

/// Horizontal shift of the signature from the left edge of its anchor.
const SIGNATURE_DX: f32 = 10.0;
/// Upward shift of the signature from the top edge of its anchor — the
/// signature is drawn above the "Firma" label, not below it.
const SIGNATURE_DY: f32 = -20.0;
/// Gap between the observation label and its bordered box.
const OBSERVATION_GAP: f32 = 10.0;
/// Vertical distance from the bottom of the CEDIBLE anchor to the block.
const OBSERVATION_DROP: f32 = 10.0;
/// Inset of the observation text inside its box.
const OBSERVATION_INSET: f32 = 4.0;

/// The four client fields written next to their anchor labels.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFields {
    pub nombre: String,
    pub recinto: String,
    pub rut: String,
    pub fecha: String,
}

impl InvoiceFields {
    /// Per-field anchor labels and fixed offsets, in write order.
    fn to_specs(&self) -> [FieldSpec; 4] {
        [
            FieldSpec::new("Nombre:", self.nombre.clone(), 15.0, 4.0),
            FieldSpec::new("Recinto:", self.recinto.clone(), 15.0, 7.0),
            FieldSpec::new("RUT:", self.rut.clone(), 5.0, 4.0),
            FieldSpec::new("Fecha:", self.fecha.clone(), 20.0, 8.0),
        ]
    }
}

/// A decoded signature raster, RGBA with the alpha channel preserved.
pub struct SignatureImage {
    image: RgbaImage,
}

impl SignatureImage {
    /// Decode from encoded bytes (PNG etc.), converting to RGBA.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| FirmadorError::ImageError(format!("failed to decode image: {err}")))?;
        Ok(Self {
            image: img.to_rgba8(),
        })
    }

    /// Wrap an already-decoded RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Tunable knobs of one annotation run.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// Width the signature is scaled to; height follows the aspect ratio.
    pub signature_width: f32,
    /// Font size for field values.
    pub field_font_size: f32,
    /// Font size for the observation free text.
    pub observation_font_size: f32,
    /// Observation box width.
    pub observation_box_width: f32,
    /// Observation box height.
    pub observation_box_height: f32,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AnnotateOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            signature_width: config.signature_width,
            field_font_size: config.field_font_size,
            observation_font_size: config.observation_font_size,
            observation_box_width: config.observation_box_width,
            observation_box_height: config.observation_box_height,
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry — pure helpers, unit-testable without a document
// ---------------------------------------------------------------------------

/// Insertion point for a field value: just past the right edge of the label
/// box, offset from its top edge.
pub fn field_insertion_point(anchor: &Rect, offset_x: f32, offset_y: f32) -> (f32, f32) {
    (anchor.x1 + offset_x, anchor.y0 + offset_y)
}

/// Aspect-preserving placement rectangle for the signature raster.
pub fn signature_rect(anchor: &Rect, raster_w: u32, raster_h: u32, target_width: f32) -> Rect {
    let x = anchor.x0 + SIGNATURE_DX;
    let y = anchor.y0 + SIGNATURE_DY;
    let scale = target_width / raster_w as f32;
    let height = raster_h as f32 * scale;
    Rect::new(x, y, x + target_width, y + height)
}

/// Computed layout of the observation block.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationLayout {
    /// Baseline origin of the `"Observación:"` label.
    pub label_pos: (f32, f32),
    /// The bordered box the free text goes into.
    pub box_rect: Rect,
}

/// Centre the label + gap + box as a unit within the page width, placed
/// just below the anchor.
pub fn observation_layout(
    anchor: &Rect,
    page_width: f32,
    label_width: f32,
    box_w: f32,
    box_h: f32,
) -> ObservationLayout {
    let y = anchor.y1 + OBSERVATION_DROP;
    let total_width = label_width + OBSERVATION_GAP + box_w;
    let x_start = (page_width - total_width) / 2.0;
    let box_x = x_start + label_width + OBSERVATION_GAP;
    ObservationLayout {
        label_pos: (x_start, y + 5.0),
        box_rect: Rect::new(box_x, y, box_x + box_w, y + box_h),
    }
}

// ---------------------------------------------------------------------------
// Annotator
// ---------------------------------------------------------------------------

/// Orchestrates one annotation pass over the last page of a document.
///
/// Stateless between calls: every invocation decodes its own input bytes and
/// returns a fresh output buffer, so independent calls may run in parallel.
/// Within one call the writes execute in a fixed order (fields, signature,
/// observation) for reproducibility, even though each insertion point
/// depends only on its own anchor.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    options: AnnotateOptions,
}

impl Annotator {
    pub fn new(options: AnnotateOptions) -> Self {
        Self { options }
    }

    /// Annotate the last page and return the re-serialised document.
    ///
    /// A missing anchor or an empty value skips that one field or overlay
    /// (best effort on unfamiliar templates); only an undecodable document
    /// fails. When nothing at all is written the output is a plain
    /// load/save round-trip of the input.
    #[instrument(skip_all, fields(bytes_len = pdf_bytes.len()))]
    pub fn annotate(
        &self,
        pdf_bytes: &[u8],
        fields: &InvoiceFields,
        observation: &str,
        signature: Option<&SignatureImage>,
    ) -> Result<Vec<u8>> {
        let mut pdf = InvoicePdf::from_bytes(pdf_bytes)?;
        let page_id = pdf.last_page_id()?;
        let (page_width, page_height) = pdf.page_size(page_id)?;
        let text = pdf.page_text(page_id)?;

        let mut content = ContentBuilder::new(page_height);

        for spec in fields.to_specs() {
            if spec.value.is_empty() {
                debug!(label = %spec.label, "empty value, skipping field");
                continue;
            }
            match text.find(&spec.label) {
                Some(anchor) => {
                    let point = field_insertion_point(&anchor, spec.offset_x, spec.offset_y);
                    content.text_run(point, &spec.value, self.options.field_font_size);
                }
                None => debug!(label = %spec.label, "anchor absent, skipping field"),
            }
        }

        let mut signature_placed = false;
        if let Some(sig) = signature {
            match text.find("Firma") {
                Some(anchor) => {
                    let rect = signature_rect(
                        &anchor,
                        sig.width(),
                        sig.height(),
                        self.options.signature_width,
                    );
                    content.image(&rect, SIGNATURE_RES_NAME);
                    signature_placed = true;
                    debug!(
                        width = rect.width(),
                        height = rect.height(),
                        "signature placed"
                    );
                }
                None => debug!("Firma anchor absent, skipping signature"),
            }
        }

        let trimmed_observation = observation.trim();
        if !trimmed_observation.is_empty() {
            match text.find("CEDIBLE") {
                Some(anchor) => {
                    self.render_observation(&mut content, &anchor, page_width, trimmed_observation);
                }
                None => debug!("CEDIBLE anchor absent, skipping observation"),
            }
        }

        if content.is_empty() {
            info!("no anchors matched, returning document unchanged");
            return pdf.save_to_bytes();
        }

        if content.wrote_text() {
            ensure_helvetica_font(&mut pdf.document, page_id)?;
        }
        if signature_placed {
            // `signature_placed` implies `signature` is Some.
            if let Some(sig) = signature {
                embed_signature(&mut pdf.document, page_id, sig)?;
            }
        }
        append_content_to_page(&mut pdf.document, page_id, &content.finish())?;

        let output = pdf.save_to_bytes()?;
        info!(output_bytes = output.len(), "annotation complete");
        Ok(output)
    }

    /// Label, bordered box, and left-aligned free text at the CEDIBLE
    /// anchor. Lines are broken to fit the box width; lines that would
    /// overflow the box height are dropped (the box clips, it never grows).
    fn render_observation(
        &self,
        content: &mut ContentBuilder,
        anchor: &Rect,
        page_width: f32,
        text: &str,
    ) {
        let label = "Observación:";
        let label_width = fonts::helvetica().text_width(label, self.options.field_font_size);
        let layout = observation_layout(
            anchor,
            page_width,
            label_width,
            self.options.observation_box_width,
            self.options.observation_box_height,
        );

        content.text_run(layout.label_pos, label, self.options.field_font_size);
        content.stroked_rect(&layout.box_rect, 0.5);

        let size = self.options.observation_font_size;
        let line_height = size * 1.2;
        let max_width = layout.box_rect.width() - 2.0 * OBSERVATION_INSET;
        let max_lines =
            ((layout.box_rect.height() - OBSERVATION_INSET) / line_height).floor() as usize;

        let lines = break_lines(text, max_width, size);
        for (i, line) in lines.iter().take(max_lines.max(1)).enumerate() {
            let x = layout.box_rect.x0 + OBSERVATION_INSET;
            let y = layout.box_rect.y0 + OBSERVATION_INSET + size + i as f32 * line_height;
            content.text_run((x, y), line, size);
        }
    }
}

/// Break text into lines no wider than `max_width` at `size`, splitting on
/// whitespace and force-breaking oversized words.
fn break_lines(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let widths = fonts::helvetica();
    let space = widths.text_width(" ", size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width: f32 = 0.0;

    for word in text.split_whitespace() {
        let word_width = widths.text_width(word, size);
        if word_width > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for c in word.chars() {
                let cw = widths.text_width(c.encode_utf8(&mut [0u8; 4]), size);
                if current_width + cw > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += cw;
            }
        } else if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ---------------------------------------------------------------------------
// Content-stream emission
// ---------------------------------------------------------------------------

/// Accumulates content-stream operators for the appended stream.
///
/// Callers pass top-left coordinates; the builder flips to PDF's
/// bottom-left origin as it writes. Text is encoded as Latin-1 literals for
/// the WinAnsi-encoded Helvetica resource the engine embeds.
struct ContentBuilder {
    page_height: f32,
    ops: Vec<u8>,
    wrote_text: bool,
}

impl ContentBuilder {
    fn new(page_height: f32) -> Self {
        Self {
            page_height,
            ops: Vec::new(),
            wrote_text: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn wrote_text(&self) -> bool {
        self.wrote_text
    }

    /// One black text run with its baseline at the given top-left point.
    fn text_run(&mut self, point: (f32, f32), text: &str, size: f32) {
        let (x, y) = point;
        let pdf_y = self.page_height - y;
        self.push(&format!(
            "BT\n/{FONT_RES_NAME} {size:.2} Tf\n0 0 0 rg\n{x:.2} {pdf_y:.2} Td\n("
        ));
        self.push_latin1_escaped(text);
        self.push(") Tj\nET\n");
        self.wrote_text = true;
    }

    /// The image XObject drawn into a rectangle given in top-left coords.
    fn image(&mut self, rect: &Rect, res_name: &str) {
        let pdf_y = self.page_height - rect.y1;
        self.push(&format!(
            "q\n{w:.2} 0 0 {h:.2} {x:.2} {y:.2} cm\n/{res_name} Do\nQ\n",
            w = rect.width(),
            h = rect.height(),
            x = rect.x0,
            y = pdf_y,
        ));
    }

    /// A black-stroked rectangle outline.
    fn stroked_rect(&mut self, rect: &Rect, line_width: f32) {
        let pdf_y = self.page_height - rect.y1;
        self.push(&format!(
            "0 0 0 RG\n{line_width:.2} w\n{x:.2} {y:.2} {w:.2} {h:.2} re\nS\n",
            x = rect.x0,
            y = pdf_y,
            w = rect.width(),
            h = rect.height(),
        ));
    }

    fn finish(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.ops.len() + 4);
        out.extend_from_slice(b"q\n");
        out.extend_from_slice(&self.ops);
        out.extend_from_slice(b"Q\n");
        out
    }

    fn push(&mut self, s: &str) {
        self.ops.extend_from_slice(s.as_bytes());
    }

    /// Encode a string literal as Latin-1 with PDF escaping. Characters
    /// outside Latin-1 degrade to `?`.
    fn push_latin1_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let b = if (c as u32) < 256 { c as u32 as u8 } else { b'?' };
            match b {
                b'(' | b')' | b'\\' => {
                    self.ops.push(b'\\');
                    self.ops.push(b);
                }
                b'\n' => self.ops.extend_from_slice(b"\\n"),
                b'\r' => self.ops.extend_from_slice(b"\\r"),
                _ => self.ops.push(b),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Document mutation helpers
// ---------------------------------------------------------------------------

/// Add a WinAnsi-encoded Helvetica font to the page resources under
/// [`FONT_RES_NAME`], creating the /Resources and /Font dictionaries as
/// needed.
fn ensure_helvetica_font(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    add_page_resource(doc, page_id, b"Font", FONT_RES_NAME, font_id)
}

/// Embed the signature raster as an RGB image XObject with the alpha
/// channel carried in a /SMask, and register it in the page resources.
fn embed_signature(doc: &mut Document, page_id: ObjectId, sig: &SignatureImage) -> Result<()> {
    let (w, h) = (sig.image.width(), sig.image.height());
    let mut rgb = Vec::with_capacity((w * h * 3) as usize);
    let mut alpha = Vec::with_capacity((w * h) as usize);
    for px in sig.image.pixels() {
        rgb.extend_from_slice(&px.0[..3]);
        alpha.push(px.0[3]);
    }

    let smask_id = doc.add_object(Stream::new(
        Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(i64::from(w))),
            ("Height", Object::Integer(i64::from(h))),
            ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
        ]),
        alpha,
    ));
    let image_id = doc.add_object(Stream::new(
        Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(i64::from(w))),
            ("Height", Object::Integer(i64::from(h))),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("SMask", Object::Reference(smask_id)),
        ]),
        rgb,
    ));
    add_page_resource(doc, page_id, b"XObject", SIGNATURE_RES_NAME, image_id)
}

/// Register `value_id` under `/Resources /{category} /{name}` of a page,
/// handling inline dictionaries, indirect references, and missing
/// dictionaries alike.
fn add_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    value_id: ObjectId,
) -> Result<()> {
    // Work out where /Resources lives before taking any mutable borrow.
    enum ResourcesLocation {
        Indirect(ObjectId),
        Inline,
        Missing,
    }
    let location = {
        let page = page_dict(doc, page_id)?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => ResourcesLocation::Indirect(*id),
            Ok(Object::Dictionary(_)) => ResourcesLocation::Inline,
            _ => ResourcesLocation::Missing,
        }
    };
    if matches!(location, ResourcesLocation::Missing) {
        page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(Dictionary::new()));
    }
    let resources_ref = match location {
        ResourcesLocation::Indirect(id) => Some(id),
        _ => None,
    };

    let mut category_dict = get_resource_category(doc, page_id, resources_ref, category)?;
    category_dict.set(name, Object::Reference(value_id));
    set_resource_category(doc, page_id, resources_ref, category, category_dict)
}

/// Fetch a copy of the `/{category}` dictionary from the page resources,
/// resolving an indirect category reference; missing categories yield an
/// empty dictionary.
fn get_resource_category(
    doc: &Document,
    page_id: ObjectId,
    resources_ref: Option<ObjectId>,
    category: &[u8],
) -> Result<Dictionary> {
    let resources = match resources_ref {
        Some(id) => doc
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|err| FirmadorError::PdfError(format!("bad /Resources: {err}")))?,
        None => match page_dict(doc, page_id)?.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict,
            _ => return Ok(Dictionary::new()),
        },
    };
    match resources.get(category) {
        Ok(Object::Dictionary(dict)) => Ok(dict.clone()),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map(Clone::clone)
            .map_err(|err| FirmadorError::PdfError(format!("bad resource category: {err}"))),
        _ => Ok(Dictionary::new()),
    }
}

/// Write the `/{category}` dictionary back into the page resources,
/// preserving whether /Resources was inline or indirect. An indirect
/// category reference is replaced by the updated inline dictionary.
fn set_resource_category(
    doc: &mut Document,
    page_id: ObjectId,
    resources_ref: Option<ObjectId>,
    category: &[u8],
    category_dict: Dictionary,
) -> Result<()> {
    let resources = match resources_ref {
        Some(id) => match doc.get_object_mut(id) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => {
                return Err(FirmadorError::PdfError(
                    "referenced /Resources is not a dictionary".to_string(),
                ))
            }
        },
        None => match page_dict_mut(doc, page_id)?.get_mut(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict,
            _ => {
                return Err(FirmadorError::PdfError(
                    "page /Resources is not a dictionary".to_string(),
                ))
            }
        },
    };
    resources.set(category, Object::Dictionary(category_dict));
    Ok(())
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|err| FirmadorError::PdfError(format!("cannot read page dictionary: {err}")))
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    match doc.get_object_mut(page_id) {
        Ok(Object::Dictionary(dict)) => Ok(dict),
        _ => Err(FirmadorError::PdfError(
            "cannot read page dictionary".to_string(),
        )),
    }
}

/// Append a new content stream to a page, preserving the existing content.
fn append_content_to_page(doc: &mut Document, page_id: ObjectId, content: &[u8]) -> Result<()> {
    let stream = Stream::new(Dictionary::new(), content.to_vec());
    let content_id = doc.add_object(Object::Stream(stream));

    let page = page_dict_mut(doc, page_id)?;
    let existing = page.get(b"Contents").ok().cloned();
    match existing {
        Some(Object::Reference(existing_id)) => {
            page.set(
                "Contents",
                Object::Array(vec![
                    Object::Reference(existing_id),
                    Object::Reference(content_id),
                ]),
            );
        }
        Some(Object::Array(mut arr)) => {
            arr.push(Object::Reference(content_id));
            page.set("Contents", Object::Array(arr));
        }
        _ => {
            page.set("Contents", Object::Reference(content_id));
        }
    }
    Ok(())
}
