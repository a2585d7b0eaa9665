// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
//
// Firmador — headless invoice signing.
//
// Entry point. Initialises logging, collects the form from the command
// line, suggests the invoice number from the document when it is not
// given, then runs the annotation engine and writes the output file.

mod cli;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use firmador_core::config::AppConfig;
use firmador_core::error::{FirmadorError, Result};
use firmador_document::{
    extract_invoice_number, AnnotateOptions, Annotator, InvoiceForm, SignatureImage,
};

use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let pdf_bytes = fs::read(&args.input)?;

    let numero = match args.numero {
        Some(n) => n,
        None => extract_invoice_number(&pdf_bytes)?.ok_or_else(|| {
            FirmadorError::PdfError(
                "no invoice number found in the document; pass --numero".to_string(),
            )
        })?,
    };
    info!(%numero, "invoice number resolved");

    let form = InvoiceForm {
        nombre: args.nombre,
        recinto: args.recinto,
        fecha: args
            .fecha
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        rut: args.rut,
        numero_factura: numero,
        iniciales: args.iniciales,
        observacion: args.observacion,
    };
    form.validate()?;

    let signature = match &args.firma {
        Some(path) => Some(SignatureImage::from_bytes(&fs::read(path)?)?),
        None => None,
    };

    let mut options = AnnotateOptions::from(&config);
    if let Some(width) = args.signature_width {
        options.signature_width = width;
    }

    let annotated = Annotator::new(options).annotate(
        &pdf_bytes,
        &form.fields(),
        &form.observacion,
        signature.as_ref(),
    )?;

    let out_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(form.output_filename()));
    fs::write(&out_path, annotated)?;
    info!(path = %out_path.display(), "annotated invoice written");
    println!("{}", out_path.display());
    Ok(())
}

/// Built-in defaults, overridden by a JSON settings file when given.
fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(p) => Ok(serde_json::from_str(&fs::read_to_string(p)?)?),
        None => Ok(AppConfig::default()),
    }
}
