// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Argument surface of the `firmador` binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Annotate an invoice PDF with client data and a signature overlay.
#[derive(Debug, Parser)]
#[command(name = "firmador", about, version)]
pub struct Cli {
    /// Path to the invoice PDF
    #[arg(value_name = "FACTURA")]
    pub input: PathBuf,

    /// Signature image (PNG with transparency); omit to sign without one
    #[arg(long, value_name = "IMAGEN")]
    pub firma: Option<PathBuf>,

    /// Client name / company name
    #[arg(long)]
    pub nombre: String,

    /// Delivery address / site
    #[arg(long)]
    pub recinto: String,

    /// Client RUT, any punctuation accepted
    #[arg(long)]
    pub rut: String,

    /// Delivery date, ISO format (YYYY-MM-DD). Default: today
    #[arg(long)]
    pub fecha: Option<NaiveDate>,

    /// Invoice number; scanned from the document when omitted
    #[arg(long)]
    pub numero: Option<String>,

    /// Initials of the signing salesperson
    #[arg(long)]
    pub iniciales: String,

    /// Free-text observation for the bordered block on the last page
    #[arg(long, default_value = "")]
    pub observacion: String,

    /// Output path. Default: "Factura <numero> <iniciales>.pdf" in the
    /// current directory
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Width the signature is scaled to, in points
    #[arg(long)]
    pub signature_width: Option<f32>,

    /// JSON settings file overriding the built-in defaults
    #[arg(long, value_name = "ARCHIVO")]
    pub config: Option<PathBuf>,
}
