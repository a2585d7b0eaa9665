// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Client form for one signing run. The orchestrator validates the form
// before the annotation engine is invoked: missing mandatory fields are
// reported as one aggregate condition, and the RUT is checked against its
// verification digit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use firmador_core::error::{FirmadorError, Result};

use crate::pdf::annotate::InvoiceFields;

/// Everything the caller collects before signing an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceForm {
    /// Name / company name of the client.
    pub nombre: String,
    /// Address / site of delivery.
    pub recinto: String,
    /// Delivery date.
    pub fecha: NaiveDate,
    /// Client RUT, in any punctuation the user typed.
    pub rut: String,
    /// Invoice number (pre-filled from the document scan, user-editable).
    pub numero_factura: String,
    /// Initials of the signing salesperson.
    pub iniciales: String,
    /// Optional free-text observation.
    #[serde(default)]
    pub observacion: String,
}

impl InvoiceForm {
    /// Check the form is complete and the RUT is valid.
    ///
    /// Every missing mandatory field is collected before failing, so the
    /// caller can show one message listing them all.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("nombre", &self.nombre),
            ("recinto", &self.recinto),
            ("rut", &self.rut),
            ("numero_factura", &self.numero_factura),
            ("iniciales", &self.iniciales),
        ] {
            if value.trim().is_empty() {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(FirmadorError::IncompleteForm(missing));
        }
        if !firmador_rut::validate(&self.rut) {
            return Err(FirmadorError::InvalidRut(self.rut.clone()));
        }
        Ok(())
    }

    /// Date as it is written onto the invoice.
    pub fn fecha_display(&self) -> String {
        self.fecha.format("%d-%m-%Y").to_string()
    }

    /// The four annotation fields, with the RUT in canonical display form.
    pub fn fields(&self) -> InvoiceFields {
        InvoiceFields {
            nombre: self.nombre.clone(),
            recinto: self.recinto.clone(),
            rut: firmador_rut::format(&self.rut),
            fecha: self.fecha_display(),
        }
    }

    /// Output artifact name: `Factura {number} {initials}.pdf`.
    pub fn output_filename(&self) -> String {
        format!(
            "Factura {} {}.pdf",
            self.numero_factura.trim(),
            self.iniciales.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> InvoiceForm {
        InvoiceForm {
            nombre: "Constructora Andes Ltda".to_string(),
            recinto: "Av. Las Torres 1200, Quilicura".to_string(),
            fecha: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            rut: "12.345.678-5".to_string(),
            numero_factura: "123456".to_string(),
            iniciales: "FVM".to_string(),
            observacion: String::new(),
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(complete_form().validate().is_ok());
    }

    #[test]
    fn missing_fields_are_aggregated() {
        let mut form = complete_form();
        form.nombre.clear();
        form.numero_factura = "  ".to_string();
        match form.validate() {
            Err(FirmadorError::IncompleteForm(missing)) => {
                assert_eq!(missing, vec!["nombre".to_string(), "numero_factura".to_string()]);
            }
            other => panic!("expected IncompleteForm, got {other:?}"),
        }
    }

    #[test]
    fn bad_check_digit_is_rejected() {
        let mut form = complete_form();
        form.rut = "12.345.678-4".to_string();
        assert!(matches!(
            form.validate(),
            Err(FirmadorError::InvalidRut(_))
        ));
    }

    #[test]
    fn fecha_display_is_day_month_year() {
        assert_eq!(complete_form().fecha_display(), "03-06-2025");
    }

    #[test]
    fn fields_carry_formatted_rut() {
        let fields = complete_form().fields();
        assert_eq!(fields.rut, "12.345.678-5");
        assert_eq!(fields.fecha, "03-06-2025");
    }

    #[test]
    fn output_filename_pattern() {
        assert_eq!(complete_form().output_filename(), "Factura 123456 FVM.pdf");
    }
}
