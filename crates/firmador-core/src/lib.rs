// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// firmador-core — Shared types and error definitions for the Firmador
// invoice-signing engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::FirmadorError;
pub use types::*;
