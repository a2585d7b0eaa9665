// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// PDF handling: document reading, the text-position index, the annotation
// engine, and the invoice-number scan.

pub mod annotate;
pub mod invoice;
pub mod reader;
pub mod text_index;
