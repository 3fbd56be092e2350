//! Core GSTIN types, format validation, and settings.
//!
//! This module provides the canonical GSTIN record, the status enums
//! reported by the GST network, GSTIN check-digit validation, and the
//! settings that gate every network lookup.

mod error;
mod format;
mod settings;
mod types;

pub use error::*;
pub use format::*;
pub use settings::*;
pub use types::*;
