//! GSTIN status lookup, refresh policy, and date-consistency validation.
//!
//! [`GstinStatusService`] ties the pieces together: it consults the
//! [refresh policy](is_status_refresh_required), picks an API source,
//! normalizes and persists the result, and optionally validates the
//! refreshed record against a transaction date.
//!
//! # Example
//!
//! ```ignore
//! use gstin_tracker::status::*;
//!
//! let record = service
//!     .get_gstin_status("27AAPFU0939F1ZV", Some(invoice_date), LookupOptions::default())
//!     .await?;
//!
//! if let Some(record) = record {
//!     validate_gstin_info(Some(&record), Some(invoice_date), ValidationMode::Throw)?;
//! }
//! ```

mod policy;
mod service;
mod transporter;
mod validate;

pub use policy::{RefreshDecision, is_status_refresh_required, refresh_decision};
pub use service::{AfterRefresh, Clock, GstinStatusService, LookupKind, LookupOptions, RefreshRequest};
pub use transporter::{TransporterIdVerdict, inactive_transporter_message};
pub use validate::{
    ValidationMode, check_gstin_info, check_transporter_id_info, validate_gstin_info,
    validate_transporter_id_info,
};
