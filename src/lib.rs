//! # gstin-tracker
//!
//! GST registration status tracking for tax parties and transporter IDs.
//!
//! Given a GSTIN the crate decides whether the cached status is stale,
//! refreshes it from the public registry, e-invoice or e-waybill APIs,
//! persists the canonical record, and checks that a transaction date falls
//! inside the party's registration window.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gstin_tracker::core::*;
//!
//! assert_eq!(validate_gstin(" 27aapfu0939f1zv ").unwrap(), "27AAPFU0939F1ZV");
//!
//! let record = GstinRecord::builder("27AAPFU0939F1ZV")
//!     .status(GstinStatus::Active)
//!     .registration_date(NaiveDate::from_ymd_opt(2020, 1, 10).unwrap())
//!     .build();
//! assert_eq!(record.status, Some(GstinStatus::Active));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Record types, GSTIN format/check digit, settings |
//! | `status` | API ports, normalizer, refresh policy, validator, lookup service, in-memory store and cache |
//! | `queue` (default) | tokio-backed background job dispatcher |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "status")]
pub mod api;

#[cfg(feature = "status")]
pub mod runtime;

#[cfg(feature = "status")]
pub mod status;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
