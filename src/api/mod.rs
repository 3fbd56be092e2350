//! GST API ports and response normalization.
//!
//! The public registry, e-invoice and e-waybill APIs are consumed through
//! the [`PublicApi`], [`EInvoiceApi`] and [`EWaybillApi`] traits. Each
//! returns its own payload shape; [`normalize`] maps them into a single
//! [`GstinUpdate`](crate::core::GstinUpdate).
//!
//! # Example
//!
//! ```
//! use gstin_tracker::api::*;
//! use gstin_tracker::core::GstinStatus;
//!
//! let info: PublicGstinInfo = serde_json::from_str(
//!     r#"{"gstin":"27AAPFU0939F1ZV","rgdt":"01/07/2017","cxdt":"","sts":"Active"}"#,
//! ).unwrap();
//! let update = normalize_public(info).unwrap();
//! assert_eq!(update.details.unwrap().status, GstinStatus::Active);
//! ```

mod client;
mod normalize;

pub use client::{
    ApiClients, ApiError, EInvoiceApi, EInvoiceGstinInfo, EWaybillApi, PublicApi, PublicGstinInfo,
    TransporterDetails,
};
pub use normalize::{normalize_e_invoice, normalize_public, normalize_transporter, parse_api_date};
