use chrono::NaiveDate;
use thiserror::Error;

use super::format::GstinFormatError;
use super::settings::SettingsError;

/// Errors surfaced to callers of the GSTIN status lookups.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GstinError {
    /// The GSTIN failed format or check-digit validation.
    #[error(transparent)]
    InvalidGstin(#[from] GstinFormatError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The party GSTIN is not valid for the transaction date.
    #[error("invalid party GSTIN: {0}")]
    InvalidPartyGstin(StatusValidationError),

    /// The transporter ID is not active.
    #[error("invalid transporter ID: {0}")]
    InvalidTransporterId(StatusValidationError),

    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A GST API response could not be used.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Error from one of the GST APIs.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Network or HTTP transport error.
    #[error("GST API network error: {0}")]
    Network(String),
    /// The upstream GST server failed. Further lookups are paused briefly.
    #[error("GSP server error: {0}")]
    Server(String),
    /// The API rejected the request (invalid GSTIN, not found, ...).
    #[error("GST API error: {0}")]
    Api(String),
    /// The response could not be understood.
    #[error("GST API parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether the error is an upstream server-class failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_))
    }
}

/// Failure reported by a [`GstinStore`](crate::runtime::GstinStore) backend.
#[derive(Debug, Clone, Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

/// A transaction date (or transporter ID) that is inconsistent with the
/// registration data on record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StatusValidationError {
    #[error(
        "Registration date not found for party GSTIN {gstin}. Please make sure GSTIN is registered."
    )]
    MissingRegistrationDate { gstin: String },

    #[error(
        "Party GSTIN {gstin} is registered on {}. Please make sure that document date is on or after {}.",
        display_date(.registration_date),
        display_date(.registration_date)
    )]
    BeforeRegistration {
        gstin: String,
        registration_date: NaiveDate,
    },

    #[error(
        "Party GSTIN {gstin} is cancelled on {}. Please make sure that document date is before {}.",
        display_date(.cancelled_date),
        display_date(.cancelled_date)
    )]
    AfterCancellation {
        gstin: String,
        cancelled_date: NaiveDate,
    },

    #[error("Status of Party GSTIN {gstin} is {status}")]
    InactiveStatus { gstin: String, status: String },

    #[error(
        "Transporter ID {transporter_id} is not Active. Please make sure that transporter ID is valid."
    )]
    TransporterIdNotActive { transporter_id: String },
}

impl StatusValidationError {
    /// The GSTIN or transporter ID the error refers to.
    pub fn gstin(&self) -> &str {
        match self {
            Self::MissingRegistrationDate { gstin }
            | Self::BeforeRegistration { gstin, .. }
            | Self::AfterCancellation { gstin, .. }
            | Self::InactiveStatus { gstin, .. } => gstin,
            Self::TransporterIdNotActive { transporter_id } => transporter_id,
        }
    }
}

/// Format a date the way user-facing messages show it (dd-mm-yyyy).
pub fn display_date(date: &NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
