//! GST settings that gate network lookups.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credential service name shared by the e-invoice and e-waybill APIs.
pub const E_WAYBILL_E_INVOICE_SERVICE: &str = "e-Waybill / e-Invoice";

/// Default number of days after which a cached status is considered stale.
pub const DEFAULT_REFRESH_INTERVAL_DAYS: i64 = 30;

/// Error loading [`GstSettings`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// API credential configured for a company GSTIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredential {
    /// Service the credential is for, e.g. `"e-Waybill / e-Invoice"`.
    pub service: String,
    /// Company GSTIN the credential belongs to.
    pub gstin: String,
}

/// GST settings.
///
/// ```toml
/// validate_gstin_status = true
/// enable_api = true
/// api_secret = "..."
/// gstin_status_refresh_interval = 15
/// enable_e_invoice = true
///
/// [[credentials]]
/// service = "e-Waybill / e-Invoice"
/// gstin = "24AAACC1206D1ZM"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GstSettings {
    /// Look up and validate party GSTIN status at all.
    pub validate_gstin_status: bool,
    /// Master switch for every GST API.
    pub enable_api: bool,
    /// Secret for the API gateway; the APIs count as enabled only when set.
    pub api_secret: Option<String>,
    /// Sandbox mode never calls the live APIs for status lookups.
    pub sandbox_mode: bool,
    /// Days after which a cached status is refreshed for transactions.
    pub gstin_status_refresh_interval: i64,
    pub enable_e_invoice: bool,
    pub enable_e_waybill: bool,
    pub credentials: Vec<ApiCredential>,
}

impl Default for GstSettings {
    fn default() -> Self {
        Self {
            validate_gstin_status: true,
            enable_api: false,
            api_secret: None,
            sandbox_mode: false,
            gstin_status_refresh_interval: DEFAULT_REFRESH_INTERVAL_DAYS,
            enable_e_invoice: false,
            enable_e_waybill: false,
            credentials: Vec::new(),
        }
    }
}

impl GstSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.gstin_status_refresh_interval < 0 {
            return Err(SettingsError::Invalid(format!(
                "gstin_status_refresh_interval must not be negative, got {}",
                self.gstin_status_refresh_interval
            )));
        }
        Ok(())
    }

    /// Whether the GST APIs can be called at all.
    pub fn is_api_enabled(&self) -> bool {
        self.enable_api
            && self
                .api_secret
                .as_deref()
                .is_some_and(|secret| !secret.trim().is_empty())
    }

    /// GSTIN of the company whose e-invoice credentials are used for
    /// background lookups. `None` unless e-invoicing is enabled.
    pub fn company_gstin(&self) -> Option<&str> {
        if !self.enable_e_invoice {
            return None;
        }
        self.e_waybill_credential_gstin()
    }

    /// GSTIN of the first `"e-Waybill / e-Invoice"` credential.
    pub fn e_waybill_credential_gstin(&self) -> Option<&str> {
        self.credentials
            .iter()
            .find(|c| c.service == E_WAYBILL_E_INVOICE_SERVICE)
            .map(|c| c.gstin.as_str())
    }
}
