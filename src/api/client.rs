//! Client ports for the GST APIs and their response payloads.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::core::ApiError;

/// Taxpayer details from the public search API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGstinInfo {
    pub gstin: String,
    /// Registration date, `dd/mm/yyyy`.
    #[serde(default)]
    pub rgdt: Option<String>,
    /// Cancellation date, `dd/mm/yyyy`.
    #[serde(default)]
    pub cxdt: Option<String>,
    /// Status name, e.g. `"Active"`.
    pub sts: String,
    /// Legal name of business.
    #[serde(default)]
    pub lgnm: Option<String>,
    #[serde(default)]
    pub trade_nam: Option<String>,
}

/// GSTIN details from the e-invoice API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EInvoiceGstinInfo {
    #[serde(default)]
    pub gstin: Option<String>,
    /// Registration date, `yyyy-mm-dd` with an optional time part.
    #[serde(default)]
    pub dt_reg: Option<String>,
    /// De-registration date.
    #[serde(default)]
    pub dt_d_reg: Option<String>,
    /// Status code, e.g. `"ACT"`.
    pub status: String,
    /// Block status, `"U"` or `"B"`.
    #[serde(default)]
    pub blk_status: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub trade_name: Option<String>,
}

/// Transporter details from the e-waybill API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransporterDetails {
    /// Transporter ID as known to the e-waybill system; empty when invalid.
    #[serde(default)]
    pub transin: Option<String>,
    #[serde(default)]
    pub trade_name: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,
}

/// Public taxpayer search. Needs no company credentials.
#[async_trait]
pub trait PublicApi: Send + Sync {
    async fn get_gstin_info(&self, gstin: &str) -> Result<PublicGstinInfo, ApiError>;
}

/// e-invoice GSTIN details, authenticated as `company_gstin`.
#[async_trait]
pub trait EInvoiceApi: Send + Sync {
    async fn get_gstin_info(
        &self,
        company_gstin: &str,
        gstin: &str,
    ) -> Result<EInvoiceGstinInfo, ApiError>;
}

/// e-waybill transporter details, authenticated as `company_gstin`.
///
/// `Ok(None)` means the API returned an empty result.
#[async_trait]
pub trait EWaybillApi: Send + Sync {
    async fn get_transporter_details(
        &self,
        company_gstin: &str,
        transporter_id: &str,
    ) -> Result<Option<TransporterDetails>, ApiError>;
}

/// The three API clients a lookup can choose from.
#[derive(Clone)]
pub struct ApiClients {
    pub public: Arc<dyn PublicApi>,
    pub e_invoice: Arc<dyn EInvoiceApi>,
    pub e_waybill: Arc<dyn EWaybillApi>,
}

impl fmt::Debug for ApiClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClients").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e_invoice_field_names() {
        let json = r#"{"Gstin":"27AAPFU0939F1ZV","TradeName":"ACME","LegalName":"ACME PVT LTD",
            "Status":"ACT","BlkStatus":"U","DtReg":"2017-07-01","DtDReg":null}"#;
        let info: EInvoiceGstinInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.status, "ACT");
        assert_eq!(info.dt_reg.as_deref(), Some("2017-07-01"));
        assert_eq!(info.dt_d_reg, None);
        assert_eq!(info.blk_status.as_deref(), Some("U"));
    }

    #[test]
    fn public_field_names() {
        let json = r#"{"gstin":"27AAPFU0939F1ZV","rgdt":"01/07/2017","sts":"Cancelled","cxdt":"15/03/2021","tradeNam":"ACME"}"#;
        let info: PublicGstinInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.cxdt.as_deref(), Some("15/03/2021"));
        assert_eq!(info.trade_nam.as_deref(), Some("ACME"));
    }

    #[test]
    fn server_errors_are_classified() {
        assert!(ApiError::Server("502".into()).is_server_error());
        assert!(!ApiError::Api("not found".into()).is_server_error());
    }
}
