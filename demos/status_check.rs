//! Walk through a status lookup with canned API responses.
//!
//! Run with: `RUST_LOG=debug cargo run --example status_check`

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use gstin_tracker::api::*;
use gstin_tracker::core::*;
use gstin_tracker::runtime::*;
use gstin_tracker::status::*;
use tracing_subscriber::EnvFilter;

const COMPANY: &str = "24AAACC1206D1ZM";

struct CannedApis;

#[async_trait]
impl PublicApi for CannedApis {
    async fn get_gstin_info(&self, gstin: &str) -> Result<PublicGstinInfo, ApiError> {
        Ok(PublicGstinInfo {
            gstin: gstin.into(),
            rgdt: Some("01/07/2017".into()),
            cxdt: Some("31/03/2023".into()),
            sts: "Cancelled".into(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl EInvoiceApi for CannedApis {
    async fn get_gstin_info(
        &self,
        _company_gstin: &str,
        _gstin: &str,
    ) -> Result<EInvoiceGstinInfo, ApiError> {
        Err(ApiError::Server("503 Service Unavailable".into()))
    }
}

#[async_trait]
impl EWaybillApi for CannedApis {
    async fn get_transporter_details(
        &self,
        _company_gstin: &str,
        transporter_id: &str,
    ) -> Result<Option<TransporterDetails>, ApiError> {
        Ok(Some(TransporterDetails {
            transin: Some(transporter_id.into()),
            ..Default::default()
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), GstinError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = GstSettings::from_toml_str(&format!(
        r#"
        enable_api = true
        api_secret = "demo"
        enable_e_invoice = true
        enable_e_waybill = true

        [[credentials]]
        service = "{E_WAYBILL_E_INVOICE_SERVICE}"
        gstin = "{COMPANY}"
        "#
    ))?;

    let apis = Arc::new(CannedApis);
    let dispatcher = Arc::new(TokioDispatcher::current());
    let service = GstinStatusService::new(
        settings,
        ApiClients {
            public: apis.clone(),
            e_invoice: apis.clone(),
            e_waybill: apis,
        },
        dispatcher.clone(),
    );

    let invoice_date = NaiveDate::from_ymd_opt(2024, 6, 15);

    println!("=== Background lookup (e-invoice API, fails with server error) ===\n");
    let queued = service
        .get_gstin_status("27AAPFU0939F1ZV", invoice_date, LookupOptions::default())
        .await?;
    println!("  returned immediately: {queued:?}");
    dispatcher.wait_idle().await;
    println!("  circuit breaker open: {}", service.suppressions().is_server_down());

    println!("\n=== Forced lookup from the UI (public API) ===\n");
    service.suppressions().trip_breaker();
    let record = service
        .get_gstin_status(
            "29AABCT1332L1ZA",
            invoice_date,
            LookupOptions {
                from_ui: true,
                force_update: true,
            },
        )
        .await?;
    println!("  while breaker is open: {record:?}");

    let record = service.upsert_public_response(PublicGstinInfo {
        gstin: "29AABCT1332L1ZA".into(),
        rgdt: Some("01/07/2017".into()),
        cxdt: Some("31/03/2023".into()),
        sts: "Cancelled".into(),
        ..Default::default()
    });
    let record = record.await?;
    println!("  saved from prefetched response: {:?}", record.status);

    match validate_gstin_info(Some(&record), invoice_date, ValidationMode::Throw) {
        Ok(()) => println!("  invoice date OK"),
        Err(e) => println!("  invoice date rejected: {e}"),
    }

    println!("\n=== Transporter ID ===\n");
    let verdict = service.validate_gst_transporter_id("88AAACT2983B1Z9").await?;
    println!("  88AAACT2983B1Z9 => {verdict:?}");

    Ok(())
}
