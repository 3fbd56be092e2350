//! Shared fixtures: scripted API clients and service wiring.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use gstin_tracker::api::*;
use gstin_tracker::core::*;
use gstin_tracker::runtime::*;
use gstin_tracker::status::*;

pub const PARTY: &str = "27AAPFU0939F1ZV";
pub const COMPANY: &str = "24AAACC1206D1ZM";
pub const OTHER_PARTY: &str = "29AABCT1332L1ZA";
pub const TRANSPORTER: &str = "88AAACT2983B1Z9";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(9, 30, 0).unwrap()
}

/// Wall clock used by every service in the tests.
pub fn today() -> NaiveDateTime {
    at(2024, 5, 1)
}

/// API clients answering from scripted responses and recording every call.
#[derive(Default)]
pub struct FakeApis {
    public: Mutex<HashMap<String, Result<PublicGstinInfo, ApiError>>>,
    e_invoice: Mutex<HashMap<String, Result<EInvoiceGstinInfo, ApiError>>>,
    e_waybill: Mutex<HashMap<String, Result<Option<TransporterDetails>, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn public(&self, gstin: &str, response: Result<PublicGstinInfo, ApiError>) {
        self.public.lock().unwrap().insert(gstin.into(), response);
    }

    pub fn e_invoice(&self, gstin: &str, response: Result<EInvoiceGstinInfo, ApiError>) {
        self.e_invoice.lock().unwrap().insert(gstin.into(), response);
    }

    pub fn e_waybill(&self, id: &str, response: Result<Option<TransporterDetails>, ApiError>) {
        self.e_waybill.lock().unwrap().insert(id.into(), response);
    }

    /// Calls made so far, as `"<api>:<id>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clients(self: &Arc<Self>) -> ApiClients {
        ApiClients {
            public: self.clone(),
            e_invoice: self.clone(),
            e_waybill: self.clone(),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn not_found<T>() -> Result<T, ApiError> {
    Err(ApiError::Api("no such GSTIN".into()))
}

#[async_trait]
impl PublicApi for FakeApis {
    async fn get_gstin_info(&self, gstin: &str) -> Result<PublicGstinInfo, ApiError> {
        self.record(format!("public:{gstin}"));
        self.public
            .lock()
            .unwrap()
            .get(gstin)
            .cloned()
            .unwrap_or_else(not_found)
    }
}

#[async_trait]
impl EInvoiceApi for FakeApis {
    async fn get_gstin_info(
        &self,
        company_gstin: &str,
        gstin: &str,
    ) -> Result<EInvoiceGstinInfo, ApiError> {
        assert_eq!(company_gstin, COMPANY);
        self.record(format!("e_invoice:{gstin}"));
        self.e_invoice
            .lock()
            .unwrap()
            .get(gstin)
            .cloned()
            .unwrap_or_else(not_found)
    }
}

#[async_trait]
impl EWaybillApi for FakeApis {
    async fn get_transporter_details(
        &self,
        company_gstin: &str,
        transporter_id: &str,
    ) -> Result<Option<TransporterDetails>, ApiError> {
        assert_eq!(company_gstin, COMPANY);
        self.record(format!("e_waybill:{transporter_id}"));
        self.e_waybill
            .lock()
            .unwrap()
            .get(transporter_id)
            .cloned()
            .unwrap_or(Ok(None))
    }
}

pub fn public_info(gstin: &str, sts: &str, rgdt: &str, cxdt: &str) -> PublicGstinInfo {
    PublicGstinInfo {
        gstin: gstin.into(),
        rgdt: Some(rgdt.into()),
        cxdt: Some(cxdt.into()),
        sts: sts.into(),
        ..Default::default()
    }
}

pub fn e_invoice_info(status: &str, dt_reg: &str, blk_status: &str) -> EInvoiceGstinInfo {
    EInvoiceGstinInfo {
        status: status.into(),
        dt_reg: Some(dt_reg.into()),
        blk_status: Some(blk_status.into()),
        ..Default::default()
    }
}

pub fn active_transporter(id: &str) -> TransporterDetails {
    TransporterDetails {
        transin: Some(id.into()),
        trade_name: Some("FAST MOVERS".into()),
        ..Default::default()
    }
}

/// APIs enabled, no company credentials: every lookup uses the public API.
pub fn public_settings() -> GstSettings {
    GstSettings {
        enable_api: true,
        api_secret: Some("secret".into()),
        gstin_status_refresh_interval: 15,
        ..Default::default()
    }
}

/// APIs, e-invoice and e-waybill enabled with company credentials.
pub fn company_settings() -> GstSettings {
    GstSettings {
        enable_e_invoice: true,
        enable_e_waybill: true,
        credentials: vec![ApiCredential {
            service: E_WAYBILL_E_INVOICE_SERVICE.into(),
            gstin: COMPANY.into(),
        }],
        ..public_settings()
    }
}

pub struct Harness {
    pub service: GstinStatusService,
    pub apis: Arc<FakeApis>,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub jobs: Arc<DeferredDispatcher>,
}

pub fn harness(settings: GstSettings) -> Harness {
    harness_with(settings, Vec::new())
}

pub fn harness_with(settings: GstSettings, records: Vec<GstinRecord>) -> Harness {
    let apis = FakeApis::new();
    let store = Arc::new(MemoryStore::with_records(records));
    let cache = Arc::new(MemoryCache::new());
    let jobs = Arc::new(DeferredDispatcher::new());

    let service = GstinStatusService::new(settings, apis.clients(), jobs.clone())
        .with_store(store.clone())
        .with_cache(cache.clone())
        .with_clock(Arc::new(today));

    Harness {
        service,
        apis,
        store,
        cache,
        jobs,
    }
}
