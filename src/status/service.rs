//! GSTIN status lookup and refresh.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use futures::FutureExt;
use tracing::{debug, error, info};

use super::policy::refresh_decision;
use super::validate::{ValidationMode, validate_gstin_info, validate_transporter_id_info};
use crate::api::{
    ApiClients, PublicGstinInfo, normalize_e_invoice, normalize_public, normalize_transporter,
};
use crate::core::{
    ApiError, GstSettings, GstinError, GstinRecord, GstinUpdate, validate_gstin,
};
use crate::runtime::{
    EnqueueOptions, FlagCache, GstinStore, JobDispatcher, MemoryCache, MemoryStore, Suppressions,
};

/// Source of the current time for `last_updated_on` and staleness checks.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Caller intent for [`GstinStatusService::get_gstin_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupOptions {
    /// Look up synchronously and return the refreshed record.
    pub from_ui: bool,
    /// Skip the refresh policy. From the UI this also forces the public API.
    pub force_update: bool,
}

/// Which lookup a refresh performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// GSTIN lookup through the e-invoice API, or the public API when
    /// `use_public_api` is set or no company GSTIN is configured.
    Gstin { use_public_api: bool },
    /// Transporter ID lookup through the e-waybill API.
    TransporterId,
}

/// Validation run on the saved record after a refresh. Failures are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterRefresh {
    ValidateGstinInfo,
    ValidateTransporterIdInfo,
}

impl AfterRefresh {
    fn run(self, record: &GstinRecord, transaction_date: Option<NaiveDate>) {
        let result = match self {
            Self::ValidateGstinInfo => {
                validate_gstin_info(Some(record), transaction_date, ValidationMode::Log)
            }
            Self::ValidateTransporterIdInfo => {
                validate_transporter_id_info(Some(record), ValidationMode::Log)
            }
        };
        debug_assert!(result.is_ok(), "log-mode validation never fails");
    }
}

/// Parameters of [`GstinStatusService::create_or_update_gstin_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub gstin: String,
    pub kind: LookupKind,
    pub transaction_date: Option<NaiveDate>,
    pub callback: Option<AfterRefresh>,
}

impl RefreshRequest {
    /// GSTIN lookup via the preferred source.
    pub fn gstin(gstin: impl Into<String>) -> Self {
        Self {
            gstin: gstin.into(),
            kind: LookupKind::Gstin {
                use_public_api: false,
            },
            transaction_date: None,
            callback: None,
        }
    }

    /// Transporter ID lookup.
    pub fn transporter_id(transporter_id: impl Into<String>) -> Self {
        Self {
            kind: LookupKind::TransporterId,
            ..Self::gstin(transporter_id)
        }
    }

    pub fn use_public_api(mut self, use_public_api: bool) -> Self {
        if let LookupKind::Gstin { .. } = self.kind {
            self.kind = LookupKind::Gstin { use_public_api };
        }
        self
    }

    pub fn transaction_date(mut self, date: Option<NaiveDate>) -> Self {
        self.transaction_date = date;
        self
    }

    pub fn callback(mut self, callback: AfterRefresh) -> Self {
        self.callback = Some(callback);
        self
    }
}

/// Looks up, refreshes and persists GSTIN status.
///
/// Cheap to clone; background refreshes run on a clone.
#[derive(Clone)]
pub struct GstinStatusService {
    settings: Arc<GstSettings>,
    apis: ApiClients,
    store: Arc<dyn GstinStore>,
    suppressions: Suppressions,
    dispatcher: Arc<dyn JobDispatcher>,
    clock: Clock,
}

impl fmt::Debug for GstinStatusService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GstinStatusService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl GstinStatusService {
    /// Service backed by an in-memory store and flag cache, using UTC wall time.
    pub fn new(settings: GstSettings, apis: ApiClients, dispatcher: Arc<dyn JobDispatcher>) -> Self {
        Self {
            settings: Arc::new(settings),
            apis,
            store: Arc::new(MemoryStore::new()),
            suppressions: Suppressions::new(Arc::new(MemoryCache::new())),
            dispatcher,
            clock: Arc::new(|| Utc::now().naive_utc()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn GstinStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn FlagCache>) -> Self {
        self.suppressions = Suppressions::new(cache);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &GstSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn GstinStore> {
        &self.store
    }

    pub fn suppressions(&self) -> &Suppressions {
        &self.suppressions
    }

    /// GSTIN whose e-invoice credentials are used for background lookups.
    pub fn company_gstin(&self) -> Option<&str> {
        self.settings.company_gstin()
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Return the status record for `gstin`, refreshing it when required.
    ///
    /// - Refresh not required (and not forced): the stored record, if any.
    /// - From the UI: looked up now and the refreshed record returned.
    /// - Otherwise: a refresh is queued and `None` returned; the queued job
    ///   validates the refreshed record against `transaction_date`.
    ///
    /// `None` is ambiguous: not fetched yet, fetch failed, or suppressed.
    pub async fn get_gstin_status(
        &self,
        gstin: &str,
        transaction_date: Option<NaiveDate>,
        options: LookupOptions,
    ) -> Result<Option<GstinRecord>, GstinError> {
        let gstin = gstin.trim().to_uppercase();
        if gstin.is_empty() {
            return Ok(None);
        }

        if !options.force_update && !self.is_status_refresh_required(&gstin, transaction_date).await? {
            return Ok(self.store.get(&gstin).await?);
        }

        self.get_updated_gstin(&gstin, transaction_date, options).await
    }

    /// Apply the refresh policy to the stored record for `gstin`.
    pub async fn is_status_refresh_required(
        &self,
        gstin: &str,
        transaction_date: Option<NaiveDate>,
    ) -> Result<bool, GstinError> {
        let existing = self.store.get(gstin).await?;
        let decision = refresh_decision(
            &self.settings,
            existing.as_ref(),
            transaction_date,
            self.suppressions.is_recently_checked(gstin),
            self.now(),
        );
        debug!(%gstin, ?decision, "GSTIN refresh decision");
        Ok(decision.is_required())
    }

    async fn get_updated_gstin(
        &self,
        gstin: &str,
        transaction_date: Option<NaiveDate>,
        options: LookupOptions,
    ) -> Result<Option<GstinRecord>, GstinError> {
        if options.from_ui {
            let request = RefreshRequest::gstin(gstin).use_public_api(options.force_update);
            return self.create_or_update_gstin_status(request).await;
        }

        self.enqueue_refresh(
            RefreshRequest::gstin(gstin)
                .transaction_date(transaction_date)
                .callback(AfterRefresh::ValidateGstinInfo),
        );
        Ok(None)
    }

    /// Queue a refresh on the short queue, to start after commit.
    pub fn enqueue_refresh(&self, request: RefreshRequest) {
        let service = self.clone();
        debug!(gstin = %request.gstin, "queueing GSTIN status refresh");
        self.dispatcher.enqueue(
            "create_or_update_gstin_status",
            EnqueueOptions::short_after_commit(),
            async move {
                let gstin = request.gstin.clone();
                if let Err(e) = service.create_or_update_gstin_status(request).await {
                    error!(%gstin, error = %e, "background GSTIN status refresh failed");
                }
            }
            .boxed(),
        );
    }

    /// Fetch the status from the source selected by `request.kind`, merge it
    /// into the stored record, and run the callback on the saved record.
    ///
    /// Returns `Ok(None)` when nothing was fetched. API failures never
    /// surface here; an invalid GSTIN or a store failure does.
    pub async fn create_or_update_gstin_status(
        &self,
        request: RefreshRequest,
    ) -> Result<Option<GstinRecord>, GstinError> {
        let update = match request.kind {
            LookupKind::TransporterId => self.get_transporter_id_info(&request.gstin).await,
            LookupKind::Gstin { use_public_api } => {
                self.get_gstin_info(&request.gstin, use_public_api).await?
            }
        };

        let Some(update) = update else {
            return Ok(None);
        };

        let record = self.save(update).await?;

        if let Some(callback) = request.callback {
            callback.run(&record, request.transaction_date);
        }

        Ok(Some(record))
    }

    /// Persist an already-fetched public API response.
    pub async fn upsert_public_response(
        &self,
        response: PublicGstinInfo,
    ) -> Result<GstinRecord, GstinError> {
        let mut update = normalize_public(response)?;
        update.gstin = validate_gstin(&update.gstin)?;
        self.save(update).await
    }

    /// Hard refresh from the public API.
    pub async fn refresh_gstin_status(&self, gstin: &str) -> Result<Option<GstinRecord>, GstinError> {
        self.create_or_update_gstin_status(RefreshRequest::gstin(gstin).use_public_api(true))
            .await
    }

    /// Refresh the transporter ID status of `gstin` from the e-waybill API.
    pub async fn refresh_transporter_id_status(
        &self,
        gstin: &str,
    ) -> Result<Option<GstinRecord>, GstinError> {
        self.create_or_update_gstin_status(RefreshRequest::transporter_id(gstin))
            .await
    }

    /// Return period up to which the party has filed GSTR-1, if known.
    pub async fn gstr_1_filed_upto(&self, gstin: &str) -> Result<Option<NaiveDate>, GstinError> {
        let gstin = gstin.trim().to_uppercase();
        if gstin.is_empty() {
            return Ok(None);
        }
        Ok(self
            .store
            .get(&gstin)
            .await?
            .and_then(|record| record.gstr_1_filed_upto))
    }

    async fn save(&self, update: GstinUpdate) -> Result<GstinRecord, GstinError> {
        let now = self.now();
        let mut record = match self.store.get(&update.gstin).await? {
            Some(record) => record,
            None => GstinRecord::new(update.gstin.clone(), now),
        };

        record.apply(update, now);
        self.store.upsert(record.clone()).await?;
        info!(gstin = %record.gstin, status = ?record.status, "GSTIN status saved");
        Ok(record)
    }

    /// Fetch and normalize GSTIN details. Failures are logged and yield `None`.
    async fn get_gstin_info(
        &self,
        gstin: &str,
        use_public_api: bool,
    ) -> Result<Option<GstinUpdate>, GstinError> {
        let gstin = validate_gstin(gstin)?;

        let result = self.fetch_gstin_info(&gstin, use_public_api).await;
        self.suppressions.mark_checked(&gstin);

        match result {
            Ok(update) => Ok(update),
            Err(e) => {
                if e.is_server_error() {
                    self.suppressions.trip_breaker();
                }
                error!(%gstin, error = %e, "Error fetching GSTIN status");
                Ok(None)
            }
        }
    }

    async fn fetch_gstin_info(
        &self,
        gstin: &str,
        use_public_api: bool,
    ) -> Result<Option<GstinUpdate>, ApiError> {
        if self.suppressions.is_server_down() {
            debug!(%gstin, "GST server unavailable, skipping lookup");
            return Ok(None);
        }

        match self.company_gstin() {
            Some(company_gstin) if !use_public_api => {
                let info = self.apis.e_invoice.get_gstin_info(company_gstin, gstin).await?;
                normalize_e_invoice(gstin, info).map(Some)
            }
            _ => {
                let info = self.apis.public.get_gstin_info(gstin).await?;
                normalize_public(info).map(Some)
            }
        }
    }

    async fn get_transporter_id_info(&self, transporter_id: &str) -> Option<GstinUpdate> {
        if !self.settings.enable_e_waybill {
            return None;
        }
        let company_gstin = self.company_gstin()?;

        match self
            .apis
            .e_waybill
            .get_transporter_details(company_gstin, transporter_id)
            .await
        {
            Ok(details) => normalize_transporter(transporter_id, details),
            Err(e) => {
                error!(%transporter_id, error = %e, "Error fetching transporter ID status");
                None
            }
        }
    }
}
