use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Registration status reported by the GST network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstinStatus {
    /// `ACT` — registration is active.
    Active,
    /// `CNL` — registration was cancelled.
    Cancelled,
    /// `INA` — registration is inactive.
    Inactive,
    /// `PRO` — provisional registration.
    Provisional,
    /// `SUS` — registration is suspended.
    Suspended,
}

impl GstinStatus {
    /// Parse a status as reported by the APIs: either the three-letter code
    /// (`ACT`, `CNL`, ...) or the full name, case-insensitively.
    pub fn from_api(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ACT" | "ACTIVE" => Some(Self::Active),
            "CNL" | "CANCELLED" => Some(Self::Cancelled),
            "INA" | "INACTIVE" => Some(Self::Inactive),
            "PRO" | "PROVISIONAL" => Some(Self::Provisional),
            "SUS" | "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }

    /// The three-letter code used by the e-invoice API.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Active => "ACT",
            Self::Cancelled => "CNL",
            Self::Inactive => "INA",
            Self::Provisional => "PRO",
            Self::Suspended => "SUS",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
            Self::Inactive => "Inactive",
            Self::Provisional => "Provisional",
            Self::Suspended => "Suspended",
        }
    }

    /// Active and Cancelled are the only statuses whose validity window
    /// is fully known from the registration and cancellation dates.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Active | Self::Cancelled)
    }
}

impl fmt::Display for GstinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the e-invoice block status: `U` (unblocked) or `B` (blocked).
pub fn parse_block_status(value: &str) -> Option<bool> {
    match value.trim().to_uppercase().as_str() {
        "U" => Some(false),
        "B" => Some(true),
        _ => None,
    }
}

/// Transporter ID status reported by the e-waybill API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransporterIdStatus {
    Active,
    Invalid,
}

impl fmt::Display for TransporterIdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Invalid => f.write_str("Invalid"),
        }
    }
}

/// Canonical GSTIN status record, keyed by GSTIN or transporter ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstinRecord {
    /// GSTIN or transporter ID (primary key).
    pub gstin: String,
    /// Registration status. `None` for records only known through a
    /// transporter ID lookup.
    pub status: Option<GstinStatus>,
    /// Whether e-waybill generation is blocked for this GSTIN.
    pub is_blocked: bool,
    /// Date of registration.
    pub registration_date: Option<NaiveDate>,
    /// Date of cancellation. Always set when `status` is Cancelled.
    pub cancelled_date: Option<NaiveDate>,
    /// When the record was last saved.
    pub last_updated_on: NaiveDateTime,
    /// Status of the transporter ID, if it was ever looked up as one.
    pub transporter_id_status: Option<TransporterIdStatus>,
    /// Return period up to which GSTR-1 has been filed.
    pub gstr_1_filed_upto: Option<NaiveDate>,
}

impl GstinRecord {
    /// Start building a record for the given GSTIN.
    pub fn builder(gstin: impl Into<String>) -> GstinRecordBuilder {
        GstinRecordBuilder::new(gstin)
    }

    /// Create an empty record that has not been saved yet.
    pub fn new(gstin: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            gstin: gstin.into(),
            status: None,
            is_blocked: false,
            registration_date: None,
            cancelled_date: None,
            last_updated_on: now,
            transporter_id_status: None,
            gstr_1_filed_upto: None,
        }
    }

    /// Merge a normalized API update into this record and stamp it as
    /// saved at `now`.
    ///
    /// The block flag only holds while the latest update reports it; any
    /// other update clears it.
    pub fn apply(&mut self, update: GstinUpdate, now: NaiveDateTime) {
        self.is_blocked = update
            .details
            .as_ref()
            .and_then(|details| details.is_blocked)
            .unwrap_or(false);

        if let Some(details) = update.details {
            self.status = Some(details.status);
            self.registration_date = details.registration_date;
            self.cancelled_date = details.cancelled_date;
        }

        if let Some(status) = update.transporter_id_status {
            self.transporter_id_status = Some(status);
        }

        self.before_save(now);
    }

    /// Normalize the record before persisting it.
    pub fn before_save(&mut self, now: NaiveDateTime) {
        if self.status == Some(GstinStatus::Cancelled) && self.cancelled_date.is_none() {
            self.cancelled_date = self.registration_date;
        }
        self.last_updated_on = now;
    }

    /// Whether the cancelled-date invariant holds for this record.
    pub fn is_consistent(&self) -> bool {
        self.status != Some(GstinStatus::Cancelled) || self.cancelled_date.is_some()
    }
}

/// Registration details reported by one of the GSTIN APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstinDetails {
    pub status: GstinStatus,
    pub registration_date: Option<NaiveDate>,
    pub cancelled_date: Option<NaiveDate>,
    /// `None` when the source does not report the block status.
    pub is_blocked: Option<bool>,
}

/// A normalized API response, ready to be merged into a [`GstinRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstinUpdate {
    /// GSTIN or transporter ID the update belongs to.
    pub gstin: String,
    /// Registration details, present for GSTIN lookups.
    pub details: Option<GstinDetails>,
    /// Transporter ID status, present for transporter lookups.
    pub transporter_id_status: Option<TransporterIdStatus>,
}

/// Builder for [`GstinRecord`], mostly useful in tests and when seeding stores.
#[derive(Debug, Clone)]
pub struct GstinRecordBuilder {
    record: GstinRecord,
}

impl GstinRecordBuilder {
    pub fn new(gstin: impl Into<String>) -> Self {
        Self {
            record: GstinRecord::new(gstin, NaiveDateTime::default()),
        }
    }

    pub fn status(mut self, status: GstinStatus) -> Self {
        self.record.status = Some(status);
        self
    }

    pub fn blocked(mut self, blocked: bool) -> Self {
        self.record.is_blocked = blocked;
        self
    }

    pub fn registration_date(mut self, date: NaiveDate) -> Self {
        self.record.registration_date = Some(date);
        self
    }

    pub fn cancelled_date(mut self, date: NaiveDate) -> Self {
        self.record.cancelled_date = Some(date);
        self
    }

    pub fn last_updated_on(mut self, at: NaiveDateTime) -> Self {
        self.record.last_updated_on = at;
        self
    }

    pub fn transporter_id_status(mut self, status: TransporterIdStatus) -> Self {
        self.record.transporter_id_status = Some(status);
        self
    }

    pub fn gstr_1_filed_upto(mut self, date: NaiveDate) -> Self {
        self.record.gstr_1_filed_upto = Some(date);
        self
    }

    /// Build the record as-is, without applying save-time normalization.
    pub fn build(self) -> GstinRecord {
        self.record
    }
}
