//! Map API payloads into the canonical [`GstinUpdate`] shape.

use chrono::{NaiveDate, NaiveDateTime};

use super::client::{ApiError, EInvoiceGstinInfo, PublicGstinInfo, TransporterDetails};
use crate::core::{GstinDetails, GstinStatus, GstinUpdate, TransporterIdStatus, parse_block_status};

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y"];
const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Parse a date as reported by the APIs, returning `None` for empty or
/// unparseable values.
///
/// `day_first` selects `dd/mm/yyyy` (public API) over `yyyy-mm-dd`.
/// A trailing time part is accepted and dropped.
pub fn parse_api_date(value: Option<&str>, day_first: bool) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    let date_formats = if day_first {
        DAY_FIRST_FORMATS
    } else {
        YEAR_FIRST_FORMATS
    };

    date_formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_status(value: &str) -> Result<GstinStatus, ApiError> {
    GstinStatus::from_api(value)
        .ok_or_else(|| ApiError::Parse(format!("unknown GSTIN status '{value}'")))
}

/// Normalize a public search API response.
pub fn normalize_public(info: PublicGstinInfo) -> Result<GstinUpdate, ApiError> {
    let status = parse_status(&info.sts)?;
    Ok(GstinUpdate {
        details: Some(GstinDetails {
            status,
            registration_date: parse_api_date(info.rgdt.as_deref(), true),
            cancelled_date: parse_api_date(info.cxdt.as_deref(), true),
            is_blocked: None,
        }),
        gstin: info.gstin.trim().to_uppercase(),
        transporter_id_status: None,
    })
}

/// Normalize an e-invoice API response for the requested `gstin`.
pub fn normalize_e_invoice(gstin: &str, info: EInvoiceGstinInfo) -> Result<GstinUpdate, ApiError> {
    let status = parse_status(&info.status)?;
    Ok(GstinUpdate {
        gstin: gstin.to_string(),
        details: Some(GstinDetails {
            status,
            registration_date: parse_api_date(info.dt_reg.as_deref(), false),
            cancelled_date: parse_api_date(info.dt_d_reg.as_deref(), false),
            is_blocked: Some(
                info.blk_status
                    .as_deref()
                    .and_then(parse_block_status)
                    .unwrap_or(false),
            ),
        }),
        transporter_id_status: None,
    })
}

/// Normalize an e-waybill transporter lookup. An empty response yields nothing.
pub fn normalize_transporter(
    transporter_id: &str,
    details: Option<TransporterDetails>,
) -> Option<GstinUpdate> {
    let details = details?;
    let active = details
        .transin
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());

    Some(GstinUpdate {
        gstin: transporter_id.to_string(),
        details: None,
        transporter_id_status: Some(if active {
            TransporterIdStatus::Active
        } else {
            TransporterIdStatus::Invalid
        }),
    })
}
