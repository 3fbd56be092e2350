//! Transaction-date consistency checks against the registration window.

use chrono::NaiveDate;
use tracing::error;

use crate::core::{GstinError, GstinRecord, GstinStatus, StatusValidationError, TransporterIdStatus};

/// What to do when a check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Return the failure as an error (interactive callers).
    Throw,
    /// Log the failure and carry on (background jobs).
    #[default]
    Log,
}

/// Check a transaction date against the registration data of `record`.
///
/// # Logic
///
/// 1. Registration date missing → error
/// 2. Transaction before registration → error
/// 3. Cancelled and transaction on/after cancellation → error
/// 4. Status neither Active nor Cancelled → error
pub fn check_gstin_info(
    record: &GstinRecord,
    transaction_date: NaiveDate,
) -> Result<(), StatusValidationError> {
    let gstin = || record.gstin.clone();

    let Some(registration_date) = record.registration_date else {
        return Err(StatusValidationError::MissingRegistrationDate { gstin: gstin() });
    };

    if transaction_date < registration_date {
        return Err(StatusValidationError::BeforeRegistration {
            gstin: gstin(),
            registration_date,
        });
    }

    if record.status == Some(GstinStatus::Cancelled) {
        let cancelled_date = record.cancelled_date.unwrap_or(registration_date);
        if transaction_date >= cancelled_date {
            return Err(StatusValidationError::AfterCancellation {
                gstin: gstin(),
                cancelled_date,
            });
        }
    }

    match record.status {
        Some(status) if status.is_settled() => Ok(()),
        status => Err(StatusValidationError::InactiveStatus {
            gstin: gstin(),
            status: status.map_or("Unknown", |s| s.as_str()).to_string(),
        }),
    }
}

/// Check that a transporter ID lookup resolved to an active transporter.
pub fn check_transporter_id_info(record: &GstinRecord) -> Result<(), StatusValidationError> {
    if record.transporter_id_status == Some(TransporterIdStatus::Active) {
        return Ok(());
    }
    Err(StatusValidationError::TransporterIdNotActive {
        transporter_id: record.gstin.clone(),
    })
}

/// Validate `record` for `transaction_date`, failing or logging per `mode`.
///
/// Does nothing when either the record or the date is missing.
pub fn validate_gstin_info(
    record: Option<&GstinRecord>,
    transaction_date: Option<NaiveDate>,
    mode: ValidationMode,
) -> Result<(), GstinError> {
    let (Some(record), Some(transaction_date)) = (record, transaction_date) else {
        return Ok(());
    };

    match check_gstin_info(record, transaction_date) {
        Ok(()) => Ok(()),
        Err(e) if mode == ValidationMode::Throw => Err(GstinError::InvalidPartyGstin(e)),
        Err(e) => {
            error!(gstin = %record.gstin, %transaction_date, "Invalid Party GSTIN: {e}");
            Ok(())
        }
    }
}

/// Validate a transporter ID record, failing or logging per `mode`.
pub fn validate_transporter_id_info(
    record: Option<&GstinRecord>,
    mode: ValidationMode,
) -> Result<(), GstinError> {
    let Some(record) = record else {
        return Ok(());
    };

    match check_transporter_id_info(record) {
        Ok(()) => Ok(()),
        Err(e) if mode == ValidationMode::Throw => Err(GstinError::InvalidTransporterId(e)),
        Err(e) => {
            error!(transporter_id = %record.gstin, "Invalid Transporter ID: {e}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active() -> GstinRecord {
        GstinRecord::builder("27AAPFU0939F1ZV")
            .status(GstinStatus::Active)
            .registration_date(date(2020, 1, 10))
            .build()
    }

    #[test]
    fn active_on_registration_day() {
        assert!(check_gstin_info(&active(), date(2020, 1, 10)).is_ok());
    }

    #[test]
    fn missing_registration_date() {
        let record = GstinRecord::builder("27AAPFU0939F1ZV")
            .status(GstinStatus::Active)
            .build();
        assert!(matches!(
            check_gstin_info(&record, date(2020, 1, 10)),
            Err(StatusValidationError::MissingRegistrationDate { .. })
        ));
    }

    #[test]
    fn unknown_status_is_reported() {
        let record = GstinRecord::builder("88AAACT2983B1Z9")
            .registration_date(date(2020, 1, 10))
            .build();
        let err = check_gstin_info(&record, date(2021, 1, 1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Status of Party GSTIN 88AAACT2983B1Z9 is Unknown"
        );
    }

    #[test]
    fn log_mode_swallows_failures() {
        let result = validate_gstin_info(Some(&active()), Some(date(2019, 1, 1)), ValidationMode::Log);
        assert!(result.is_ok());
    }

    #[test]
    fn throw_mode_returns_error() {
        let result =
            validate_gstin_info(Some(&active()), Some(date(2019, 1, 1)), ValidationMode::Throw);
        assert!(matches!(result, Err(GstinError::InvalidPartyGstin(_))));
    }

    #[test]
    fn no_date_is_noop() {
        assert!(validate_gstin_info(Some(&active()), None, ValidationMode::Throw).is_ok());
        assert!(validate_gstin_info(None, Some(date(2019, 1, 1)), ValidationMode::Throw).is_ok());
    }

    #[test]
    fn transporter_status() {
        let mut record = active();
        assert!(matches!(
            validate_transporter_id_info(Some(&record), ValidationMode::Throw),
            Err(GstinError::InvalidTransporterId(_))
        ));
        record.transporter_id_status = Some(TransporterIdStatus::Active);
        assert!(validate_transporter_id_info(Some(&record), ValidationMode::Throw).is_ok());
    }
}
