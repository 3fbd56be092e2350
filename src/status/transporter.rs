//! Transporter ID validation.

use tracing::{debug, warn};

use super::service::{AfterRefresh, GstinStatusService, RefreshRequest};
use crate::core::{
    GstinError, GstinStatus, TransporterIdStatus, is_transporter_id_format, needs_transporter_api,
};
use crate::runtime::GstinStore;

/// Result of [`GstinStatusService::validate_gst_transporter_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransporterIdVerdict {
    /// The GSTIN or the transporter ID is active.
    Active,
    /// Neither status resolved to Active. The message is meant for the user.
    Inactive { message: String },
    /// No status could be obtained.
    Unresolved,
}

/// Warning shown for a transporter ID that does not resolve to Active.
pub fn inactive_transporter_message(transporter_id: &str) -> String {
    format!("Transporter ID {transporter_id} seems to be Inactive")
}

impl GstinStatusService {
    /// Validate a GST transporter ID and warn when it is not active.
    ///
    /// # Logic
    ///
    /// 1. Malformed IDs (not 15 alphanumerics) stay unresolved without a lookup
    /// 2. Use the stored record if there is one
    /// 3. IDs starting with "88" or failing the GSTIN check digit go to the
    ///    transporter API; anything else to the GSTIN APIs
    /// 4. GSTIN status not Active and no transporter status known → ask the
    ///    transporter API
    /// 5. Active GSTIN or Active transporter ID → [`TransporterIdVerdict::Active`]
    pub async fn validate_gst_transporter_id(
        &self,
        transporter_id: &str,
    ) -> Result<TransporterIdVerdict, GstinError> {
        let transporter_id = transporter_id.trim().to_uppercase();
        if !is_transporter_id_format(&transporter_id) {
            debug!(%transporter_id, "malformed transporter ID, skipping lookup");
            return Ok(TransporterIdVerdict::Unresolved);
        }

        let record = match self.store().get(&transporter_id).await? {
            Some(record) => Some(record),
            None if needs_transporter_api(&transporter_id) => {
                self.create_or_update_gstin_status(
                    RefreshRequest::transporter_id(&transporter_id)
                        .callback(AfterRefresh::ValidateTransporterIdInfo),
                )
                .await?
            }
            None => {
                self.create_or_update_gstin_status(
                    RefreshRequest::gstin(&transporter_id).callback(AfterRefresh::ValidateGstinInfo),
                )
                .await?
            }
        };

        let Some(mut record) = record else {
            return Ok(TransporterIdVerdict::Unresolved);
        };

        if record.status != Some(GstinStatus::Active) && record.transporter_id_status.is_none() {
            if let Some(refreshed) = self
                .create_or_update_gstin_status(
                    RefreshRequest::transporter_id(&transporter_id)
                        .callback(AfterRefresh::ValidateTransporterIdInfo),
                )
                .await?
            {
                record = refreshed;
            }
        }

        if record.status == Some(GstinStatus::Active)
            || record.transporter_id_status == Some(TransporterIdStatus::Active)
        {
            return Ok(TransporterIdVerdict::Active);
        }

        let message = inactive_transporter_message(&transporter_id);
        warn!(%transporter_id, "{message}");
        Ok(TransporterIdVerdict::Inactive { message })
    }
}
