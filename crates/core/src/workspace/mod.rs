//! A single quotation being edited: its matrices plus the vendor autofill exchange.

pub mod extractor;
pub mod snapshot;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::WorkspaceDefaults;
use crate::domain::{vendor::VendorParsedPricing, PricingMatrices};
use crate::errors::{ApplicationError, DomainError};
use crate::pricing::{
    calculate_quotation,
    summary::{commit_to_quotation, QuotationPriceList},
    QuotationCalculation,
};
use crate::reconcile::{
    clarification::{ClarificationRequest, ClarificationState},
    currency::{CurrencyConfirmation, CurrencyRequirement},
    ReconcileOutcome, VendorDataReconciler,
};

use self::{
    extractor::{ExtractionRequest, PricingExtractor},
    snapshot::WorkspaceSnapshot,
};

/// What the caller has to do next after an extraction comes back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
    NeedsClarification { request: ClarificationRequest },
    NeedsConversionRate { currency: String },
    Ready,
}

pub struct QuotationWorkspace {
    reconciler: VendorDataReconciler,
    matrices: PricingMatrices,
    vendor_text: String,
    detected_currency: Option<String>,
    conversion_rate: Option<Decimal>,
    ai_parsed_data: Option<VendorParsedPricing>,
    clarification: ClarificationState,
}

impl QuotationWorkspace {
    pub fn open(defaults: &WorkspaceDefaults) -> Self {
        Self {
            reconciler: VendorDataReconciler::new(defaults.home_currency.clone()),
            matrices: PricingMatrices::with_defaults(defaults),
            vendor_text: String::new(),
            detected_currency: None,
            conversion_rate: None,
            ai_parsed_data: None,
            clarification: ClarificationState::AwaitingInput,
        }
    }

    pub fn from_snapshot(snapshot: WorkspaceSnapshot, home_currency: impl Into<String>) -> Self {
        // A restored extraction counts as pending until it is applied in this session.
        let questions =
            snapshot.ai_parsed_data.as_ref().map(VendorParsedPricing::open_questions).unwrap_or_default();
        let clarification = if questions.is_empty() {
            ClarificationState::AwaitingInput
        } else {
            ClarificationState::Clarifying { request: ClarificationRequest { questions } }
        };

        Self {
            reconciler: VendorDataReconciler::new(home_currency),
            matrices: PricingMatrices::new(snapshot.configs, snapshot.rows, snapshot.add_on_rows),
            vendor_text: snapshot.vendor_text,
            detected_currency: snapshot.detected_currency,
            conversion_rate: snapshot.conversion_rate,
            ai_parsed_data: snapshot.ai_parsed_data,
            clarification,
        }
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            configs: self.matrices.configs.clone(),
            rows: self.matrices.rows.clone(),
            add_on_rows: self.matrices.add_ons.clone(),
            vendor_text: self.vendor_text.clone(),
            detected_currency: self.detected_currency.clone(),
            conversion_rate: self.conversion_rate,
            ai_parsed_data: self.ai_parsed_data.clone(),
        }
    }

    pub fn matrices(&self) -> &PricingMatrices {
        &self.matrices
    }

    /// Direct user edits.
    pub fn matrices_mut(&mut self) -> &mut PricingMatrices {
        &mut self.matrices
    }

    pub fn clarification_state(&self) -> &ClarificationState {
        &self.clarification
    }

    pub fn conversion_rate(&self) -> Option<Decimal> {
        self.conversion_rate
    }

    pub fn detected_currency(&self) -> Option<&str> {
        self.detected_currency.as_deref()
    }

    pub fn pending_extraction(&self) -> Option<&VendorParsedPricing> {
        self.ai_parsed_data.as_ref()
    }

    pub fn calculate(&self) -> QuotationCalculation {
        calculate_quotation(&self.matrices)
    }

    pub fn price_list(&self) -> QuotationPriceList {
        commit_to_quotation(&self.calculate())
    }

    /// Sends vendor text to the extraction collaborator and records its answer.
    ///
    /// The matrices are not touched here. Upstream failures are reported as a generic
    /// processing failure and leave the workspace exactly as it was.
    pub async fn extract<E>(
        &mut self,
        extractor: &E,
        request: ExtractionRequest,
    ) -> Result<ExtractionStatus, ApplicationError>
    where
        E: PricingExtractor + ?Sized,
    {
        let parsed = match extractor.extract(&request).await {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(
                    event_name = "workspace.extraction.failed",
                    error = %error,
                    "vendor pricing extraction failed"
                );
                return Err(ApplicationError::Integration("processing failed".to_string()));
            }
        };

        let status = self.record_extraction(request.vendor_text, parsed);
        info!(
            event_name = "workspace.extraction.recorded",
            detected_currency = self.detected_currency.as_deref().unwrap_or("unknown"),
            "vendor pricing extraction recorded"
        );
        Ok(status)
    }

    /// Stores an already parsed extraction as the pending one, e.g. one restored from a document.
    pub fn record_extraction(
        &mut self,
        vendor_text: impl Into<String>,
        parsed: VendorParsedPricing,
    ) -> ExtractionStatus {
        let status = {
            let questions = parsed.open_questions();
            if !questions.is_empty() {
                ExtractionStatus::NeedsClarification { request: ClarificationRequest { questions } }
            } else {
                match self.reconciler.currency_requirement(&parsed) {
                    CurrencyRequirement::HomeCurrency => ExtractionStatus::Ready,
                    CurrencyRequirement::ConversionRequired { currency } => {
                        ExtractionStatus::NeedsConversionRate { currency }
                    }
                }
            }
        };

        self.vendor_text = vendor_text.into();
        self.detected_currency = parsed.currency_code();
        self.ai_parsed_data = Some(parsed);
        self.clarification = match &status {
            ExtractionStatus::NeedsClarification { request } => {
                ClarificationState::Clarifying { request: request.clone() }
            }
            ExtractionStatus::NeedsConversionRate { .. } | ExtractionStatus::Ready => {
                ClarificationState::AwaitingInput
            }
        };

        status
    }

    /// Applies the pending extraction. On success the configs, rows and add-ons are
    /// replaced together; on any error nothing changes.
    pub fn apply_pending(
        &mut self,
        confirmation: CurrencyConfirmation,
    ) -> Result<ReconcileOutcome, ApplicationError> {
        let parsed = self.ai_parsed_data.as_ref().ok_or(DomainError::NothingToApply)?;
        let outcome = self.reconciler.reconcile(&self.matrices, parsed, confirmation)?;

        match &outcome {
            ReconcileOutcome::Resolved(reconciliation) => {
                self.matrices = reconciliation.matrices.clone();
                self.conversion_rate = Some(reconciliation.conversion_rate);
                self.clarification = ClarificationState::Resolved;
            }
            ReconcileOutcome::NeedsClarification(request) => {
                self.clarification = ClarificationState::Clarifying { request: request.clone() };
            }
        }

        Ok(outcome)
    }
}
