use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::vendor::VendorParsedPricing;
use crate::errors::ApplicationError;

/// Input handed to the extraction collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub vendor_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification: Option<String>,
}

impl ExtractionRequest {
    pub fn new(vendor_text: impl Into<String>) -> Self {
        Self { vendor_text: vendor_text.into(), clarification: None }
    }
}

/// Turns raw vendor text into structured pricing. How it does so is not this crate's concern.
#[async_trait]
pub trait PricingExtractor: Send + Sync {
    async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<VendorParsedPricing, ApplicationError>;
}
