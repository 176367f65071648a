use serde::{Deserialize, Serialize};

use crate::workspace::extractor::ExtractionRequest;

/// Questions the extraction collaborator could not settle on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationRequest {
    pub questions: Vec<String>,
}

impl ClarificationRequest {
    /// Builds the one-shot resubmission: the original vendor text plus the user's answer.
    pub fn answer(&self, vendor_text: &str, answer: &str) -> ExtractionRequest {
        ExtractionRequest {
            vendor_text: vendor_text.to_string(),
            clarification: Some(answer.trim().to_string()).filter(|answer| !answer.is_empty()),
        }
    }
}

/// Where a workspace stands in the propose → answer → apply exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClarificationState {
    #[default]
    AwaitingInput,
    Clarifying { request: ClarificationRequest },
    Resolved,
}
