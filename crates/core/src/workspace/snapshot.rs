use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    addon::AddOnMatrix, block::BlockConfig, numeric::lenient, option::OptionSet, row::RowMatrix,
    vendor::VendorParsedPricing,
};
use crate::errors::ApplicationError;

/// Opaque persisted form of a workspace, written and read back wholesale. Unversioned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub configs: OptionSet<BlockConfig>,
    pub rows: RowMatrix,
    pub add_on_rows: AddOnMatrix,
    #[serde(default)]
    pub vendor_text: String,
    #[serde(default)]
    pub detected_currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub conversion_rate: Option<Decimal>,
    #[serde(default)]
    pub ai_parsed_data: Option<VendorParsedPricing>,
}

impl WorkspaceSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, ApplicationError> {
        serde_json::from_str(raw).map_err(|error| ApplicationError::Serialization(error.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ApplicationError> {
        serde_json::to_string_pretty(self)
            .map_err(|error| ApplicationError::Serialization(error.to_string()))
    }
}
