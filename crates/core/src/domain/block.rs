use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::WorkspaceDefaults;
use crate::domain::numeric::lenient;
use crate::domain::option::OptionSet;

/// Per-option passenger count and percentage rates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    #[serde(default, deserialize_with = "lenient::count")]
    pub passenger_count: u32,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub markup_pct: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub gst_pct: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub tcs_pct: Decimal,
}

impl BlockConfig {
    pub fn new(passenger_count: u32, markup_pct: Decimal, gst_pct: Decimal, tcs_pct: Decimal) -> Self {
        Self { passenger_count, markup_pct, gst_pct, tcs_pct }
    }

    pub fn from_defaults(defaults: &WorkspaceDefaults) -> Self {
        Self {
            passenger_count: defaults.passenger_count,
            markup_pct: defaults.markup_pct,
            gst_pct: defaults.gst_pct,
            tcs_pct: defaults.tcs_pct,
        }
    }

    pub fn with_rates(&self, markup_pct: Decimal, gst_pct: Decimal, tcs_pct: Decimal) -> Self {
        Self { passenger_count: self.passenger_count, markup_pct, gst_pct, tcs_pct }
    }
}

pub fn default_configs(defaults: &WorkspaceDefaults) -> OptionSet<BlockConfig> {
    OptionSet::uniform(BlockConfig::from_defaults(defaults))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::BlockConfig;

    #[test]
    fn malformed_percentages_coerce_to_zero() {
        let config: BlockConfig = serde_json::from_value(json!({
            "passengerCount": "4",
            "markupPct": "ten",
            "gstPct": 5
        }))
        .expect("lenient config");

        assert_eq!(config.passenger_count, 4);
        assert_eq!(config.markup_pct, Decimal::ZERO);
        assert_eq!(config.gst_pct, Decimal::from(5));
        assert_eq!(config.tcs_pct, Decimal::ZERO);
    }
}
