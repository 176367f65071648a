//! Structured vendor pricing as produced by the extraction collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::addon::AddOnCategory;
use crate::domain::numeric::lenient;
use crate::domain::option::OptionIndex;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorParsedPricing {
    #[serde(default)]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub total_pax: Option<u32>,
    #[serde(default, deserialize_with = "lenient::strings", skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
    #[serde(default)]
    pub unified_line_items: Vec<UnifiedLineItem>,
    #[serde(default)]
    pub add_ons: Vec<VendorAddOn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_configs: Option<ExtractedConfigs>,
}

impl VendorParsedPricing {
    /// Non-blank clarification questions, trimmed.
    pub fn open_questions(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|question| question.trim())
            .filter(|question| !question.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Upper-cased currency code; `None` when the extraction did not name one.
    pub fn currency_code(&self) -> Option<String> {
        let code = self.currency.trim();
        (!code.is_empty()).then(|| code.to_ascii_uppercase())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedLineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub cost_option1: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub cost_option2: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub cost_option3: Decimal,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub multiplier_option1: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub multiplier_option2: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub multiplier_option3: Option<Decimal>,
}

impl UnifiedLineItem {
    pub fn cost(&self, option: OptionIndex) -> Decimal {
        match option {
            OptionIndex::One => self.cost_option1,
            OptionIndex::Two => self.cost_option2,
            OptionIndex::Three => self.cost_option3,
        }
    }

    /// The historical per-option multiplier carried by a restored document, if any.
    pub fn multiplier(&self, option: OptionIndex) -> Option<Decimal> {
        match option {
            OptionIndex::One => self.multiplier_option1,
            OptionIndex::Two => self.multiplier_option2,
            OptionIndex::Three => self.multiplier_option3,
        }
    }

    pub fn has_any_multiplier(&self) -> bool {
        OptionIndex::ALL.into_iter().any(|option| self.multiplier(option).is_some())
    }

    /// Line quantity; an item that states none counts once.
    pub fn quantity_or_one(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ONE)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAddOn {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub cost_per_pax: Decimal,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
}

impl VendorAddOn {
    pub fn category(&self) -> Option<AddOnCategory> {
        AddOnCategory::parse(&self.kind)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedConfigs {
    #[serde(default, deserialize_with = "lenient::zero")]
    pub markup_pct: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub gst_pct: Decimal,
    #[serde(default, deserialize_with = "lenient::zero")]
    pub tcs_pct: Decimal,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::VendorParsedPricing;
    use crate::domain::addon::AddOnCategory;
    use crate::domain::option::OptionIndex;

    #[test]
    fn reads_restoration_payload() {
        let parsed: VendorParsedPricing = serde_json::from_value(json!({
            "currency": "inr",
            "totalPax": 4,
            "unifiedLineItems": [{
                "description": "Hotel Deluxe",
                "quantity": 2,
                "costOption1": 1000,
                "costOption2": "1,200",
                "costOption3": null,
                "multiplierOption1": 3,
                "multiplierOption2": 3.5
            }],
            "addOns": [{ "type": "Flight", "costPerPax": 15000 }],
            "extractedConfigs": { "markupPct": 10, "gstPct": 5, "tcsPct": 5 }
        }))
        .expect("parse vendor payload");

        let item = &parsed.unified_line_items[0];
        assert_eq!(parsed.currency_code().as_deref(), Some("INR"));
        assert_eq!(item.cost(OptionIndex::Two), Decimal::from(1200));
        assert_eq!(item.cost(OptionIndex::Three), Decimal::ZERO);
        assert_eq!(item.multiplier(OptionIndex::Two), Some(Decimal::new(35, 1)));
        assert_eq!(item.multiplier(OptionIndex::Three), None);
        assert_eq!(parsed.add_ons[0].category(), Some(AddOnCategory::Flight));
        assert!(parsed.extracted_configs.is_some());
    }

    #[test]
    fn blank_questions_are_not_open() {
        let parsed: VendorParsedPricing = serde_json::from_value(json!({
            "currency": "THB",
            "questions": ["  ", "Is breakfast included?", 42]
        }))
        .expect("parse questions");

        assert_eq!(parsed.open_questions(), vec!["Is breakfast included?".to_string()]);
        assert_eq!(parsed.total_pax, None);
    }
}
