//! Quotation-facing price list derived from block results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{
    child::ChildCostEntry,
    money::{per_unit, total},
    BlockResult, QuotationCalculation,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPriceSummary {
    pub label: String,
    pub per_person_cost: Decimal,
    pub gst_amount: Decimal,
    pub tcs_amount: Decimal,
    pub net_cost_per_person: Decimal,
    pub add_on_cost: Decimal,
    pub net_payable: Decimal,
    pub child_costs: Vec<ChildCostEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPriceList {
    pub options: Vec<OptionPriceSummary>,
}

/// Converts each priced option into average per-person rates.
///
/// Adult figures divide the whole block by the total passenger count, children
/// included, while child entries are already per child. The two are therefore not
/// additive; that split is kept as-is until a passenger breakdown exists.
pub fn commit_to_quotation(calculation: &QuotationCalculation) -> QuotationPriceList {
    let options = calculation
        .blocks
        .iter()
        .filter(|(_, block)| !block.grand_total.is_zero())
        .map(|(option, block)| summarize(option.label(), block))
        .collect();

    QuotationPriceList { options }
}

fn summarize(label: &str, block: &BlockResult) -> OptionPriceSummary {
    let passengers = Decimal::from(block.passenger_count);

    let per_person_cost = per_unit(block.cascade.with_markup, passengers);
    let gst_amount = per_unit(block.cascade.gst_amount, passengers);
    let tcs_amount = per_unit(block.cascade.tcs_amount, passengers);
    let net_cost_per_person = total([per_person_cost, gst_amount, tcs_amount]);
    let add_on_cost = per_unit(block.add_on_total, passengers);

    OptionPriceSummary {
        label: label.to_string(),
        per_person_cost,
        gst_amount,
        tcs_amount,
        net_cost_per_person,
        add_on_cost,
        net_payable: net_cost_per_person.saturating_add(add_on_cost),
        child_costs: block.child_costs.clone(),
    }
}
