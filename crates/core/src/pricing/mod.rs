pub mod addon;
pub mod cascade;
pub mod child;
pub mod money;
pub mod summary;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    addon::{AddOnCategory, AddOnId},
    option::{OptionIndex, OptionSet},
    row::{RowId, RowOption},
    PricingMatrices,
};

use self::{
    addon::{price_add_on, AddOnBreakdown},
    cascade::TaxCascade,
    child::{extract_child_costs, ChildCostEntry},
    money::{per_unit, product, round_up_to_hundred, total},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOptionTotals {
    pub line_total: Decimal,
    pub option_cost: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowTotals {
    pub id: RowId,
    pub label: String,
    pub options: OptionSet<RowOptionTotals>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnTotals {
    pub id: AddOnId,
    pub category: AddOnCategory,
    pub options: OptionSet<AddOnBreakdown>,
}

/// Fully priced package for one option. Always derived, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResult {
    pub option: OptionIndex,
    pub passenger_count: u32,
    pub cascade: TaxCascade,
    pub land_package_total: Decimal,
    pub add_on_total: Decimal,
    pub add_on_net_margin: Decimal,
    pub grand_total: Decimal,
    pub rounded_total: Decimal,
    pub per_person: Decimal,
    pub child_costs: Vec<ChildCostEntry>,
    pub trace: Vec<PricingTraceStep>,
}

impl BlockResult {
    pub fn subtotal(&self) -> Decimal {
        self.cascade.subtotal
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationCalculation {
    pub blocks: OptionSet<BlockResult>,
    pub rows: Vec<RowTotals>,
    pub add_ons: Vec<AddOnTotals>,
}

pub trait CalculationEngine: Send + Sync {
    fn calculate(&self, matrices: &PricingMatrices) -> QuotationCalculation;
}

#[derive(Default)]
pub struct DeterministicCalculationEngine;

impl CalculationEngine for DeterministicCalculationEngine {
    fn calculate(&self, matrices: &PricingMatrices) -> QuotationCalculation {
        calculate_quotation(matrices)
    }
}

/// `(quantity × rate, quantity × rate × multiplier)` for one row in one option.
pub fn row_option_cost(values: &RowOption) -> (Decimal, Decimal) {
    let line_total = product(&[values.quantity, values.rate]);
    (line_total, line_total.saturating_mul(values.multiplier))
}

/// Prices all three options side by side. Pure: identical input yields identical output.
pub fn calculate_quotation(matrices: &PricingMatrices) -> QuotationCalculation {
    let rows: Vec<RowTotals> = matrices
        .rows
        .iter()
        .map(|row| RowTotals {
            id: row.id,
            label: row.label.clone(),
            options: row.options.map(|_, values| {
                let (line_total, option_cost) = row_option_cost(values);
                RowOptionTotals { line_total, option_cost }
            }),
        })
        .collect();

    let add_ons: Vec<AddOnTotals> = matrices
        .add_ons
        .iter()
        .map(|add_on| AddOnTotals {
            id: add_on.id,
            category: add_on.category,
            options: add_on.options.map(|_, option| price_add_on(option)),
        })
        .collect();

    let blocks = OptionSet::from_fn(|option| price_block(option, matrices, &rows, &add_ons));

    QuotationCalculation { blocks, rows, add_ons }
}

fn price_block(
    option: OptionIndex,
    matrices: &PricingMatrices,
    rows: &[RowTotals],
    add_ons: &[AddOnTotals],
) -> BlockResult {
    let config = &matrices.configs[option];

    let subtotal = total(rows.iter().map(|row| row.options[option].option_cost));
    let cascade = cascade::apply(subtotal, config);
    let land_package_total = cascade.net_total;

    let add_on_total = total(add_ons.iter().map(|add_on| add_on.options[option].final_cost));
    let add_on_net_margin = total(add_ons.iter().map(|add_on| add_on.options[option].net_margin));

    let grand_total = land_package_total.saturating_add(add_on_total);
    let rounded_total = round_up_to_hundred(grand_total);
    let per_person = per_unit(rounded_total, Decimal::from(config.passenger_count));

    let child_costs = extract_child_costs(&matrices.rows, option, config);

    let trace = vec![
        step("subtotal", "sum(quantity * rate * multiplier)", subtotal),
        step("markup", format!("{}% of subtotal", config.markup_pct), cascade.markup_amount),
        step("gst", format!("{}% of subtotal + markup", config.gst_pct), cascade.gst_amount),
        step("tcs", format!("{}% of subtotal + markup + gst", config.tcs_pct), cascade.tcs_amount),
        step("land_package", "subtotal + markup + gst + tcs", land_package_total),
        step("add_ons", "sum(quantity * (net_rate + markup_per_unit))", add_on_total),
        step("grand_total", "land_package + add_ons", grand_total),
        step("rounded_total", "grand_total rounded up to the next 100", rounded_total),
        step(
            "per_person",
            format!("rounded_total / {} passengers", config.passenger_count),
            per_person,
        ),
    ];

    BlockResult {
        option,
        passenger_count: config.passenger_count,
        cascade,
        land_package_total,
        add_on_total,
        add_on_net_margin,
        grand_total,
        rounded_total,
        per_person,
        child_costs,
        trace,
    }
}

fn step(stage: &str, detail: impl Into<String>, amount: Decimal) -> PricingTraceStep {
    PricingTraceStep { stage: stage.to_string(), detail: detail.into(), amount }
}
