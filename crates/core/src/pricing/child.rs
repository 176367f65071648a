use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::block::BlockConfig;
use crate::domain::option::OptionIndex;
use crate::domain::row::{Row, RowMatrix};
use crate::pricing::{cascade, money::per_unit, row_option_cost};

/// Per-child cost of one child row, after the full cascade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildCostEntry {
    pub label: String,
    pub base_cost: Decimal,
    pub gst_amount: Decimal,
    pub tcs_amount: Decimal,
    pub net_cost: Decimal,
}

/// Reruns the cascade on each priced child row of `option` and divides by the row's quantity.
///
/// Rows that are not tagged as child rows, or whose option cost is not positive,
/// are skipped. Amounts are rounded to two decimals.
pub fn extract_child_costs(
    rows: &RowMatrix,
    option: OptionIndex,
    config: &BlockConfig,
) -> Vec<ChildCostEntry> {
    rows.iter().filter_map(|row| child_cost(row, option, config)).collect()
}

fn child_cost(row: &Row, option: OptionIndex, config: &BlockConfig) -> Option<ChildCostEntry> {
    if !row.category.is_child() {
        return None;
    }

    let values = &row.options[option];
    let (_, option_cost) = row_option_cost(values);
    if option_cost <= Decimal::ZERO {
        return None;
    }

    let cascade = cascade::apply(option_cost, config);
    let quantity = values.quantity;

    Some(ChildCostEntry {
        label: row.label.clone(),
        base_cost: per_unit(cascade.with_markup, quantity),
        gst_amount: per_unit(cascade.gst_amount, quantity),
        tcs_amount: per_unit(cascade.tcs_amount, quantity),
        net_cost: per_unit(cascade.net_total, quantity),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::extract_child_costs;
    use crate::domain::block::BlockConfig;
    use crate::domain::option::{OptionIndex, OptionSet};
    use crate::domain::row::{RowCategory, RowMatrix, RowOption};

    fn config() -> BlockConfig {
        BlockConfig::new(2, Decimal::from(10), Decimal::from(5), Decimal::from(5))
    }

    fn priced(quantity: i64, rate: i64) -> OptionSet<RowOption> {
        OptionSet::uniform(RowOption::new(Decimal::from(quantity), Decimal::from(rate), Decimal::ONE))
    }

    #[test]
    fn child_no_bed_runs_its_own_cascade() {
        let mut rows = RowMatrix::new();
        rows.push("Hotel", priced(2, 1000));
        rows.push("Child No Bed", priced(1, 500));

        let entries = extract_child_costs(&rows, OptionIndex::One, &config());

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.label, "Child No Bed");
        assert_eq!(entry.base_cost, Decimal::from(550));
        assert_eq!(entry.gst_amount, Decimal::new(2750, 2));
        assert_eq!(entry.tcs_amount, Decimal::new(2888, 2));
        // 500 × 1.10 × 1.05 × 1.05 = 606.375
        assert_eq!(entry.net_cost, Decimal::new(60638, 2));
    }

    #[test]
    fn amounts_are_per_child() {
        let mut rows = RowMatrix::new();
        rows.push("CWB", priced(2, 1000));

        let entries = extract_child_costs(&rows, OptionIndex::Two, &BlockConfig::default());

        assert_eq!(entries[0].net_cost, Decimal::from(1000));
    }

    #[test]
    fn empty_when_no_row_is_a_child_row() {
        let mut rows = RowMatrix::new();
        rows.push("Hotel", priced(5, 99_999));
        rows.push("Transfers", priced(1, 10));

        assert!(extract_child_costs(&rows, OptionIndex::One, &config()).is_empty());
    }

    #[test]
    fn adult_no_bed_row_is_not_a_child_cost() {
        let mut rows = RowMatrix::new();
        rows.push("Extra Adult No Bed", priced(1, 500));

        assert!(extract_child_costs(&rows, OptionIndex::One, &config()).is_empty());
    }

    #[test]
    fn zero_cost_child_rows_are_skipped() {
        let mut rows = RowMatrix::new();
        rows.push("Child With Bed", OptionSet::default());

        assert!(extract_child_costs(&rows, OptionIndex::Three, &config()).is_empty());
    }

    #[test]
    fn explicit_tag_wins_over_label() {
        let mut rows = RowMatrix::new();
        let id = rows.push("Extra mattress", priced(1, 300));
        rows.get_mut(id).expect("row").category = RowCategory::ChildWithBed;

        assert_eq!(extract_child_costs(&rows, OptionIndex::One, &config()).len(), 1);
    }
}
