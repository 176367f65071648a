//! Pure merges of an extraction into existing matrices. Inputs are never mutated.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{
    addon::{AddOnCategory, AddOnMatrix, AddOnOption},
    block::BlockConfig,
    option::OptionSet,
    row::{RowMatrix, RowOption},
    vendor::{UnifiedLineItem, VendorAddOn, VendorParsedPricing},
};

/// At most this many extracted add-ons of one category are placed.
pub const ADD_ON_SLOTS_PER_CATEGORY: usize = 2;

/// Restoration (extracted configs present) overwrites all three configs' rates
/// identically. Both paths take the passenger count from the extraction when given.
pub fn merge_configs(
    current: &OptionSet<BlockConfig>,
    parsed: &VendorParsedPricing,
) -> OptionSet<BlockConfig> {
    current.map(|_, config| {
        let mut merged = match &parsed.extracted_configs {
            Some(extracted) => {
                config.with_rates(extracted.markup_pct, extracted.gst_pct, extracted.tcs_pct)
            }
            None => config.clone(),
        };
        if let Some(total_pax) = parsed.total_pax {
            merged.passenger_count = total_pax;
        }
        merged
    })
}

/// Overwrites rows by position, appends extra items and resets surplus rows to placeholders.
///
/// Row ids and order survive; an item's own multiplier wins over `conversion_rate`.
pub fn merge_rows(
    current: &RowMatrix,
    items: &[UnifiedLineItem],
    conversion_rate: Decimal,
) -> RowMatrix {
    let mut merged = current.clone();

    for (position, item) in items.iter().enumerate() {
        let label = item.description.trim().to_string();
        let options = item_options(item, conversion_rate);
        match merged.at_mut(position) {
            Some(row) => row.overwrite(label, options),
            None => {
                merged.push(label, options);
            }
        }
    }

    for row in merged.iter_mut().skip(items.len()) {
        row.reset();
    }

    merged
}

fn item_options(item: &UnifiedLineItem, conversion_rate: Decimal) -> OptionSet<RowOption> {
    let quantity = item.quantity_or_one();
    OptionSet::from_fn(|option| RowOption {
        quantity,
        rate: item.cost(option),
        multiplier: item.multiplier(option).unwrap_or(conversion_rate),
    })
}

/// Fills the first flight and visa slots in arrival order; surplus items are dropped
/// and slots without an incoming item keep their values.
pub fn merge_add_ons(
    current: &AddOnMatrix,
    add_ons: &[VendorAddOn],
    passenger_count: u32,
) -> AddOnMatrix {
    let mut merged = current.clone();

    for add_on in add_ons.iter().filter(|add_on| add_on.category().is_none()) {
        warn!(
            event_name = "reconcile.add_on.unknown_type",
            add_on_type = %add_on.kind,
            "ignoring extracted add-on with unknown type"
        );
    }

    for category in AddOnCategory::ALL {
        let slots: Vec<_> =
            merged.slots(category).into_iter().take(ADD_ON_SLOTS_PER_CATEGORY).collect();
        let incoming: Vec<&VendorAddOn> =
            add_ons.iter().filter(|add_on| add_on.category() == Some(category)).collect();

        if incoming.len() > slots.len() {
            warn!(
                event_name = "reconcile.add_on.dropped",
                category = category.as_str(),
                incoming = incoming.len(),
                slots = slots.len(),
                "extracted add-ons exceed available slots; extras dropped"
            );
        }

        for (slot, add_on) in slots.into_iter().zip(incoming) {
            if let Some(row) = merged.get_mut(slot) {
                row.options = OptionSet::uniform(AddOnOption {
                    quantity: add_on.quantity.unwrap_or_else(|| Decimal::from(passenger_count)),
                    net_rate: add_on.cost_per_pax,
                    markup_per_unit: Decimal::ZERO,
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{merge_add_ons, merge_configs, merge_rows};
    use crate::domain::{
        addon::{default_add_ons, AddOnCategory, AddOnOption},
        block::BlockConfig,
        option::{OptionIndex, OptionSet},
        row::{default_rows, RowCategory, RowId, RowMatrix, RowOption},
        vendor::{ExtractedConfigs, UnifiedLineItem, VendorAddOn, VendorParsedPricing},
    };

    fn item(description: &str, costs: [i64; 3]) -> UnifiedLineItem {
        UnifiedLineItem {
            description: description.to_string(),
            quantity: Some(Decimal::from(2)),
            cost_option1: Decimal::from(costs[0]),
            cost_option2: Decimal::from(costs[1]),
            cost_option3: Decimal::from(costs[2]),
            ..UnifiedLineItem::default()
        }
    }

    fn add_on(kind: &str, cost: i64) -> VendorAddOn {
        VendorAddOn { kind: kind.to_string(), cost_per_pax: Decimal::from(cost), quantity: None }
    }

    #[test]
    fn fresh_autofill_only_propagates_passengers() {
        let current = OptionSet::uniform(BlockConfig::new(
            2,
            Decimal::from(12),
            Decimal::from(5),
            Decimal::from(5),
        ));
        let parsed = VendorParsedPricing { total_pax: Some(6), ..VendorParsedPricing::default() };

        let merged = merge_configs(&current, &parsed);

        for (_, config) in merged.iter() {
            assert_eq!(config.passenger_count, 6);
            assert_eq!(config.markup_pct, Decimal::from(12));
        }
    }

    #[test]
    fn restoration_overwrites_all_three_configs_identically() {
        let current = OptionSet([
            BlockConfig::new(2, Decimal::from(10), Decimal::from(5), Decimal::from(5)),
            BlockConfig::new(3, Decimal::from(15), Decimal::from(18), Decimal::ZERO),
            BlockConfig::default(),
        ]);
        let parsed = VendorParsedPricing {
            total_pax: Some(4),
            extracted_configs: Some(ExtractedConfigs {
                markup_pct: Decimal::ZERO,
                gst_pct: Decimal::from(5),
                tcs_pct: Decimal::ZERO,
            }),
            ..VendorParsedPricing::default()
        };

        let merged = merge_configs(&current, &parsed);

        let expected = BlockConfig::new(4, Decimal::ZERO, Decimal::from(5), Decimal::ZERO);
        assert_eq!(merged, OptionSet::uniform(expected));
    }

    #[test]
    fn restoration_without_pax_keeps_each_passenger_count() {
        let current = OptionSet([
            BlockConfig::new(2, Decimal::ONE, Decimal::ONE, Decimal::ONE),
            BlockConfig::new(3, Decimal::ONE, Decimal::ONE, Decimal::ONE),
            BlockConfig::new(4, Decimal::ONE, Decimal::ONE, Decimal::ONE),
        ]);
        let parsed = VendorParsedPricing {
            extracted_configs: Some(ExtractedConfigs::default()),
            ..VendorParsedPricing::default()
        };

        let merged = merge_configs(&current, &parsed);

        assert_eq!(merged[OptionIndex::Three].passenger_count, 4);
        assert_eq!(merged[OptionIndex::Three].markup_pct, Decimal::ZERO);
    }

    #[test]
    fn conversion_rate_applies_uniformly_without_item_multipliers() {
        let merged = merge_rows(&RowMatrix::new(), &[item("Hotel", [1000, 1200, 1500])], Decimal::new(25, 1));

        let row = merged.at(0).expect("appended row");
        for (_, values) in row.options.iter() {
            assert_eq!(values.multiplier, Decimal::new(25, 1));
        }
        assert_eq!(row.options[OptionIndex::Two].rate, Decimal::from(1200));
    }

    #[test]
    fn item_multipliers_are_used_verbatim() {
        let mut restored = item("Villa", [100, 100, 100]);
        restored.multiplier_option1 = Some(Decimal::from(3));
        restored.multiplier_option3 = Some(Decimal::new(275, 2));

        let merged = merge_rows(&RowMatrix::new(), &[restored], Decimal::from(9));
        let row = merged.at(0).expect("row");

        assert_eq!(row.options[OptionIndex::One].multiplier, Decimal::from(3));
        assert_eq!(row.options[OptionIndex::Two].multiplier, Decimal::from(9));
        assert_eq!(row.options[OptionIndex::Three].multiplier, Decimal::new(275, 2));
    }

    #[test]
    fn rows_are_overwritten_by_index_and_surplus_reset() {
        let current = default_rows();
        let ids = current.ids();

        let merged = merge_rows(
            &current,
            &[item("Resort", [1, 2, 3]), item("Child No Bed", [4, 5, 6])],
            Decimal::ONE,
        );

        assert_eq!(merged.ids(), ids);
        assert_eq!(merged.at(0).map(|row| row.label.as_str()), Some("Resort"));
        assert_eq!(merged.at(1).map(|row| row.category), Some(RowCategory::ChildNoBed));
        for row in merged.iter().skip(2) {
            assert!(row.label.is_empty());
            assert_eq!(row.options, OptionSet::<RowOption>::default());
        }
        assert_eq!(current.at(0).map(|row| row.label.as_str()), Some("Hotel"));
    }

    #[test]
    fn extra_items_are_appended_with_fresh_ids() {
        let mut current = RowMatrix::new();
        current.push("Hotel", OptionSet::default());

        let merged =
            merge_rows(&current, &[item("A", [1, 1, 1]), item("B", [2, 2, 2])], Decimal::ONE);

        assert_eq!(merged.ids(), vec![RowId(1), RowId(2)]);
        assert_eq!(merged.at(1).map(|row| row.label.as_str()), Some("B"));
    }

    #[test]
    fn add_ons_fill_two_slots_per_category_in_arrival_order() {
        let incoming = [
            add_on("Flight", 15000),
            add_on("Visa", 3000),
            add_on("flight", 16000),
            add_on("Flight", 17000),
            add_on("Insurance", 900),
        ];

        let merged = merge_add_ons(&default_add_ons(), &incoming, 3);

        let flights: Vec<Decimal> = merged
            .slots(AddOnCategory::Flight)
            .into_iter()
            .filter_map(|id| merged.get(id))
            .map(|row| row.options[OptionIndex::Two].net_rate)
            .collect();
        assert_eq!(flights, vec![Decimal::from(15000), Decimal::from(16000)]);

        let first_visa = merged.slots(AddOnCategory::Visa)[0];
        let visa = &merged.get(first_visa).expect("visa slot").options;
        assert_eq!(
            visa,
            &OptionSet::uniform(AddOnOption::new(Decimal::from(3), Decimal::from(3000), Decimal::ZERO))
        );

        let second_visa = merged.slots(AddOnCategory::Visa)[1];
        assert_eq!(
            merged.get(second_visa).expect("visa slot").options,
            OptionSet::<AddOnOption>::default()
        );
    }

    #[test]
    fn add_on_quantity_prefers_explicit_value() {
        let mut explicit = add_on("Visa", 2500);
        explicit.quantity = Some(Decimal::ONE);

        let merged = merge_add_ons(&default_add_ons(), &[explicit], 4);
        let slot = merged.slots(AddOnCategory::Visa)[0];

        assert_eq!(
            merged.get(slot).expect("slot").options[OptionIndex::One].quantity,
            Decimal::ONE
        );
    }
}
