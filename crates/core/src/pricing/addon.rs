use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::addon::AddOnOption;

/// Output tax assumed to be embedded in add-on markup. Margin reporting only;
/// it never feeds the land-package cascade.
pub fn embedded_markup_tax_rate() -> Decimal {
    Decimal::new(18, 2)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnBreakdown {
    pub net_amount: Decimal,
    pub total_markup: Decimal,
    /// Client-facing cost.
    pub final_cost: Decimal,
    pub gst_on_markup: Decimal,
    /// Agency profit after the embedded tax.
    pub net_margin: Decimal,
}

pub fn price_add_on(option: &AddOnOption) -> AddOnBreakdown {
    let net_amount = option.quantity.saturating_mul(option.net_rate);
    let total_markup = option.quantity.saturating_mul(option.markup_per_unit);
    let final_cost = net_amount.saturating_add(total_markup);
    let gst_on_markup = total_markup.saturating_mul(embedded_markup_tax_rate());
    let net_margin = total_markup.saturating_sub(gst_on_markup);

    AddOnBreakdown { net_amount, total_markup, final_cost, gst_on_markup, net_margin }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::price_add_on;
    use crate::domain::addon::AddOnOption;

    #[test]
    fn final_cost_includes_markup() {
        let breakdown =
            price_add_on(&AddOnOption::new(Decimal::from(2), Decimal::from(15000), Decimal::from(500)));

        assert_eq!(breakdown.net_amount, Decimal::from(30000));
        assert_eq!(breakdown.total_markup, Decimal::from(1000));
        assert_eq!(breakdown.final_cost, Decimal::from(31000));
        assert_eq!(breakdown.gst_on_markup, Decimal::from(180));
    }

    #[test]
    fn net_margin_is_exactly_eighty_two_percent_of_markup() {
        for (quantity, markup) in [(1, 333), (3, 1001), (7, 12_345), (0, 999)] {
            let option = AddOnOption::new(
                Decimal::from(quantity),
                Decimal::from(4000),
                Decimal::new(markup, 2),
            );
            let breakdown = price_add_on(&option);

            assert_eq!(breakdown.net_margin, breakdown.total_markup * Decimal::new(82, 2));
        }
    }
}
