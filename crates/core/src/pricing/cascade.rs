use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::block::BlockConfig;
use crate::pricing::money::percent_of;

/// Every intermediate amount of the markup → GST → TCS cascade.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCascade {
    pub subtotal: Decimal,
    pub markup_amount: Decimal,
    pub with_markup: Decimal,
    pub gst_amount: Decimal,
    pub with_gst: Decimal,
    pub tcs_amount: Decimal,
    pub net_total: Decimal,
}

/// Applies markup, then GST on the marked-up amount, then TCS on the GST-inclusive amount.
///
/// Each stage is computed on the previous stage's output. The order decides the
/// invoice amount and must not be rearranged.
pub fn apply(subtotal: Decimal, config: &BlockConfig) -> TaxCascade {
    let markup_amount = percent_of(subtotal, config.markup_pct);
    let with_markup = subtotal.saturating_add(markup_amount);

    let gst_amount = percent_of(with_markup, config.gst_pct);
    let with_gst = with_markup.saturating_add(gst_amount);

    let tcs_amount = percent_of(with_gst, config.tcs_pct);
    let net_total = with_gst.saturating_add(tcs_amount);

    TaxCascade {
        subtotal,
        markup_amount,
        with_markup,
        gst_amount,
        with_gst,
        tcs_amount,
        net_total,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::apply;
    use crate::domain::block::BlockConfig;

    fn config(markup: i64, gst: i64, tcs: i64) -> BlockConfig {
        BlockConfig::new(2, Decimal::from(markup), Decimal::from(gst), Decimal::from(tcs))
    }

    #[test]
    fn cascades_each_stage_on_the_previous_output() {
        let cascade = apply(Decimal::from(2000), &config(10, 5, 5));

        assert_eq!(cascade.markup_amount, Decimal::from(200));
        assert_eq!(cascade.with_markup, Decimal::from(2200));
        assert_eq!(cascade.gst_amount, Decimal::from(110));
        assert_eq!(cascade.with_gst, Decimal::from(2310));
        assert_eq!(cascade.tcs_amount, Decimal::new(1155, 1));
        assert_eq!(cascade.net_total, Decimal::new(24255, 1));
    }

    #[test]
    fn gst_is_charged_on_markup_and_tcs_on_gst() {
        let subtotal = Decimal::from(1000);
        let cascade = apply(subtotal, &config(20, 10, 10));

        // 10% of 1000 alone would be 100; on cost-plus-markup it is 120.
        assert_eq!(cascade.gst_amount, Decimal::from(120));
        // TCS on 1000 + 200 + 120.
        assert_eq!(cascade.tcs_amount, Decimal::from(132));
    }

    #[test]
    fn zero_rates_pass_the_subtotal_through() {
        let cascade = apply(Decimal::new(12345, 2), &BlockConfig::default());
        assert_eq!(cascade.net_total, Decimal::new(12345, 2));
        assert_eq!(cascade.markup_amount, Decimal::ZERO);
    }
}
