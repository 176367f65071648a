//! Maps loosely structured vendor pricing back into the pricing matrices.

pub mod clarification;
pub mod currency;
pub mod merge;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{option::OptionIndex, vendor::VendorParsedPricing, PricingMatrices};
use crate::errors::DomainError;

use self::{
    clarification::ClarificationRequest,
    currency::{currency_requirement, resolve_rate, CurrencyConfirmation, CurrencyRequirement},
    merge::{merge_add_ons, merge_configs, merge_rows},
};

/// Fresh matrices produced by a successful apply, plus the rate that was used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub matrices: PricingMatrices,
    pub conversion_rate: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Resolved(Reconciliation),
    NeedsClarification(ClarificationRequest),
}

pub struct VendorDataReconciler {
    home_currency: String,
}

impl VendorDataReconciler {
    pub fn new(home_currency: impl Into<String>) -> Self {
        Self { home_currency: home_currency.into() }
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    pub fn currency_requirement(&self, parsed: &VendorParsedPricing) -> CurrencyRequirement {
        currency_requirement(parsed, &self.home_currency)
    }

    /// Proposes clarification when the extraction asks questions, otherwise applies it.
    ///
    /// Never mutates `current`. A foreign currency without a confirmed rate is an error.
    pub fn reconcile(
        &self,
        current: &PricingMatrices,
        parsed: &VendorParsedPricing,
        confirmation: CurrencyConfirmation,
    ) -> Result<ReconcileOutcome, DomainError> {
        let questions = parsed.open_questions();
        if !questions.is_empty() {
            info!(
                event_name = "reconcile.clarification_requested",
                question_count = questions.len(),
                "extraction needs clarification before it can be applied"
            );
            return Ok(ReconcileOutcome::NeedsClarification(ClarificationRequest { questions }));
        }

        let requirement = self.currency_requirement(parsed);
        let conversion_rate = resolve_rate(&requirement, confirmation)?;

        let configs = merge_configs(&current.configs, parsed);
        let rows = merge_rows(&current.rows, &parsed.unified_line_items, conversion_rate);
        let passenger_count =
            parsed.total_pax.unwrap_or(configs[OptionIndex::One].passenger_count);
        let add_ons = merge_add_ons(&current.add_ons, &parsed.add_ons, passenger_count);

        info!(
            event_name = "reconcile.applied",
            line_items = parsed.unified_line_items.len(),
            add_ons = parsed.add_ons.len(),
            restored_configs = parsed.extracted_configs.is_some(),
            conversion_rate = %conversion_rate,
            "vendor pricing reconciled into matrices"
        );

        Ok(ReconcileOutcome::Resolved(Reconciliation {
            matrices: PricingMatrices::new(configs, rows, add_ons),
            conversion_rate,
        }))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{ReconcileOutcome, VendorDataReconciler};
    use crate::config::WorkspaceDefaults;
    use crate::domain::{
        addon::AddOnCategory,
        option::OptionIndex,
        vendor::{ExtractedConfigs, UnifiedLineItem, VendorAddOn, VendorParsedPricing},
        PricingMatrices,
    };
    use crate::errors::DomainError;
    use crate::reconcile::currency::CurrencyConfirmation;

    fn current() -> PricingMatrices {
        PricingMatrices::with_defaults(&WorkspaceDefaults::default())
    }

    fn thai_hotel() -> VendorParsedPricing {
        VendorParsedPricing {
            currency: "THB".to_string(),
            total_pax: Some(2),
            unified_line_items: vec![UnifiedLineItem {
                description: "Patong Beach Hotel".to_string(),
                quantity: Some(Decimal::from(3)),
                cost_option1: Decimal::from(2400),
                cost_option2: Decimal::from(3100),
                cost_option3: Decimal::from(4500),
                ..UnifiedLineItem::default()
            }],
            add_ons: vec![VendorAddOn {
                kind: "Flight".to_string(),
                cost_per_pax: Decimal::from(18000),
                quantity: None,
            }],
            ..VendorParsedPricing::default()
        }
    }

    fn resolved(outcome: ReconcileOutcome) -> PricingMatrices {
        match outcome {
            ReconcileOutcome::Resolved(reconciliation) => reconciliation.matrices,
            ReconcileOutcome::NeedsClarification(request) => {
                panic!("unexpected clarification: {:?}", request.questions)
            }
        }
    }

    #[test]
    fn questions_are_proposed_without_touching_anything() {
        let reconciler = VendorDataReconciler::new("INR");
        let mut parsed = thai_hotel();
        parsed.questions = vec!["Is the rate per room or per person?".to_string()];

        let outcome = reconciler
            .reconcile(&current(), &parsed, CurrencyConfirmation::Pending)
            .expect("clarification is not an error");

        assert!(matches!(
            outcome,
            ReconcileOutcome::NeedsClarification(ref request) if request.questions.len() == 1
        ));
    }

    #[test]
    fn foreign_currency_requires_confirmed_rate() {
        let reconciler = VendorDataReconciler::new("INR");

        let error = reconciler
            .reconcile(&current(), &thai_hotel(), CurrencyConfirmation::Pending)
            .expect_err("rate must be confirmed");

        assert_eq!(error, DomainError::ConversionRateRequired { currency: "THB".to_string() });
    }

    #[test]
    fn confirmed_rate_becomes_the_uniform_multiplier() {
        let reconciler = VendorDataReconciler::new("INR");

        let matrices = resolved(
            reconciler
                .reconcile(
                    &current(),
                    &thai_hotel(),
                    CurrencyConfirmation::Confirmed(Decimal::new(25, 1)),
                )
                .expect("apply"),
        );

        let row = matrices.rows.at(0).expect("first row");
        assert_eq!(row.label, "Patong Beach Hotel");
        for option in OptionIndex::ALL {
            assert_eq!(row.options[option].multiplier, Decimal::new(25, 1));
        }

        let flight = matrices.add_ons.slots(AddOnCategory::Flight)[0];
        let flight_values = &matrices.add_ons.get(flight).expect("flight").options[OptionIndex::One];
        assert_eq!(flight_values.quantity, Decimal::from(2));
        assert_eq!(flight_values.net_rate, Decimal::from(18000));
    }

    #[test]
    fn restoration_in_home_currency_overwrites_configs() {
        let reconciler = VendorDataReconciler::new("INR");
        let parsed = VendorParsedPricing {
            currency: "INR".to_string(),
            total_pax: Some(5),
            extracted_configs: Some(ExtractedConfigs {
                markup_pct: Decimal::ZERO,
                gst_pct: Decimal::from(5),
                tcs_pct: Decimal::ZERO,
            }),
            ..VendorParsedPricing::default()
        };

        let matrices = resolved(
            reconciler.reconcile(&current(), &parsed, CurrencyConfirmation::Pending).expect("apply"),
        );

        let first = matrices.configs[OptionIndex::One].clone();
        assert_eq!(first.passenger_count, 5);
        assert_eq!(first.markup_pct, Decimal::ZERO);
        assert_eq!(first.gst_pct, Decimal::from(5));
        assert_eq!(first.tcs_pct, Decimal::ZERO);
        assert_eq!(matrices.configs[OptionIndex::Two], first);
        assert_eq!(matrices.configs[OptionIndex::Three], first);
    }

    #[test]
    fn reapplying_the_same_extraction_is_idempotent() {
        let reconciler = VendorDataReconciler::new("INR");
        let confirmation = CurrencyConfirmation::Confirmed(Decimal::new(25, 1));

        let once = resolved(
            reconciler.reconcile(&current(), &thai_hotel(), confirmation).expect("first apply"),
        );
        let twice =
            resolved(reconciler.reconcile(&once, &thai_hotel(), confirmation).expect("second apply"));

        assert_eq!(once, twice);
    }
}
