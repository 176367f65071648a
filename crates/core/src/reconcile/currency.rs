use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::vendor::VendorParsedPricing;
use crate::errors::DomainError;

/// Whether the caller has to collect a conversion rate before applying an extraction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrencyRequirement {
    HomeCurrency,
    ConversionRequired { currency: String },
}

/// The caller's answer to a [`CurrencyRequirement`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum CurrencyConfirmation {
    #[default]
    Pending,
    Confirmed(Decimal),
}

impl CurrencyConfirmation {
    pub fn from_rate(rate: Option<Decimal>) -> Self {
        rate.map(Self::Confirmed).unwrap_or(Self::Pending)
    }
}

/// An extraction that names no currency is taken to be priced in the home currency.
pub fn currency_requirement(parsed: &VendorParsedPricing, home_currency: &str) -> CurrencyRequirement {
    match parsed.currency_code() {
        Some(code) if !code.eq_ignore_ascii_case(home_currency.trim()) => {
            CurrencyRequirement::ConversionRequired { currency: code }
        }
        _ => CurrencyRequirement::HomeCurrency,
    }
}

/// The single conversion rate used for items without their own multiplier.
///
/// A foreign currency never falls back to a rate of 1.
pub fn resolve_rate(
    requirement: &CurrencyRequirement,
    confirmation: CurrencyConfirmation,
) -> Result<Decimal, DomainError> {
    match requirement {
        CurrencyRequirement::HomeCurrency => Ok(Decimal::ONE),
        CurrencyRequirement::ConversionRequired { currency } => match confirmation {
            CurrencyConfirmation::Pending => {
                Err(DomainError::ConversionRateRequired { currency: currency.clone() })
            }
            CurrencyConfirmation::Confirmed(rate) if rate <= Decimal::ZERO => {
                Err(DomainError::InvalidConversionRate(rate))
            }
            CurrencyConfirmation::Confirmed(rate) => Ok(rate),
        },
    }
}
