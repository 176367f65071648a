//! Error layers: domain rules, application orchestration, and what callers may show users.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("currency `{currency}` differs from the home currency and needs a confirmed conversion rate")]
    ConversionRateRequired { currency: String },
    #[error("conversion rate must be greater than zero, got {0}")]
    InvalidConversionRate(Decimal),
    #[error("no parsed vendor pricing is pending for this workspace")]
    NothingToApply,
    #[error("pricing matrix is inconsistent: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("extraction failed: {0}")]
    Integration(String),
    #[error("malformed workspace data: {0}")]
    Serialization(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The caller's input cannot be priced or merged as given.
    BadRequest,
    /// An outside collaborator failed; retrying may help.
    Retryable,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadRequest => "bad request",
            Self::Retryable => "service unavailable",
            Self::Internal => "internal error",
        })
    }
}

/// Failure as reported across the process boundary. `detail` is for logs;
/// only [`InterfaceError::user_message`] is meant for end users.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct InterfaceError {
    pub kind: FailureKind,
    pub detail: String,
    pub correlation_id: String,
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            FailureKind::BadRequest => {
                "The quotation could not be updated. Check the pricing inputs and try again."
            }
            FailureKind::Retryable => "Processing failed. Please retry shortly.",
            FailureKind::Internal => "An unexpected internal error occurred.",
        }
    }
}

impl ApplicationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) | Self::Serialization(_) => FailureKind::BadRequest,
            Self::Integration(_) => FailureKind::Retryable,
            Self::Configuration(_) => FailureKind::Internal,
        }
    }

    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        InterfaceError {
            kind: self.kind(),
            detail: self.to_string(),
            correlation_id: correlation_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::errors::{ApplicationError, DomainError, FailureKind};

    #[test]
    fn missing_rate_is_a_bad_request_carrying_the_currency() {
        let interface = ApplicationError::from(DomainError::ConversionRateRequired {
            currency: "THB".to_owned(),
        })
        .into_interface("ws-1");

        assert_eq!(interface.kind, FailureKind::BadRequest);
        assert_eq!(interface.correlation_id, "ws-1");
        assert!(interface.detail.contains("THB"));
        assert_eq!(
            interface.user_message(),
            "The quotation could not be updated. Check the pricing inputs and try again."
        );
    }

    #[test]
    fn extraction_failure_hides_upstream_detail_from_users() {
        let interface =
            ApplicationError::Integration("upstream timed out".to_owned()).into_interface("ws-3");

        assert_eq!(interface.kind, FailureKind::Retryable);
        assert_eq!(interface.user_message(), "Processing failed. Please retry shortly.");
        assert!(!interface.user_message().contains("upstream"));
        assert_eq!(interface.to_string(), "service unavailable: extraction failed: upstream timed out");
    }

    #[test]
    fn config_errors_surface_as_internal() {
        let error = ApplicationError::from(ConfigError::Invalid("bad home currency".to_owned()));

        assert_eq!(error.kind(), FailureKind::Internal);
        assert_eq!(
            error.into_interface("ws-4").user_message(),
            "An unexpected internal error occurred."
        );
    }
}
