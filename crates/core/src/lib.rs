pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod reconcile;
pub mod workspace;

pub use domain::addon::{AddOnCategory, AddOnId, AddOnMatrix, AddOnOption, AddOnRow};
pub use domain::block::BlockConfig;
pub use domain::option::{OptionIndex, OptionSet};
pub use domain::row::{Row, RowCategory, RowId, RowMatrix, RowOption};
pub use domain::vendor::{ExtractedConfigs, UnifiedLineItem, VendorAddOn, VendorParsedPricing};
pub use domain::PricingMatrices;
pub use errors::{ApplicationError, DomainError, FailureKind, InterfaceError};
pub use pricing::{
    cascade::TaxCascade,
    child::ChildCostEntry,
    summary::{OptionPriceSummary, QuotationPriceList},
    BlockResult, CalculationEngine, DeterministicCalculationEngine, QuotationCalculation,
};
pub use reconcile::{
    clarification::{ClarificationRequest, ClarificationState},
    currency::{CurrencyConfirmation, CurrencyRequirement},
    ReconcileOutcome, Reconciliation, VendorDataReconciler,
};
pub use workspace::{
    extractor::{ExtractionRequest, PricingExtractor},
    snapshot::WorkspaceSnapshot,
    ExtractionStatus, QuotationWorkspace,
};
