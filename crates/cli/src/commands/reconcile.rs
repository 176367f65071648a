use std::fs;
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use serde_json::json;
use tripquote_core::{
    ApplicationError, CurrencyConfirmation, DomainError, ExtractionStatus, ReconcileOutcome,
    VendorParsedPricing,
};

use crate::commands::{load_config, open_workspace, read_snapshot, write_snapshot, CommandResult};

pub struct ReconcileArgs<'a> {
    pub workspace_path: &'a Path,
    pub parsed_path: &'a Path,
    pub vendor_text_path: Option<&'a Path>,
    pub rate: Option<Decimal>,
}

pub fn run(args: ReconcileArgs<'_>) -> CommandResult {
    let config = match load_config("reconcile") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let mut workspace = match open_workspace("reconcile", &config, args.workspace_path) {
        Ok(workspace) => workspace,
        Err(result) => return result,
    };

    let parsed = match read_parsed(args.parsed_path) {
        Ok(parsed) => parsed,
        Err(error) => {
            return CommandResult::failure("reconcile", "parsed_input", format!("{error:#}"), 1)
        }
    };
    let vendor_text = match vendor_text(args.workspace_path, args.vendor_text_path) {
        Ok(text) => text,
        Err(error) => {
            return CommandResult::failure("reconcile", "workspace_io", format!("{error:#}"), 1)
        }
    };

    if let ExtractionStatus::NeedsClarification { request } =
        workspace.record_extraction(vendor_text, parsed)
    {
        return clarification_required(&request.questions);
    }

    match workspace.apply_pending(CurrencyConfirmation::from_rate(args.rate)) {
        Ok(ReconcileOutcome::Resolved(reconciliation)) => {
            if let Err(error) = write_snapshot(args.workspace_path, &workspace.snapshot()) {
                return CommandResult::failure("reconcile", "workspace_io", format!("{error:#}"), 1);
            }
            CommandResult::success(
                "reconcile",
                format!(
                    "applied vendor pricing: {} rows, {} add-on slots, conversion rate {}",
                    reconciliation.matrices.rows.len(),
                    reconciliation.matrices.add_ons.len(),
                    reconciliation.conversion_rate
                ),
            )
        }
        Ok(ReconcileOutcome::NeedsClarification(request)) => {
            clarification_required(&request.questions)
        }
        Err(ApplicationError::Domain(DomainError::ConversionRateRequired { currency })) => {
            CommandResult::failure_with_details(
                "reconcile",
                "conversion_rate_required",
                format!(
                    "vendor pricing is in {currency}; pass --rate with the {} value of one {currency}",
                    config.workspace.home_currency
                ),
                Some(json!({ "currency": currency })),
                2,
            )
        }
        Err(ApplicationError::Domain(DomainError::InvalidConversionRate(rate))) => {
            CommandResult::failure(
                "reconcile",
                "invalid_conversion_rate",
                format!("conversion rate must be greater than zero, got {rate}"),
                2,
            )
        }
        Err(error) => {
            let interface = error.into_interface(args.workspace_path.display().to_string());
            CommandResult::failure_with_details(
                "reconcile",
                "reconcile_failed",
                interface.user_message(),
                Some(json!({
                    "detail": interface.detail,
                    "correlation_id": interface.correlation_id,
                })),
                1,
            )
        }
    }
}

fn clarification_required(questions: &[String]) -> CommandResult {
    CommandResult::failure_with_details(
        "reconcile",
        "clarification_required",
        format!("the vendor quote raised {} open question(s)", questions.len()),
        Some(json!({ "questions": questions })),
        3,
    )
}

fn read_parsed(path: &Path) -> anyhow::Result<VendorParsedPricing> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read parsed pricing `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse parsed pricing `{}`", path.display()))
}

fn vendor_text(workspace_path: &Path, vendor_text_path: Option<&Path>) -> anyhow::Result<String> {
    match vendor_text_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not read vendor text `{}`", path.display())),
        None => Ok(read_snapshot(workspace_path)?.vendor_text),
    }
}
