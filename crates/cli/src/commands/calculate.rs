use std::path::Path;

use tripquote_core::QuotationCalculation;

use crate::commands::{load_config, open_workspace, CommandResult};

pub fn run(workspace_path: &Path, json_output: bool) -> CommandResult {
    let config = match load_config("calculate") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let workspace = match open_workspace("calculate", &config, workspace_path) {
        Ok(workspace) => workspace,
        Err(result) => return result,
    };

    let calculation = workspace.calculate();

    if json_output {
        return match serde_json::to_string_pretty(&calculation) {
            Ok(output) => CommandResult::raw(output),
            Err(error) => CommandResult::failure(
                "calculate",
                "serialization",
                format!("could not serialize calculation: {error}"),
                1,
            ),
        };
    }

    CommandResult::raw(render_human(&calculation))
}

fn render_human(calculation: &QuotationCalculation) -> String {
    let mut lines = Vec::new();

    for (option, block) in calculation.blocks.iter() {
        lines.push(format!(
            "{}: total {} (rounded {}), {} per person",
            option.label(),
            block.grand_total,
            block.rounded_total,
            block.per_person
        ));
        for step in &block.trace {
            lines.push(format!("  - {}: {} ({})", step.stage, step.amount, step.detail));
        }
        for child in &block.child_costs {
            lines.push(format!("  - child `{}`: {} per child", child.label, child.net_cost));
        }
    }

    lines.join("\n")
}
