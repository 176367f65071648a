use std::path::Path;

use tripquote_core::QuotationWorkspace;

use crate::commands::{load_config, write_snapshot, CommandResult};

pub fn run(workspace_path: &Path, force: bool) -> CommandResult {
    let config = match load_config("init") {
        Ok(config) => config,
        Err(result) => return result,
    };

    if workspace_path.exists() && !force {
        return CommandResult::failure(
            "init",
            "workspace_exists",
            format!("`{}` already exists; pass --force to replace it", workspace_path.display()),
            2,
        );
    }

    let workspace = QuotationWorkspace::open(&config.workspace);
    match write_snapshot(workspace_path, &workspace.snapshot()) {
        Ok(()) => CommandResult::success(
            "init",
            format!(
                "created workspace `{}` ({} home currency, {} passengers)",
                workspace_path.display(),
                config.workspace.home_currency,
                config.workspace.passenger_count
            ),
        ),
        Err(error) => CommandResult::failure("init", "workspace_io", format!("{error:#}"), 1),
    }
}
