use std::path::Path;

use crate::commands::{load_config, open_workspace, CommandResult};

pub fn run(workspace_path: &Path) -> CommandResult {
    let config = match load_config("quote") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let workspace = match open_workspace("quote", &config, workspace_path) {
        Ok(workspace) => workspace,
        Err(result) => return result,
    };

    match serde_json::to_string_pretty(&workspace.price_list()) {
        Ok(output) => CommandResult::raw(output),
        Err(error) => CommandResult::failure(
            "quote",
            "serialization",
            format!("could not serialize price list: {error}"),
            1,
        ),
    }
}
