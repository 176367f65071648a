use std::process::ExitCode;

fn main() -> ExitCode {
    tripquote_cli::run()
}
