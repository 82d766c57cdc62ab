use std::process::ExitCode;

fn main() -> ExitCode {
    shutterquote_cli::run()
}
