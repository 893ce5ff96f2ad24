use std::process::ExitCode;

fn main() -> ExitCode {
    caja_cli::run()
}
