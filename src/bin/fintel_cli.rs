use std::process::ExitCode;

fn main() -> ExitCode {
    fintel_core::init();
    match fintel_core::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fintel_cli: {err}");
            ExitCode::FAILURE
        }
    }
}
