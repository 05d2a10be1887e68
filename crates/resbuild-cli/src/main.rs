use std::process::ExitCode;

fn main() -> ExitCode {
    match resbuild_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            resbuild_cli::report(&e);
            ExitCode::from(resbuild_cli::exit_code(&e))
        }
    }
}
