use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    checksort::init();

    checksort::cli::run()
}
