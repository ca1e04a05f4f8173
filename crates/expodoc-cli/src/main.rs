use expodoc_cli::{build_cli, run, Context};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let Some((name, args)) = matches.subcommand() else {
        return ExitCode::FAILURE;
    };

    let context = match Context::from_args(args) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&context.config().log_filter);
    tracing::debug!("expodoc v{} evaluating as of {}", env!("CARGO_PKG_VERSION"), context.today());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&context, name, args, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
