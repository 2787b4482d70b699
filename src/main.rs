use clap::Parser;
use tracing_subscriber::EnvFilter;

use report_guard::cli::{Cli, Commands};
use report_guard::commands::{run_check, run_init, run_inspect};
use report_guard::log_directive;

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli);

    let exit_code = match &cli.command {
        Commands::Check(args) => run_check(args, &cli),
        Commands::Inspect(args) => run_inspect(args, &cli),
        Commands::Init(args) => run_init(args),
    };

    std::process::exit(exit_code);
}

/// `RUST_LOG` wins over the `-v`/`--quiet` default.
fn setup_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(cli.verbose, cli.quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
