use anyhow::Result;
use declsplit::cli::{Cli, Commands};
use declsplit::commands::{print_report, run_split};
use declsplit::config::build_config;
use declsplit::observability::{init_logging, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = declsplit::cli::parse_args();

    match cli.command {
        Some(Commands::Version) => {
            println!("declsplit {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => handle_split_command(cli),
    }
}

fn handle_split_command(cli: Cli) -> Result<()> {
    let args = cli.split;
    init_logging(args.verbose);

    let config = build_config(args.config.as_deref(), args.overrides())?;
    tracing::debug!("Resolved configuration: {:?}", config);

    let report = run_split(&config, args.dry_run)?;
    print_report(&report, args.dry_run);
    Ok(())
}
