use clap::Parser;
use tracing_subscriber::EnvFilter;

use germline_resolver::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("germline_resolver=debug,info")
    } else {
        EnvFilter::new("germline_resolver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Library(args) => {
            cli::library::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
