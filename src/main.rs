use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use gundrill::cli::{Cli, Commands};

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "GUNDRILL_LOG";

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_logging(global.verbose);

    match cli.command {
        Commands::Calc(args) => gundrill::cli::commands::calc::run(args, &global),
        Commands::Component(cmd) => gundrill::cli::commands::component::run(cmd, &global),
        Commands::Validate(args) => gundrill::cli::commands::validate::run(args, &global),
        Commands::Formula(args) => gundrill::cli::commands::formula::run(args, &global),
        Commands::Compare(cmd) => gundrill::cli::commands::compare::run(cmd, &global),
        Commands::Config(cmd) => gundrill::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => gundrill::cli::commands::completions::run(args),
    }
}

/// Diagnostics go to stderr so they never mix with command output
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gundrill=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
