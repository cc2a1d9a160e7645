use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

mod error;
mod io;
mod utils;

mod commands {
    pub mod build;
}

use utils::{load_config, BuildOverrides, BuildSettings};

#[derive(Parser, Debug)]
#[command(name = "lattice")]
#[command(about = "Resolves :import/:export directives and bundles stylesheets", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resolve an entry stylesheet and write the bundle
    Build {
        /// Entry stylesheet, relative to the root (defaults to `entry` in lattice.toml)
        #[arg(value_name = "ENTRY")]
        entry: Option<String>,
        /// Resolution root
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Output file (defaults to standard output)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Configuration file (defaults to the nearest lattice.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Fail if any import cannot be resolved
        #[arg(long)]
        strict: bool,
        /// Append the entry's exports as an `:export` block
        #[arg(long)]
        print_exports: bool,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match args.command {
        Command::Build {
            entry,
            root,
            output,
            config,
            strict,
            print_exports,
        } => {
            let cwd = std::env::current_dir()
                .map_err(|e| error::convert_io_error(e, PathBuf::from("."), "reading"))?;
            let config = load_config(config.as_deref(), &cwd)?;
            let overrides = BuildOverrides {
                entry,
                root,
                output,
                strict,
                print_exports,
            };
            let settings = BuildSettings::merge(config, overrides)?;
            commands::build::handle_build(settings).await?;
        }
    }

    Ok(())
}
