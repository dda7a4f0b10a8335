use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use crossload_bridge::DEFAULT_NAMESPACE;

mod commands;
mod error;
mod io;
mod manifest;

#[derive(Parser, Debug)]
#[command(name = "crossload")]
#[command(about = "Compile interpreted class declarations into managed runtime classes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Compile every class declared in a manifest
    Compile {
        /// Manifest listing the classes to compile
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Bridge configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Write compiled classes under this directory
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Show the names allocated for repeated compiles of an identifier
    Names {
        #[arg(value_name = "IDENTIFIER")]
        identifier: String,
        /// How many allocations to show
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Namespace prefix of the generated names
        #[arg(long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Command::Compile {
            manifest,
            config,
            out_dir,
        } => commands::handle_compile(&manifest, config.as_deref(), out_dir)?,
        Command::Names {
            identifier,
            count,
            namespace,
        } => commands::handle_names(&identifier, count, &namespace)?,
    }
    Ok(())
}
