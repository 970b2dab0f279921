//! Regenerates pip requirements `.in` files from the dependency list
//! declared in `pyproject.toml`. The part of each file above the marker
//! line belongs to the user and survives every run; everything below it is
//! rewritten from the manifest. A second `nightly.in` variant swaps
//! selected dependencies for their main-branch (or nightly wheel)
//! equivalents, which is what the nightly test jobs install.
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use requirements_gen::utils::{self, RunOptions};

#[derive(Parser)]
#[command(name = "requirements-gen")]
#[command(about = "Generates base and nightly requirements files from pyproject.toml")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to the project manifest
    #[arg(long, default_value = "../pyproject.toml")]
    manifest: PathBuf,
    /// Directory the .in files are written to (defaults to the current
    /// directory, or [tool.requirements-gen] output-dir)
    #[arg(long)]
    dir: Option<PathBuf>,
    /// List of dependencies to install from main branch for nightly tests,
    /// separated by commas
    #[arg(long)]
    nightly: Option<String>,
    /// Interpreter version (e.g. 3.11) used for the scipp nightly wheel tag;
    /// probed from the python on PATH when omitted
    #[arg(long)]
    python_version: Option<String>,
}

impl From<CommonArgs> for RunOptions {
    fn from(args: CommonArgs) -> Self {
        Self {
            manifest: args.manifest,
            output_dir: args.dir,
            nightly: args.nightly,
            python_version: args.python_version,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite base.in and nightly.in from the manifest
    Generate {
        #[command(flatten)]
        common: CommonArgs,
        /// Print the rendered files instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Fail if base.in or nightly.in would change
    Check {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print the dependency list declared in the manifest
    List {
        #[command(flatten)]
        common: CommonArgs,
        /// Output format: text, json or yaml
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the state of the generated files
    Status {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Lint the manifest and the override list
    Validate {
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { common, dry_run } => utils::run_generate(&common.into(), dry_run),
        Commands::Check { common } => utils::run_check(&common.into()),
        Commands::List { common, format } => utils::run_list(&common.into(), &format),
        Commands::Status { common } => utils::run_status(&common.into()),
        Commands::Validate { common } => utils::run_validate(&common.into()),
    }
}
