//! Command-line interface for ranking airfoils by a scoring formula.
//!
//! Settings layer from configuration files, `FOILRANK_*` environment
//! variables and CLI flags, with later layers winning.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod rank;

pub use error::CliError;
use rank::RankArgs;

const ARG_POLAR_DIR: &str = "polar-dir";
const ARG_REFERENCE: &str = "reference";
const ARG_FORMULA: &str = "formula";
const ENV_POLAR_DIR: &str = "FOILRANK_CMDS_RANK_POLAR_DIR";
const ENV_REFERENCE: &str = "FOILRANK_CMDS_RANK_REFERENCE";
const ENV_FORMULA: &str = "FOILRANK_CMDS_RANK_FORMULA";

/// Run the foilrank CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments or configuration are invalid, when
/// the reference polar or formula cannot be used, or when the report cannot
/// be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => rank::run_rank(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "foilrank",
    about = "Rank airfoil polars by a user-supplied scoring formula",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank the polars of a directory against a reference.
    Rank(RankArgs),
}

#[cfg(test)]
mod tests;
