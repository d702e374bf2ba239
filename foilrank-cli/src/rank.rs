//! Rank command implementation for the foilrank CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use foilrank_core::Airfoil;
use foilrank_data::{CandidateFilter, NcritSelection, discover_candidates};
use foilrank_scorer::{RankingReport, error_chain, rank_polar_files};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_FORMULA, ARG_POLAR_DIR, ARG_REFERENCE, CliError, ENV_FORMULA, ENV_POLAR_DIR,
    ENV_REFERENCE,
};

const DEFAULT_REYNOLDS_MIN: u32 = 0;
const DEFAULT_REYNOLDS_MAX: u32 = 1_000_000;
const DEFAULT_PERCENT_MIN: f64 = 0.0;
const DEFAULT_PERCENT_MAX: f64 = 100.0;
const DEFAULT_TOP: usize = 5;

/// How the ranking report is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every polar in a directory with a formula, normalising \
                 against a reference polar, and print the best candidates. \
                 Settings can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Rank candidate airfoils by a scoring formula"
)]
#[ortho_config(prefix = "FOILRANK")]
pub(crate) struct RankArgs {
    /// Directory containing `{airfoil}_R_{reynolds}_N_{ncrit}.csv` polars.
    #[arg(long = ARG_POLAR_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) polar_dir: Option<Utf8PathBuf>,
    /// Polar file every candidate is normalised against.
    #[arg(long = ARG_REFERENCE, value_name = "path")]
    #[serde(default)]
    pub(crate) reference: Option<Utf8PathBuf>,
    /// Scoring formula, for example "average(norm(cl/cd))".
    #[arg(long = ARG_FORMULA, value_name = "formula", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) formula: Option<String>,
    /// nCrit of the polars to consider: 5, 9, or 0 for both.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) ncrit: Option<u8>,
    /// Smallest Reynolds number to consider.
    #[arg(long, value_name = "re")]
    #[serde(default)]
    pub(crate) reynolds_min: Option<u32>,
    /// Largest Reynolds number to consider.
    #[arg(long, value_name = "re")]
    #[serde(default)]
    pub(crate) reynolds_max: Option<u32>,
    /// Smallest maximum thickness, percent of chord.
    #[arg(long, value_name = "percent")]
    #[serde(default)]
    pub(crate) thickness_min: Option<f64>,
    /// Largest maximum thickness, percent of chord.
    #[arg(long, value_name = "percent")]
    #[serde(default)]
    pub(crate) thickness_max: Option<f64>,
    /// Smallest maximum camber, percent of chord.
    #[arg(long, value_name = "percent")]
    #[serde(default)]
    pub(crate) camber_min: Option<f64>,
    /// Largest maximum camber, percent of chord.
    #[arg(long, value_name = "percent")]
    #[serde(default)]
    pub(crate) camber_max: Option<f64>,
    /// Number of best candidates to print.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) top: Option<usize>,
    /// Report format.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Directory searched for candidate polars.
    pub(crate) polar_dir: Utf8PathBuf,
    /// Reference polar file.
    pub(crate) reference: Utf8PathBuf,
    /// Scoring formula text.
    pub(crate) formula: String,
    /// Bounds candidates must satisfy.
    pub(crate) filter: CandidateFilter,
    /// Number of best candidates to print.
    pub(crate) top: usize,
    /// Report format.
    pub(crate) format: OutputFormat,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_directory(&self.polar_dir, ARG_POLAR_DIR)?;
        require_file(&self.reference, ARG_REFERENCE)
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let polar_dir = args.polar_dir.ok_or(CliError::MissingArgument {
            field: ARG_POLAR_DIR,
            env: ENV_POLAR_DIR,
        })?;
        let reference = args.reference.ok_or(CliError::MissingArgument {
            field: ARG_REFERENCE,
            env: ENV_REFERENCE,
        })?;
        let formula = args.formula.ok_or(CliError::MissingArgument {
            field: ARG_FORMULA,
            env: ENV_FORMULA,
        })?;

        let ncrit_code = args.ncrit.unwrap_or(0);
        let ncrit = NcritSelection::from_code(ncrit_code)
            .ok_or(CliError::UnsupportedNcrit { value: ncrit_code })?;

        let reynolds_min = args.reynolds_min.unwrap_or(DEFAULT_REYNOLDS_MIN);
        let reynolds_max = args.reynolds_max.unwrap_or(DEFAULT_REYNOLDS_MAX);
        if reynolds_min > reynolds_max {
            return Err(CliError::InvertedReynoldsRange {
                min: reynolds_min,
                max: reynolds_max,
            });
        }

        let filter = CandidateFilter {
            reynolds: reynolds_min..=reynolds_max,
            ncrit,
            thickness: percent_range(args.thickness_min, args.thickness_max, "thickness")?,
            camber: percent_range(args.camber_min, args.camber_max, "camber")?,
        };
        if filter.available_reynolds().next().is_none() {
            return Err(CliError::NoAvailableReynolds {
                min: reynolds_min,
                max: reynolds_max,
            });
        }

        Ok(Self {
            polar_dir,
            reference,
            formula,
            filter,
            top: args.top.unwrap_or(DEFAULT_TOP),
            format: args.format.unwrap_or_default(),
        })
    }
}

fn percent_range(
    min: Option<f64>,
    max: Option<f64>,
    field: &'static str,
) -> Result<std::ops::RangeInclusive<f64>, CliError> {
    let lower = min.unwrap_or(DEFAULT_PERCENT_MIN);
    let upper = max.unwrap_or(DEFAULT_PERCENT_MAX);
    if lower > upper {
        return Err(CliError::InvertedRange {
            field,
            min: lower,
            max: upper,
        });
    }
    Ok(lower..=upper)
}

fn require_file(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match foilrank_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourcePath {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(inspect_error(path, field, source)),
    }
}

fn require_directory(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match foilrank_fs::dir_is_dir(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotDirectory {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourcePath {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(inspect_error(path, field, source)),
    }
}

fn inspect_error(path: &Utf8Path, field: &'static str, source: std::io::Error) -> CliError {
    if source.kind() == std::io::ErrorKind::NotFound {
        CliError::MissingSourcePath {
            field,
            path: path.to_path_buf(),
        }
    } else {
        CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(super) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_rank_config(args)?;
    let report = execute_rank(&config)?;
    write_report(writer, &config, &report)
}

pub(super) fn execute_rank(config: &RankConfig) -> Result<RankingReport, CliError> {
    let candidates =
        discover_candidates(&config.polar_dir, &config.filter, Some(&config.reference))?;
    info!("Ranking {} candidate(s) by {:?}", candidates.len(), config.formula);
    rank_polar_files(&config.reference, &candidates, &config.formula).map_err(CliError::from)
}

fn resolve_rank_config(args: RankArgs) -> Result<RankConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Serialisable view of one ranked candidate.
#[derive(Debug, Serialize)]
struct RankedEntry<'a> {
    rank: usize,
    name: &'a str,
    score: Option<f64>,
    source: &'a Utf8Path,
    details_url: String,
    description: Option<&'a str>,
}

/// Serialisable view of one rejected file.
#[derive(Debug, Serialize)]
struct RejectedEntry<'a> {
    path: &'a Utf8Path,
    reason: String,
}

/// Serialisable view of a whole run.
#[derive(Debug, Serialize)]
struct ReportView<'a> {
    formula: &'a str,
    reference: &'a Utf8Path,
    candidates: usize,
    top: Vec<RankedEntry<'a>>,
    unscored: Vec<&'a str>,
    rejected: Vec<RejectedEntry<'a>>,
}

impl<'a> ReportView<'a> {
    fn new(config: &'a RankConfig, report: &'a RankingReport) -> Self {
        let top = report
            .ranking
            .top(config.top)
            .iter()
            .enumerate()
            .map(|(index, airfoil)| RankedEntry::new(index + 1, airfoil))
            .collect();
        Self {
            formula: &config.formula,
            reference: &config.reference,
            candidates: report.ranking.len(),
            top,
            unscored: report.ranking.unscored().map(Airfoil::name).collect(),
            rejected: report
                .rejected
                .iter()
                .map(|entry| RejectedEntry {
                    path: &entry.path,
                    reason: error_chain(&entry.reason),
                })
                .collect(),
        }
    }
}

impl<'a> RankedEntry<'a> {
    fn new(rank: usize, airfoil: &'a Airfoil) -> Self {
        Self {
            rank,
            name: airfoil.name(),
            score: airfoil.score(),
            source: airfoil.source(),
            details_url: airfoil.details_url(),
            description: airfoil.description(),
        }
    }
}

fn write_report(
    writer: &mut dyn Write,
    config: &RankConfig,
    report: &RankingReport,
) -> Result<(), CliError> {
    let view = ReportView::new(config, report);
    match config.format {
        OutputFormat::Json => {
            let payload =
                serde_json::to_string_pretty(&view).map_err(CliError::SerialiseReport)?;
            writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
        }
        OutputFormat::Text => write_text(writer, &view).map_err(CliError::WriteOutput),
    }
}

fn write_text(writer: &mut dyn Write, view: &ReportView<'_>) -> std::io::Result<()> {
    writeln!(
        writer,
        "Top {} of {} candidate(s) by {} against {}:",
        view.top.len(),
        view.candidates,
        view.formula,
        view.reference
    )?;
    for entry in &view.top {
        let score = entry
            .score
            .map_or_else(|| "unscored".to_owned(), |score| format!("{score:.6}"));
        writeln!(writer, "{:>3}. {:<24} {score:>14}  {}", entry.rank, entry.name, entry.source)?;
        writeln!(writer, "     {}", entry.details_url)?;
        if let Some(description) = entry.description {
            writeln!(writer, "     {description}")?;
        }
    }
    if !view.unscored.is_empty() {
        writeln!(writer, "Unscored: {}", view.unscored.join(", "))?;
    }
    for rejected in &view.rejected {
        writeln!(writer, "Rejected {}: {}", rejected.path, rejected.reason)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
