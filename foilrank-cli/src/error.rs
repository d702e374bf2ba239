//! Error types emitted by the foilrank CLI.
//!
//! Messages name only their own layer; the binary prints the full source
//! chain. Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use foilrank_data::DiscoveryError;
use foilrank_scorer::PipelineError;
use thiserror::Error;

/// Errors emitted by the foilrank CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing flag.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a directory.
    #[error("{field} path {path:?} exists but is not a directory")]
    SourcePathNotDirectory {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}")]
    InspectSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configured nCrit has no published data.
    #[error("no polar data exists for nCrit {value} (use 5, 9, or 0 for both)")]
    UnsupportedNcrit {
        /// Configured value.
        value: u8,
    },
    /// The Reynolds bounds are inverted.
    #[error("Reynolds minimum {min} exceeds maximum {max}")]
    InvertedReynoldsRange {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// The Reynolds bounds contain no Reynolds number with published data.
    #[error(
        "Reynolds range {min}..={max} contains none of 50000, 100000, 200000, 500000 or 1000000"
    )]
    NoAvailableReynolds {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// A geometry range has its minimum above its maximum.
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvertedRange {
        /// Geometry property being bounded.
        field: &'static str,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// Listing candidate polars failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// Loading the reference or compiling the formula failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// Serialising the ranking report failed.
    #[error("failed to serialise ranking report")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the ranking report failed.
    #[error("failed to write ranking report")]
    WriteOutput(#[source] std::io::Error),
}
