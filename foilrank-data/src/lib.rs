//! Polar file discovery for foilrank.
//!
//! Responsibilities:
//! - Decode the simulation conditions encoded in polar file names.
//! - Select the polar files of a directory that match a run's Reynolds,
//!   nCrit, thickness and camber bounds.
//!
//! Boundaries:
//! - Do not score or parse polar rows (live in `foilrank-core` and
//!   `foilrank-scorer`); only the header lines needed for filtering are read.

#![forbid(unsafe_code)]

mod discovery;
mod file_name;

pub use discovery::{
    AVAILABLE_NCRIT_VALUES, AVAILABLE_REYNOLDS_NUMBERS, CandidateFilter, DiscoveryError,
    NcritSelection, discover_candidates,
};
pub use file_name::PolarFileName;
