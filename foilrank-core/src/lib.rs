//! Core domain types for the foilrank workspace.
//!
//! The crate models airfoil polar data, the candidates built from it, and the
//! score-ordered ranking they end up in. The [`Scorer`] trait is the seam
//! between this domain and any scoring strategy; the formula compiler in
//! `foilrank-scorer` is the production implementation.
//!
//! Parsing is strict about the polar file header and lenient about data rows:
//! [`PolarDataset::parse`] rejects files whose header cannot be trusted, but
//! drops and reports individual malformed rows.

#![forbid(unsafe_code)]

mod airfoil;
mod dataset;
mod field;
mod ranking;
mod scorer;
pub mod test_support;

pub use airfoil::{Airfoil, airfoil_name};
pub use dataset::{
    FormatError, POLAR_MARKER, PolarDataset, PolarMetadata, RowError, SkippedRow,
};
pub use field::{PolarField, PolarRecord};
pub use ranking::RankedList;
pub use scorer::{Scorer, rank_airfoils, score_airfoil};
