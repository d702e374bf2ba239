//! Facade crate for the foilrank airfoil ranking engine.
//!
//! This crate re-exports the polar data model and the formula scorer, and
//! exposes candidate discovery behind the `discovery` feature flag.

#![forbid(unsafe_code)]

pub use foilrank_core::{
    Airfoil, FormatError, PolarDataset, PolarField, PolarMetadata, PolarRecord, RankedList,
    Scorer, rank_airfoils, score_airfoil,
};
pub use foilrank_scorer::{
    CandidateError, CompileError, CompiledExpression, EvaluationError, PipelineError,
    RankingReport, RejectedCandidate, Value, compile, rank_polar_files,
};

#[cfg(feature = "discovery")]
pub use foilrank_data::{CandidateFilter, DiscoveryError, NcritSelection, discover_candidates};
