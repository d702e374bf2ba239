//! File-level driver: load polars, compile once, score and rank candidates.

use std::error::Error;

use camino::{Utf8Path, Utf8PathBuf};
use foilrank_core::{Airfoil, PolarDataset, RankedList, score_airfoil};
use foilrank_fs::read_utf8_file;
use log::{info, warn};

use crate::{CandidateError, CompiledExpression, PipelineError};

/// A candidate file that could not be loaded.
#[derive(Debug)]
pub struct RejectedCandidate {
    /// Path of the candidate file.
    pub path: Utf8PathBuf,
    /// Why the file was rejected.
    pub reason: CandidateError,
}

/// Outcome of ranking a batch of candidate files.
#[derive(Debug, Default)]
pub struct RankingReport {
    /// Loaded candidates, best first, unscored entries last.
    pub ranking: RankedList,
    /// Files that could not be read or parsed, in input order.
    pub rejected: Vec<RejectedCandidate>,
}

/// Rank the polar files in `candidate_paths` by `formula`, normalising
/// against the polar at `reference_path`.
///
/// Candidates that fail to load are reported in
/// [`RankingReport::rejected`]; candidates whose formula evaluation fails are
/// ranked unscored. Neither aborts the run.
///
/// # Errors
/// Returns [`PipelineError`] when the reference cannot be read or parsed, or
/// when the formula does not compile against it.
///
/// # Examples
///
/// ```no_run
/// use foilrank_scorer::rank_polar_files;
///
/// # fn main() -> Result<(), foilrank_scorer::PipelineError> {
/// let report = rank_polar_files(
///     "polars/naca2412_R_100000_N_9.csv",
///     &["polars/e387_R_100000_N_9.csv", "polars/s1223_R_100000_N_9.csv"],
///     "average(norm(cl/cd))",
/// )?;
/// for airfoil in report.ranking.top(5) {
///     println!("{} {:?}", airfoil.name(), airfoil.score());
/// }
/// # Ok(())
/// # }
/// ```
pub fn rank_polar_files<R, P>(
    reference_path: R,
    candidate_paths: &[P],
    formula: &str,
) -> Result<RankingReport, PipelineError>
where
    R: AsRef<Utf8Path>,
    P: AsRef<Utf8Path>,
{
    let reference_path = reference_path.as_ref();
    let reference = load_reference(reference_path)?;
    let compiled = CompiledExpression::compile(formula, reference)?;
    info!(
        "Scoring {} candidate(s) against {reference_path}",
        candidate_paths.len()
    );

    let mut report = RankingReport::default();
    for path in candidate_paths.iter().map(AsRef::as_ref) {
        match load_airfoil(path) {
            Ok(mut airfoil) => {
                score_airfoil(&compiled, &mut airfoil);
                report.ranking.insert(airfoil);
            }
            Err(reason) => {
                warn!("Skipping candidate {path}: {}", error_chain(&reason));
                report.rejected.push(RejectedCandidate {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }
    info!(
        "Ranked {} candidate(s), {} unscored, {} rejected",
        report.ranking.len(),
        report.ranking.unscored().count(),
        report.rejected.len()
    );
    Ok(report)
}

/// Read and parse the polar file at `path` into an unscored [`Airfoil`].
///
/// # Errors
/// Returns [`CandidateError`] when the file cannot be read or is malformed.
pub fn load_airfoil(path: &Utf8Path) -> Result<Airfoil, CandidateError> {
    let text = read_utf8_file(path).map_err(CandidateError::Read)?;
    let polar = PolarDataset::parse(&text).map_err(CandidateError::Format)?;
    for skipped in polar.skipped_rows() {
        warn!("{path}: ignoring line {}: {}", skipped.line, skipped.error);
    }
    Ok(Airfoil::new(path.to_path_buf(), polar))
}

fn load_reference(path: &Utf8Path) -> Result<PolarDataset, PipelineError> {
    let text = read_utf8_file(path).map_err(|source| PipelineError::ReadReference {
        path: path.to_path_buf(),
        source,
    })?;
    PolarDataset::parse(&text).map_err(|source| PipelineError::Reference {
        path: path.to_path_buf(),
        source,
    })
}

/// Render `err` and its chain of sources on one line, separated by `: `.
#[must_use]
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompileError;
    use foilrank_core::test_support::PolarFixture;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct PolarDir {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl PolarDir {
        fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
            let path = self.root.join(name);
            std::fs::write(&path, contents).expect("write polar file");
            path
        }

        fn write_fixture(&self, fixture: &PolarFixture) -> Utf8PathBuf {
            self.write(&fixture.file_name(), &fixture.to_text())
        }
    }

    #[fixture]
    fn polar_dir() -> PolarDir {
        let dir = TempDir::new().expect("create temporary directory");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
        PolarDir { _dir: dir, root }
    }

    fn reference() -> PolarFixture {
        PolarFixture::new("reference").with_lift(&[(0.0, 1.0), (2.0, 2.0), (4.0, 4.0)])
    }

    #[rstest]
    fn ranks_candidates_best_first(polar_dir: PolarDir) {
        let reference_path = polar_dir.write_fixture(&reference());
        let weak = polar_dir.write_fixture(
            &PolarFixture::new("weak").with_lift(&[(0.0, 0.5), (2.0, 1.0), (4.0, 2.0)]),
        );
        let strong = polar_dir.write_fixture(
            &PolarFixture::new("strong").with_lift(&[(0.0, 2.0), (2.0, 4.0), (4.0, 8.0)]),
        );
        let sparse = polar_dir.write_fixture(&PolarFixture::new("sparse").with_lift(&[(1.0, 1.0)]));

        let report = rank_polar_files(&reference_path, &[weak, sparse, strong], "average(norm(cl))")
            .expect("pipeline runs");

        let names: Vec<_> = report.ranking.iter().map(Airfoil::name).collect();
        assert_eq!(names, ["strong", "weak", "sparse"]);
        let scores: Vec<_> = report.ranking.iter().map(Airfoil::score).collect();
        assert_eq!(scores, [Some(2.0), Some(0.5), None]);
        assert!(report.rejected.is_empty());
    }

    #[rstest]
    fn malformed_candidates_are_rejected(polar_dir: PolarDir) {
        let reference_path = polar_dir.write_fixture(&reference());
        let broken = polar_dir.write("broken_R_100000_N_9.csv", "not a polar\n");
        let missing = polar_dir.root.join("missing_R_100000_N_9.csv");
        let good = polar_dir.write_fixture(&reference());

        let report = rank_polar_files(&reference_path, &[&broken, &missing, &good], "max(cl)")
            .expect("pipeline runs");

        assert_eq!(report.ranking.len(), 1);
        let rejected: Vec<_> = report.rejected.iter().map(|entry| &entry.path).collect();
        assert_eq!(rejected, [&broken, &missing]);
        assert!(matches!(
            report.rejected.first().map(|entry| &entry.reason),
            Some(CandidateError::Format(_))
        ));
        assert!(matches!(
            report.rejected.get(1).map(|entry| &entry.reason),
            Some(CandidateError::Read(_))
        ));
    }

    #[rstest]
    fn missing_reference_is_fatal(polar_dir: PolarDir) {
        let reference_path = polar_dir.root.join("nothing.csv");
        let result = rank_polar_files(&reference_path, &[] as &[Utf8PathBuf], "max(cl)");
        assert!(matches!(result, Err(PipelineError::ReadReference { .. })));
    }

    #[rstest]
    fn malformed_reference_is_fatal(polar_dir: PolarDir) {
        let reference_path = polar_dir.write("reference.csv", "garbage\n");
        let result = rank_polar_files(&reference_path, &[] as &[Utf8PathBuf], "max(cl)");
        assert!(matches!(result, Err(PipelineError::Reference { .. })));
    }

    #[rstest]
    fn syntax_errors_abort_before_scoring(polar_dir: PolarDir) {
        let reference_path = polar_dir.write_fixture(&reference());
        let result = rank_polar_files(&reference_path, &[&reference_path], "norm(cl");
        assert!(matches!(
            result,
            Err(PipelineError::Compile(CompileError::Syntax(_)))
        ));
    }

    #[rstest]
    fn load_airfoil_names_from_file(polar_dir: PolarDir) {
        let path = polar_dir.write_fixture(&PolarFixture::new("e387"));
        let airfoil = load_airfoil(&path).expect("loads");
        assert_eq!(airfoil.name(), "e387");
        assert_eq!(airfoil.source(), path.as_path());
        assert_eq!(airfoil.score(), None);
    }

    #[rstest]
    fn error_chain_includes_sources() {
        let err = CandidateError::Read(std::io::Error::other("disk on fire"));
        assert_eq!(error_chain(&err), "failed to read polar file: disk on fire");
    }
}
