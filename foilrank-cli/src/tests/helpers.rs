//! Test helpers for laying out polar directories on disk.

use camino::{Utf8Path, Utf8PathBuf};
use foilrank_core::test_support::PolarFixture;
use tempfile::TempDir;

use crate::rank::RankArgs;

/// Formula whose score is the best lift ratio against the reference.
pub(super) const NORMALISED_LIFT: &str = "max(norm(cl))";

/// A temporary polar directory holding a reference and two candidates.
#[derive(Debug)]
pub(super) struct PolarWorkspace {
    _dir: TempDir,
    root: Utf8PathBuf,
    reference: Utf8PathBuf,
}

impl PolarWorkspace {
    /// Lay out `reference`, `strong` (twice the reference lift) and `weak`
    /// (identical to the reference).
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let workspace = Self {
            _dir: dir,
            reference: root.join("reference_R_50000_N_9.csv"),
            root,
        };
        workspace.add(&PolarFixture::new("reference").with_lift(&[(0.0, 0.5), (2.0, 1.0)]));
        workspace.add(&PolarFixture::new("strong").with_lift(&[(0.0, 1.0), (2.0, 2.0)]));
        workspace.add(&PolarFixture::new("weak").with_lift(&[(0.0, 0.5), (2.0, 1.0)]));
        workspace
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn reference(&self) -> &Utf8Path {
        &self.reference
    }

    pub(super) fn add(&self, fixture: &PolarFixture) -> Utf8PathBuf {
        let path = self.root.join(fixture.file_name());
        write_utf8(&path, fixture.to_text().as_bytes());
        path
    }

    /// Add a candidate whose geometry passes discovery but whose header
    /// cannot be parsed.
    pub(super) fn add_malformed(&self, name: &str) -> Utf8PathBuf {
        let fixture = PolarFixture::new(name);
        let text = fixture
            .to_text()
            .replace("Max Cl/Cd,50\n", "Max Cl/Cd,oops\n");
        let path = self.root.join(fixture.file_name());
        write_utf8(&path, text.as_bytes());
        path
    }

    /// Arguments ranking this workspace by `formula`.
    pub(super) fn rank_args(&self, formula: &str) -> RankArgs {
        RankArgs {
            polar_dir: Some(self.root.clone()),
            reference: Some(self.reference.clone()),
            formula: Some(formula.to_owned()),
            ..RankArgs::default()
        }
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}
