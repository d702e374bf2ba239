//! Behaviour tests for discovering candidate polar files.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use foilrank_core::test_support::PolarFixture;
use foilrank_data::{CandidateFilter, NcritSelection, discover_candidates};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// World state for discovery scenarios.
struct DiscoveryWorld {
    _dir: TempDir,
    root: Utf8PathBuf,
    reference: RefCell<Option<Utf8PathBuf>>,
    found: RefCell<Vec<Utf8PathBuf>>,
}

impl DiscoveryWorld {
    fn add(&self, fixture: &PolarFixture) -> Utf8PathBuf {
        self.add_text(&fixture.file_name(), &fixture.to_text())
    }

    fn add_text(&self, name: &str, text: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        if let Err(err) = std::fs::write(&path, text) {
            panic!("write {path}: {err}");
        }
        path
    }

    fn discover(&self, filter: &CandidateFilter, exclude: Option<Utf8PathBuf>) {
        let found = match discover_candidates(&self.root, filter, exclude.as_deref()) {
            Ok(found) => found,
            Err(err) => panic!("discovery failed: {err}"),
        };
        self.found.replace(found);
    }

    fn found_names(&self) -> Vec<String> {
        self.found
            .borrow()
            .iter()
            .filter_map(|path| path.file_name().map(str::to_owned))
            .collect()
    }
}

#[fixture]
fn world() -> DiscoveryWorld {
    let dir = match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("create temporary directory: {err}"),
    };
    let root = match Utf8PathBuf::from_path_buf(dir.path().to_path_buf()) {
        Ok(root) => root,
        Err(path) => panic!("non UTF-8 temporary directory {}", path.display()),
    };
    DiscoveryWorld {
        _dir: dir,
        root,
        reference: RefCell::new(None),
        found: RefCell::new(Vec::new()),
    }
}

#[given("a polar directory with polars at several conditions")]
fn given_mixed_directory(world: &DiscoveryWorld) {
    let reference = world.add(&PolarFixture::new("clarky").with_conditions(200_000, 9));
    world.add(&PolarFixture::new("e387").with_conditions(100_000, 9));
    world.add(&PolarFixture::new("e387").with_conditions(100_000, 5));
    world.add(&PolarFixture::new("naca0012").with_conditions(50_000, 9));
    world.add(&PolarFixture::new("s1223").with_conditions(500_000, 9));
    world.add_text("notes.txt", "not a polar");
    world.reference.replace(Some(reference));
}

#[given("a polar directory with a polar whose camber is unreadable")]
fn given_unreadable_camber(world: &DiscoveryWorld) {
    let fixture = PolarFixture::new("mystery");
    let text = fixture.to_text().replace("Max Camber,2", "Max Camber,");
    world.add_text(&fixture.file_name(), &text);
}

#[when("candidates are discovered for nCrit 9 between Reynolds 100000 and 500000")]
fn when_discovered_in_range(world: &DiscoveryWorld) {
    let filter = CandidateFilter {
        reynolds: 100_000..=500_000,
        ncrit: NcritSelection::Exactly(9),
        ..CandidateFilter::default()
    };
    world.discover(&filter, None);
}

#[when("candidates are discovered excluding the reference")]
fn when_discovered_excluding_reference(world: &DiscoveryWorld) {
    let reference = world.reference.borrow().clone();
    world.discover(&CandidateFilter::default(), reference);
}

#[when("candidates are discovered with the default filter")]
fn when_discovered_by_default(world: &DiscoveryWorld) {
    world.discover(&CandidateFilter::default(), None);
}

#[then("only the nCrit 9 polars inside the Reynolds range are returned in name order")]
fn then_in_range(world: &DiscoveryWorld) {
    assert_eq!(
        world.found_names(),
        [
            "clarky_R_200000_N_9.csv",
            "e387_R_100000_N_9.csv",
            "s1223_R_500000_N_9.csv",
        ]
    );
}

#[then("the reference polar is not returned")]
fn then_reference_excluded(world: &DiscoveryWorld) {
    let names = world.found_names();
    assert_eq!(names.len(), 4);
    assert!(!names.iter().any(|name| name.starts_with("clarky")));
}

#[then("no candidates are returned")]
fn then_nothing(world: &DiscoveryWorld) {
    assert!(world.found.borrow().is_empty());
}

#[scenario(path = "tests/features/candidate_discovery.feature", index = 0)]
fn matching_polars_are_selected(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/candidate_discovery.feature", index = 1)]
fn reference_is_excluded(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/candidate_discovery.feature", index = 2)]
fn unreadable_geometry_is_skipped(world: DiscoveryWorld) {
    let _ = world;
}
