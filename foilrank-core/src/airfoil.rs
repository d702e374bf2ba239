//! Candidate airfoils and their scores.

use camino::{Utf8Path, Utf8PathBuf};

use crate::PolarDataset;

/// Marker separating the airfoil name from the simulation parameters in a
/// polar file name.
const REYNOLDS_SEPARATOR: &str = "_R_";

const DETAILS_URL_PREFIX: &str = "http://airfoiltools.com/airfoil/details?airfoil=";

/// An airfoil under evaluation.
///
/// The score is `None` until the airfoil has been scored successfully; a
/// stored score is always finite.
///
/// # Examples
///
/// ```
/// use foilrank_core::{Airfoil, PolarDataset};
/// # use foilrank_core::test_support::PolarFixture;
///
/// let polar: PolarDataset = PolarFixture::new("naca2412").dataset();
/// let mut airfoil = Airfoil::new("polars/naca2412_R_50000_N_9.csv", polar);
/// assert_eq!(airfoil.name(), "naca2412");
/// airfoil.set_score(Some(f64::NAN));
/// assert_eq!(airfoil.score(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Airfoil {
    name: String,
    source: Utf8PathBuf,
    polar: PolarDataset,
    score: Option<f64>,
    description: Option<String>,
}

impl Airfoil {
    /// Build an unscored airfoil, deriving its name from `source`.
    #[must_use]
    pub fn new(source: impl Into<Utf8PathBuf>, polar: PolarDataset) -> Self {
        let source = source.into();
        Self {
            name: airfoil_name(&source),
            source,
            polar,
            score: None,
            description: None,
        }
    }

    /// Airfoil name, as used by the airfoiltools database.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the polar file the airfoil was loaded from.
    #[must_use]
    pub fn source(&self) -> &Utf8Path {
        &self.source
    }

    /// Polar data of the airfoil.
    #[must_use]
    pub const fn polar(&self) -> &PolarDataset {
        &self.polar
    }

    /// Current score; `None` when unscored.
    #[must_use]
    pub const fn score(&self) -> Option<f64> {
        self.score
    }

    /// Store a score. Non-finite values leave the airfoil unscored.
    pub fn set_score(&mut self, score: Option<f64>) {
        self.score = score.filter(|value| value.is_finite());
    }

    /// Human-readable description, once an external lookup has filled it in.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Record the description found at [`Self::details_url`]. Scoring and
    /// ranking never read it.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Page describing the airfoil on airfoiltools.com.
    #[must_use]
    pub fn details_url(&self) -> String {
        format!("{DETAILS_URL_PREFIX}{}", self.name)
    }
}

/// Derive the airfoil name from a polar file path.
///
/// The name is the part of the file stem before `_R_`; files that do not
/// follow the naming scheme use their whole stem.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use foilrank_core::airfoil_name;
///
/// assert_eq!(airfoil_name(Utf8Path::new("a/e387-il_R_100000_N_5.csv")), "e387-il");
/// assert_eq!(airfoil_name(Utf8Path::new("reference.csv")), "reference");
/// ```
#[must_use]
pub fn airfoil_name(source: &Utf8Path) -> String {
    let stem = source.file_stem().unwrap_or_default();
    stem.split_once(REYNOLDS_SEPARATOR)
        .map_or(stem, |(name, _)| name)
        .to_owned()
}
