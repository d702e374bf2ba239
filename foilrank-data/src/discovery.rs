//! Candidate discovery: select the polar files of a directory that match the
//! simulation conditions and geometry of interest.

use std::io;
use std::ops::RangeInclusive;

use camino::{Utf8Path, Utf8PathBuf};
use foilrank_core::PolarMetadata;
use foilrank_fs::{list_files, read_utf8_file};
use log::{debug, info, warn};
use thiserror::Error;

use crate::PolarFileName;

/// Reynolds numbers for which polar data is published.
pub const AVAILABLE_REYNOLDS_NUMBERS: [u32; 5] = [50_000, 100_000, 200_000, 500_000, 1_000_000];

/// Transition criteria for which polar data is published.
pub const AVAILABLE_NCRIT_VALUES: [u8; 2] = [5, 9];

/// Which nCrit values a run accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NcritSelection {
    /// Accept every value.
    #[default]
    Any,
    /// Accept only this value.
    Exactly(u8),
}

impl NcritSelection {
    /// Decode a configured nCrit: `0` means any, otherwise one of
    /// [`AVAILABLE_NCRIT_VALUES`].
    ///
    /// # Examples
    /// ```
    /// use foilrank_data::NcritSelection;
    ///
    /// assert_eq!(NcritSelection::from_code(0), Some(NcritSelection::Any));
    /// assert_eq!(NcritSelection::from_code(9), Some(NcritSelection::Exactly(9)));
    /// assert_eq!(NcritSelection::from_code(7), None);
    /// ```
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Any),
            value if AVAILABLE_NCRIT_VALUES.contains(&value) => Some(Self::Exactly(value)),
            _ => None,
        }
    }

    /// Whether `ncrit` is accepted.
    #[must_use]
    pub const fn accepts(self, ncrit: u8) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(wanted) => wanted == ncrit,
        }
    }
}

/// Bounds a candidate polar must satisfy. All ranges are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFilter {
    /// Accepted Reynolds numbers.
    pub reynolds: RangeInclusive<u32>,
    /// Accepted nCrit values.
    pub ncrit: NcritSelection,
    /// Accepted maximum thickness, percent of chord.
    pub thickness: RangeInclusive<f64>,
    /// Accepted maximum camber, percent of chord.
    pub camber: RangeInclusive<f64>,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            reynolds: 0..=1_000_000,
            ncrit: NcritSelection::Any,
            thickness: 0.0..=100.0,
            camber: 0.0..=100.0,
        }
    }
}

impl CandidateFilter {
    /// Whether the simulation conditions in `name` are accepted.
    #[must_use]
    pub fn accepts_conditions(&self, name: &PolarFileName) -> bool {
        self.reynolds.contains(&name.reynolds) && self.ncrit.accepts(name.ncrit)
    }

    /// Whether the geometry is accepted.
    #[must_use]
    pub fn accepts_geometry(&self, thickness: f64, camber: f64) -> bool {
        self.thickness.contains(&thickness) && self.camber.contains(&camber)
    }

    /// Published Reynolds numbers inside [`Self::reynolds`].
    pub fn available_reynolds(&self) -> impl Iterator<Item = u32> + '_ {
        AVAILABLE_REYNOLDS_NUMBERS
            .into_iter()
            .filter(|reynolds| self.reynolds.contains(reynolds))
    }
}

/// Errors raised while discovering candidates.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The polar directory could not be listed.
    #[error("failed to list polar directory {path}")]
    ListDirectory {
        /// Directory that was listed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// List the polar files in `dir` that satisfy `filter`, sorted by file name.
///
/// Only `.csv` files named `{airfoil}_R_{reynolds}_N_{ncrit}.csv` are
/// considered. Files whose conditions match have their header read for the
/// maximum thickness and camber; files whose header cannot be read are
/// skipped with a warning. `exclude`, typically the reference polar, is never
/// returned.
///
/// # Errors
/// Returns [`DiscoveryError::ListDirectory`] when `dir` cannot be listed.
pub fn discover_candidates(
    dir: &Utf8Path,
    filter: &CandidateFilter,
    exclude: Option<&Utf8Path>,
) -> Result<Vec<Utf8PathBuf>, DiscoveryError> {
    let files = list_files(dir).map_err(|source| DiscoveryError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    let excluded = exclude.and_then(|path| path.canonicalize_utf8().ok());

    let mut candidates = Vec::new();
    for path in files {
        let Some(name) = path.file_name().and_then(PolarFileName::parse) else {
            continue;
        };
        if !filter.accepts_conditions(&name) {
            debug!("{path}: conditions out of range");
            continue;
        }
        if excluded.is_some() && path.canonicalize_utf8().ok() == excluded {
            debug!("{path}: excluded");
            continue;
        }
        let Some((thickness, camber)) = read_geometry(&path) else {
            continue;
        };
        if filter.accepts_geometry(thickness, camber) {
            candidates.push(path);
        }
    }
    info!("Found {} candidate polar(s) in {dir}", candidates.len());
    Ok(candidates)
}

fn read_geometry(path: &Utf8Path) -> Option<(f64, f64)> {
    let text = match read_utf8_file(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Skipping {path}: {err}");
            return None;
        }
    };
    let metadata = PolarMetadata::from_header(&text);
    if let (Some(thickness), Some(camber)) = (metadata.max_thickness, metadata.max_camber) {
        Some((thickness, camber))
    } else {
        warn!("Skipping {path}: unreadable maximum thickness or camber");
        None
    }
}
