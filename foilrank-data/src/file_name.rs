//! Parsing of polar file names.

use std::fmt;

const REYNOLDS_TAG: &str = "_R_";
const NCRIT_TAG: &str = "_N_";
const EXTENSION: &str = ".csv";

/// Simulation conditions encoded in a polar file name.
///
/// Polar files are named `{airfoil}_R_{reynolds}_N_{ncrit}.csv`, for example
/// `naca2412_R_100000_N_9.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolarFileName {
    /// Airfoil identifier.
    pub airfoil: String,
    /// Reynolds number of the simulation.
    pub reynolds: u32,
    /// Transition criterion of the simulation.
    pub ncrit: u8,
}

impl PolarFileName {
    /// Parse a bare file name; returns `None` for anything that is not a
    /// polar file.
    ///
    /// # Examples
    /// ```
    /// use foilrank_data::PolarFileName;
    ///
    /// let name = PolarFileName::parse("e387_R_200000_N_5.csv").expect("polar file name");
    /// assert_eq!(name.airfoil, "e387");
    /// assert_eq!(name.reynolds, 200_000);
    /// assert_eq!(name.ncrit, 5);
    /// assert!(PolarFileName::parse("notes.txt").is_none());
    /// ```
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(EXTENSION)?;
        let (airfoil, conditions) = stem.split_once(REYNOLDS_TAG)?;
        let (reynolds, ncrit) = conditions.split_once(NCRIT_TAG)?;
        if airfoil.is_empty() {
            return None;
        }
        Some(Self {
            airfoil: airfoil.to_owned(),
            reynolds: reynolds.parse().ok()?,
            ncrit: ncrit.parse().ok()?,
        })
    }
}

impl fmt::Display for PolarFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{REYNOLDS_TAG}{}{NCRIT_TAG}{}{EXTENSION}",
            self.airfoil, self.reynolds, self.ncrit
        )
    }
}
