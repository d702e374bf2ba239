//! Polar file fixtures and simple scorers shared by unit tests, behaviour
//! tests, and documentation examples across the workspace.

use std::fmt::Write as _;

use crate::{PolarDataset, Scorer};

/// Builder producing polar file text in the airfoiltools layout.
///
/// Defaults describe a 50 000 Reynolds, nCrit 9 run of a 12 % thick, 2 %
/// cambered section with a peak lift/drag ratio of 50 at 4 degrees, and no
/// data rows.
///
/// # Examples
/// ```
/// use foilrank_core::test_support::PolarFixture;
///
/// let fixture = PolarFixture::new("naca2412").with_lift(&[(0.0, 0.25), (2.0, 0.45)]);
/// assert_eq!(fixture.file_name(), "naca2412_R_50000_N_9.csv");
/// assert_eq!(fixture.dataset().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolarFixture {
    name: String,
    reynolds: u32,
    ncrit: u8,
    peak_ratio: f64,
    peak_alpha: f64,
    thickness: f64,
    camber: f64,
    rows: Vec<[f64; 7]>,
}

impl PolarFixture {
    /// Start a fixture for the airfoil `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reynolds: 50_000,
            ncrit: 9,
            peak_ratio: 50.0,
            peak_alpha: 4.0,
            thickness: 12.0,
            camber: 2.0,
            rows: Vec::new(),
        }
    }

    /// Append rows with the given angle and lift coefficient.
    ///
    /// Remaining columns get fixed plausible values.
    #[must_use]
    pub fn with_lift(self, samples: &[(f64, f64)]) -> Self {
        let rows: Vec<(f64, f64, f64)> = samples
            .iter()
            .map(|&(alpha, lift)| (alpha, lift, 0.02))
            .collect();
        self.with_lift_drag(&rows)
    }

    /// Append rows with the given angle, lift, and drag coefficients.
    #[must_use]
    pub fn with_lift_drag(mut self, samples: &[(f64, f64, f64)]) -> Self {
        self.rows.extend(
            samples
                .iter()
                .map(|&(alpha, lift, drag)| [alpha, lift, drag, 0.005, -0.05, 0.6, 0.9]),
        );
        self
    }

    /// Append a row with every column given explicitly.
    #[must_use]
    pub fn with_row(mut self, values: [f64; 7]) -> Self {
        self.rows.push(values);
        self
    }

    /// Set the simulation parameters.
    #[must_use]
    pub const fn with_conditions(mut self, reynolds: u32, ncrit: u8) -> Self {
        self.reynolds = reynolds;
        self.ncrit = ncrit;
        self
    }

    /// Set the peak lift/drag ratio and its angle.
    #[must_use]
    pub const fn with_peak(mut self, ratio: f64, alpha: f64) -> Self {
        self.peak_ratio = ratio;
        self.peak_alpha = alpha;
        self
    }

    /// Set maximum thickness and camber, in percent of chord.
    #[must_use]
    pub const fn with_geometry(mut self, thickness: f64, camber: f64) -> Self {
        self.thickness = thickness;
        self.camber = camber;
        self
    }

    /// File name following the `{airfoil}_R_{reynolds}_N_{ncrit}.csv` scheme.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_R_{}_N_{}.csv", self.name, self.reynolds, self.ncrit)
    }

    /// Render the polar file text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let Self {
            name,
            reynolds,
            ncrit,
            peak_ratio,
            peak_alpha,
            thickness,
            camber,
            rows,
        } = self;
        let mut text = format!(
            "Xfoil polar. Reynolds number fixed. Mach  number fixed\n\
             Polar key,xf-{name}-{reynolds}\n\
             Airfoil,{name}\n\
             Reynolds number,{reynolds}\n\
             Ncrit,{ncrit}\n\
             Mach,0\n\
             Max Cl/Cd,{peak_ratio}\n\
             Max Cl/Cd alpha,{peak_alpha}\n\
             Max Thickness,{thickness}\n\
             Max Camber,{camber}\n\
             Url,http://airfoiltools.com/polar/details?polar=xf-{name}-{reynolds}\n\
             \n\
             Alpha,Cl,Cd,Cdp,Cm,Top_Xtr,Bot_Xtr\n"
        );
        for [alpha, cl, cd, cdp, cm, top, bottom] in rows {
            // Writing to a String cannot fail.
            let _ = writeln!(text, "{alpha},{cl},{cd},{cdp},{cm},{top},{bottom}");
        }
        text
    }

    /// Parse the rendered text into a dataset.
    ///
    /// # Panics
    /// Panics if the rendered text is rejected, which would indicate a bug in
    /// the fixture itself.
    #[must_use]
    pub fn dataset(&self) -> PolarDataset {
        PolarDataset::parse(&self.to_text()).expect("fixture renders a valid polar")
    }
}

/// Error returned by [`StallAngleScorer`] for datasets without samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("polar has no samples")]
pub struct NoSamples;

/// Test [`Scorer`] rating an airfoil by its stall angle.
#[derive(Debug, Copy, Clone, Default)]
pub struct StallAngleScorer;

impl Scorer for StallAngleScorer {
    type Error = NoSamples;

    fn score(&self, candidate: &PolarDataset) -> Result<f64, Self::Error> {
        candidate.find_stall_angle().ok_or(NoSamples)
    }
}
