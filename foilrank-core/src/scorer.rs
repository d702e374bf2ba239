//! Score candidate airfoils and rank them.
//!
//! The [`Scorer`] trait assigns a figure of merit to a candidate's
//! [`PolarDataset`](crate::PolarDataset). [`rank_airfoils`] drives a scorer
//! over a batch, isolating failures so one bad candidate never aborts the
//! run.

use log::warn;

use crate::{Airfoil, PolarDataset, RankedList};

/// Calculate a figure of merit for a candidate airfoil.
///
/// Higher scores rank better. Scoring may fail for an individual candidate;
/// callers treat a failure as "unscored" rather than as a fatal error.
///
/// # Examples
///
/// ```rust
/// use foilrank_core::{PolarDataset, Scorer};
/// use foilrank_core::test_support::PolarFixture;
///
/// struct PeakRatio;
///
/// impl Scorer for PeakRatio {
///     type Error = std::convert::Infallible;
///
///     fn score(&self, candidate: &PolarDataset) -> Result<f64, Self::Error> {
///         Ok(candidate.max_lift_drag_ratio())
///     }
/// }
///
/// let polar = PolarFixture::new("demo").with_peak(72.5, 5.0).dataset();
/// assert_eq!(PeakRatio.score(&polar), Ok(72.5));
/// ```
pub trait Scorer {
    /// Reason a candidate could not be scored.
    type Error: std::error::Error;

    /// Return the score of `candidate`.
    ///
    /// # Errors
    /// Returns [`Self::Error`] when the candidate cannot be scored.
    fn score(&self, candidate: &PolarDataset) -> Result<f64, Self::Error>;
}

/// Score `airfoil` in place, leaving it unscored on failure.
///
/// Failures and non-finite scores are logged with the airfoil's identity.
pub fn score_airfoil<S: Scorer + ?Sized>(scorer: &S, airfoil: &mut Airfoil) {
    match scorer.score(airfoil.polar()) {
        Ok(score) if score.is_finite() => airfoil.set_score(Some(score)),
        Ok(score) => {
            warn!(
                "No score for {} ({}): non-finite result {score}",
                airfoil.name(),
                airfoil.source()
            );
            airfoil.set_score(None);
        }
        Err(err) => {
            warn!(
                "No score for {} ({}): {err}",
                airfoil.name(),
                airfoil.source()
            );
            airfoil.set_score(None);
        }
    }
}

/// Score every airfoil and collect them into a [`RankedList`].
///
/// # Examples
/// ```
/// use foilrank_core::{Airfoil, rank_airfoils};
/// use foilrank_core::test_support::{PolarFixture, StallAngleScorer};
///
/// let early = PolarFixture::new("early").with_lift(&[(0.0, 0.4), (2.0, 0.3)]);
/// let late = PolarFixture::new("late").with_lift(&[(0.0, 0.4), (6.0, 0.9), (8.0, 0.8)]);
/// let airfoils = [early, late]
///     .iter()
///     .map(|fixture| Airfoil::new(fixture.file_name(), fixture.dataset()))
///     .collect::<Vec<_>>();
/// let ranking = rank_airfoils(&StallAngleScorer, airfoils);
/// assert_eq!(ranking.top(1)[0].name(), "late");
/// ```
pub fn rank_airfoils<S, I>(scorer: &S, airfoils: I) -> RankedList
where
    S: Scorer + ?Sized,
    I: IntoIterator<Item = Airfoil>,
{
    let mut ranking = RankedList::new();
    for mut airfoil in airfoils {
        score_airfoil(scorer, &mut airfoil);
        ranking.insert(airfoil);
    }
    ranking
}
