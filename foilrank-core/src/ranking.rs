//! Score-ordered collection of airfoils.

use crate::Airfoil;

/// Airfoils ordered by descending score.
///
/// Unscored airfoils always follow every scored one and keep their insertion
/// order among themselves. Equal scores also keep insertion order.
///
/// # Examples
///
/// ```
/// use foilrank_core::{Airfoil, RankedList};
/// # use foilrank_core::test_support::PolarFixture;
///
/// let scored = |name: &str, score: Option<f64>| {
///     let mut airfoil = Airfoil::new(format!("{name}.csv"), PolarFixture::new(name).dataset());
///     airfoil.set_score(score);
///     airfoil
/// };
/// let mut ranking = RankedList::new();
/// ranking.insert(scored("a", Some(5.0)));
/// ranking.insert(scored("b", None));
/// ranking.insert(scored("c", Some(8.0)));
/// let names: Vec<&str> = ranking.iter().map(Airfoil::name).collect();
/// assert_eq!(names, ["c", "a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedList {
    entries: Vec<Airfoil>,
}

impl RankedList {
    /// Create an empty ranking.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert `airfoil` at its ranked position.
    ///
    /// The new entry moves ahead of every unscored entry and every entry with
    /// a strictly lower score, stopping behind the first entry whose score is
    /// at least its own. An unscored airfoil is appended.
    pub fn insert(&mut self, airfoil: Airfoil) {
        let position = insertion_index(&self.entries, airfoil.score());
        self.entries.insert(position, airfoil);
    }

    /// Remove and return the entry at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<Airfoil> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// The best `k` entries, or every entry when fewer exist.
    #[must_use]
    pub fn top(&self, k: usize) -> &[Airfoil] {
        self.entries
            .get(..k.min(self.entries.len()))
            .unwrap_or_default()
    }

    /// Every entry in ranked order.
    #[must_use]
    pub fn as_slice(&self) -> &[Airfoil] {
        &self.entries
    }

    /// Iterate over entries in ranked order.
    pub fn iter(&self) -> std::slice::Iter<'_, Airfoil> {
        self.entries.iter()
    }

    /// Iterate over entries without a score.
    pub fn unscored(&self) -> impl Iterator<Item = &Airfoil> {
        self.entries.iter().filter(|airfoil| airfoil.score().is_none())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the ranking is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a Airfoil;
    type IntoIter = std::slice::Iter<'a, Airfoil>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for RankedList {
    type Item = Airfoil;
    type IntoIter = std::vec::IntoIter<Airfoil>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<Airfoil> for RankedList {
    fn from_iter<I: IntoIterator<Item = Airfoil>>(iter: I) -> Self {
        let mut ranking = Self::new();
        for airfoil in iter {
            ranking.insert(airfoil);
        }
        ranking
    }
}

fn insertion_index(entries: &[Airfoil], score: Option<f64>) -> usize {
    let Some(new) = score else {
        return entries.len();
    };
    entries
        .iter()
        .rposition(|entry| entry.score().is_some_and(|existing| existing >= new))
        .map_or(0, |index| index + 1)
}
