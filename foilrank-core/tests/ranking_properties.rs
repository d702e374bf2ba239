//! Property-based tests for [`RankedList`] insertion.
//!
//! # Invariants tested
//!
//! - **Ordering:** scored entries are in non-increasing score order.
//! - **Unscored last:** no scored entry follows an unscored one.
//! - **Stability:** equal scores and unscored entries keep insertion order.
//! - **Conservation:** every inserted airfoil appears exactly once.

use foilrank_core::test_support::PolarFixture;
use foilrank_core::{Airfoil, PolarDataset, RankedList};
use proptest::prelude::*;

fn empty_polar() -> PolarDataset {
    PolarFixture::new("prop").dataset()
}

fn score_strategy() -> impl Strategy<Value = Option<i8>> {
    // Small integers force plenty of ties.
    prop::option::weighted(0.8, -5_i8..=5_i8)
}

fn build(scores: &[Option<i8>]) -> RankedList {
    let polar = empty_polar();
    scores
        .iter()
        .enumerate()
        .map(|(index, score)| {
            let mut airfoil = Airfoil::new(format!("{index}.csv"), polar.clone());
            airfoil.set_score(score.map(f64::from));
            airfoil
        })
        .collect()
}

fn insertion_index(airfoil: &Airfoil) -> usize {
    airfoil.name().parse().expect("fixture names are indices")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn scored_entries_descend(scores in prop::collection::vec(score_strategy(), 0..40)) {
        let ranking = build(&scores);
        let scored: Vec<f64> = ranking.iter().filter_map(Airfoil::score).collect();
        prop_assert!(scored.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn unscored_entries_trail(scores in prop::collection::vec(score_strategy(), 0..40)) {
        let ranking = build(&scores);
        let first_unscored = ranking.iter().position(|a| a.score().is_none());
        if let Some(start) = first_unscored {
            prop_assert!(ranking.as_slice()[start..].iter().all(|a| a.score().is_none()));
        }
    }

    #[test]
    fn ties_keep_insertion_order(scores in prop::collection::vec(score_strategy(), 0..40)) {
        let ranking = build(&scores);
        for pair in ranking.as_slice().windows(2) {
            if pair[0].score() == pair[1].score() {
                prop_assert!(insertion_index(&pair[0]) < insertion_index(&pair[1]));
            }
        }
    }

    #[test]
    fn every_airfoil_is_kept(scores in prop::collection::vec(score_strategy(), 0..40)) {
        let ranking = build(&scores);
        let mut seen: Vec<usize> = ranking.iter().map(insertion_index).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..scores.len()).collect::<Vec<_>>());
    }

    #[test]
    fn top_is_a_prefix(
        scores in prop::collection::vec(score_strategy(), 0..40),
        k in 0_usize..50,
    ) {
        let ranking = build(&scores);
        let top = ranking.top(k);
        prop_assert_eq!(top.len(), k.min(ranking.len()));
        prop_assert_eq!(top, &ranking.as_slice()[..top.len()]);
    }
}
