//! Score tracking and milestone praise

use serde::{Deserialize, Serialize};

use crate::consts::{POP_SCORE, VICTORY_SCORE};

/// A score threshold with a one-shot praise message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub score: u32,
    pub message: &'static str,
}

/// Ordered small → large
pub const MILESTONES: &[Milestone] = &[
    Milestone {
        score: 50,
        message: "Nice!",
    },
    Milestone {
        score: 100,
        message: "Awesome!",
    },
    Milestone {
        score: 150,
        message: "Perfect!",
    },
];

/// Cumulative session score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    value: u32,
}

impl ScoreTracker {
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Add one pop's worth of points and return the new score
    pub fn apply_pop(&mut self) -> u32 {
        self.value = self.value.saturating_add(POP_SCORE);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    /// Whether the score has reached the victory threshold
    pub fn is_victory(&self) -> bool {
        self.value >= VICTORY_SCORE
    }
}

/// Milestones crossed when the score moves from `previous` to `current`.
///
/// A milestone is crossed when `previous < threshold <= current`, so a larger
/// increment can never skip one.
pub fn milestones_crossed(previous: u32, current: u32) -> impl Iterator<Item = &'static Milestone> {
    MILESTONES
        .iter()
        .filter(move |m| previous < m.score && m.score <= current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_apply_pop_adds_fixed_amount() {
        let mut score = ScoreTracker::default();
        assert_eq!(score.apply_pop(), 10);
        assert_eq!(score.apply_pop(), 20);
        assert_eq!(score.value(), 20);
    }

    #[test]
    fn test_reset() {
        let mut score = ScoreTracker::default();
        for _ in 0..7 {
            score.apply_pop();
        }
        score.reset();
        assert_eq!(score.value(), 0);
        assert!(!score.is_victory());
    }

    #[test]
    fn test_victory_threshold() {
        let mut score = ScoreTracker::default();
        for _ in 0..19 {
            score.apply_pop();
            assert!(!score.is_victory());
        }
        score.apply_pop();
        assert_eq!(score.value(), 200);
        assert!(score.is_victory());
    }

    #[test]
    fn test_milestones_on_exact_hits() {
        let msgs: Vec<_> = milestones_crossed(40, 50).map(|m| m.message).collect();
        assert_eq!(msgs, ["Nice!"]);
        assert_eq!(milestones_crossed(50, 60).count(), 0);
        assert_eq!(milestones_crossed(140, 150).next().map(|m| m.score), Some(150));
        assert_eq!(milestones_crossed(190, 200).count(), 0);
    }

    #[test]
    fn test_milestones_never_skipped_by_large_jumps() {
        let scores: Vec<_> = milestones_crossed(0, 160).map(|m| m.score).collect();
        assert_eq!(scores, [50, 100, 150]);
        let scores: Vec<_> = milestones_crossed(45, 105).map(|m| m.score).collect();
        assert_eq!(scores, [50, 100]);
    }

    proptest! {
        #[test]
        fn prop_score_is_linear_in_pops(pops in 0u32..500) {
            let mut score = ScoreTracker::default();
            for _ in 0..pops {
                score.apply_pop();
            }
            prop_assert_eq!(score.value(), POP_SCORE * pops);
        }

        #[test]
        fn prop_each_milestone_hit_once_on_the_way_up(pops in 0u32..40) {
            let mut score = ScoreTracker::default();
            let mut hits = Vec::new();
            for _ in 0..pops {
                let before = score.value();
                let after = score.apply_pop();
                hits.extend(milestones_crossed(before, after).map(|m| m.score));
            }
            let expected: Vec<_> = MILESTONES
                .iter()
                .map(|m| m.score)
                .filter(|&s| s <= pops * POP_SCORE)
                .collect();
            prop_assert_eq!(hits, expected);
        }
    }
}
