//! Result decoding and record reconciliation.
//!
//! Every change to a participant's outcome is expressed as a pair
//! `(old, new)` of optional [`Outcome`]s. [`RecordDelta::between`] turns such a pair
//! into signed counter changes using a single rule:
//!
//! ```text
//! delta(counter) = [new == counter] - [old == counter]    for counter in {win, loss, draw}
//! ```
//!
//! Creation is `(None, new)`, deletion is `(old, None)`, and no contest never maps to a
//! counter, so entering or leaving it only ever increments or decrements.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use crate::error::{Result, StorageError};
use crate::models::{FighterRecord, Outcome};

/// Winner value meaning the match was drawn
pub const DRAW_SENTINEL: i32 = 0;
/// Canonical winner value meaning no contest; any other non-participant value reads the same way
pub const NO_CONTEST_SENTINEL: i32 = -1;

/// Result of a whole match, as opposed to the per-fighter [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Pending,
    Decision { winner: i32 },
    Draw,
    NoContest,
}

impl MatchResult {
    /// Decode the boundary winner value for a match between `first` and `second`.
    /// Any non-zero value that names neither fighter reads as no contest.
    pub fn from_winner(winner: Option<i32>, first: i32, second: i32) -> Self {
        match winner {
            None => MatchResult::Pending,
            Some(DRAW_SENTINEL) => MatchResult::Draw,
            Some(w) if w == first || w == second => MatchResult::Decision { winner: w },
            Some(_) => MatchResult::NoContest,
        }
    }

    /// Rebuild the match result from the stored participant outcomes, rejecting
    /// pairs that are not complementary.
    pub fn from_outcomes(
        (first, first_outcome): (i32, Option<Outcome>),
        (second, second_outcome): (i32, Option<Outcome>),
    ) -> Result<Self> {
        match (first_outcome, second_outcome) {
            (None, None) => Ok(MatchResult::Pending),
            (Some(Outcome::Win), Some(Outcome::Loss)) => Ok(MatchResult::Decision { winner: first }),
            (Some(Outcome::Loss), Some(Outcome::Win)) => Ok(MatchResult::Decision { winner: second }),
            (Some(Outcome::Draw), Some(Outcome::Draw)) => Ok(MatchResult::Draw),
            (Some(Outcome::NoContest), Some(Outcome::NoContest)) => Ok(MatchResult::NoContest),
            (a, b) => Err(StorageError::ConstraintViolation(format!(
                "Fighters {first} and {second} hold mismatched outcomes {a:?} and {b:?}"
            ))),
        }
    }

    pub fn outcome_for(&self, fighter_id: i32) -> Option<Outcome> {
        match self {
            MatchResult::Pending => None,
            MatchResult::Decision { winner } if *winner == fighter_id => Some(Outcome::Win),
            MatchResult::Decision { .. } => Some(Outcome::Loss),
            MatchResult::Draw => Some(Outcome::Draw),
            MatchResult::NoContest => Some(Outcome::NoContest),
        }
    }

    /// Encode back to the boundary winner value
    pub fn winner_value(&self) -> Option<i32> {
        match self {
            MatchResult::Pending => None,
            MatchResult::Decision { winner } => Some(*winner),
            MatchResult::Draw => Some(DRAW_SENTINEL),
            MatchResult::NoContest => Some(NO_CONTEST_SENTINEL),
        }
    }
}

/// Signed change to the three counters of one fighter record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordDelta {
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
}

impl RecordDelta {
    pub fn between(old: Option<Outcome>, new: Option<Outcome>) -> Self {
        let indicator = |outcome: Option<Outcome>, counter: Outcome| i32::from(outcome == Some(counter));

        Self {
            wins: indicator(new, Outcome::Win) - indicator(old, Outcome::Win),
            losses: indicator(new, Outcome::Loss) - indicator(old, Outcome::Loss),
            draws: indicator(new, Outcome::Draw) - indicator(old, Outcome::Draw),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Apply in place, refusing to drive any counter below zero
    pub fn apply_to(&self, record: &mut FighterRecord) -> Result<()> {
        let wins = record.wins + self.wins;
        let losses = record.losses + self.losses;
        let draws = record.draws + self.draws;

        if wins < 0 || losses < 0 || draws < 0 {
            return Err(StorageError::ConstraintViolation(format!(
                "Record of fighter {} would become negative",
                record.fighter_id
            )));
        }

        record.wins = wins;
        record.losses = losses;
        record.draws = draws;
        Ok(())
    }
}

impl AddAssign for RecordDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        self.draws += rhs.draws;
    }
}

/// Per-fighter accumulation of the deltas produced by one engine operation.
///
/// Entries iterate in ascending fighter id, which is the order record rows get locked.
#[derive(Debug, Default)]
pub struct RecordLedger {
    deltas: BTreeMap<i32, RecordDelta>,
}

impl RecordLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_outcome_delta(
        &mut self,
        fighter_id: i32,
        old: Option<Outcome>,
        new: Option<Outcome>,
    ) {
        let delta = RecordDelta::between(old, new);
        if delta.is_zero() {
            return;
        }
        *self.deltas.entry(fighter_id).or_default() += delta;
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.values().all(RecordDelta::is_zero)
    }

    /// Fighters whose record actually changes
    pub fn fighters(&self) -> Vec<i32> {
        self.entries().map(|(fighter_id, _)| fighter_id).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (i32, RecordDelta)> + '_ {
        self.deltas
            .iter()
            .filter(|(_, delta)| !delta.is_zero())
            .map(|(fighter_id, delta)| (*fighter_id, *delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIN: Option<Outcome> = Some(Outcome::Win);
    const LOSS: Option<Outcome> = Some(Outcome::Loss);
    const DRAW: Option<Outcome> = Some(Outcome::Draw);
    const NC: Option<Outcome> = Some(Outcome::NoContest);

    fn delta(wins: i32, losses: i32, draws: i32) -> RecordDelta {
        RecordDelta { wins, losses, draws }
    }

    #[test]
    fn test_winner_decoding() {
        assert_eq!(MatchResult::from_winner(None, 3, 8), MatchResult::Pending);
        assert_eq!(MatchResult::from_winner(Some(0), 3, 8), MatchResult::Draw);
        assert_eq!(MatchResult::from_winner(Some(-1), 3, 8), MatchResult::NoContest);
        assert_eq!(MatchResult::from_winner(Some(-42), 3, 8), MatchResult::NoContest);
        assert_eq!(
            MatchResult::from_winner(Some(8), 3, 8),
            MatchResult::Decision { winner: 8 }
        );
    }

    #[test]
    fn test_winner_outside_the_match_is_no_contest() {
        assert_eq!(MatchResult::from_winner(Some(5), 3, 8), MatchResult::NoContest);
        assert_eq!(MatchResult::from_winner(Some(999), 3, 8), MatchResult::NoContest);
        assert_eq!(
            MatchResult::from_winner(Some(5), 3, 8).winner_value(),
            Some(NO_CONTEST_SENTINEL)
        );
    }

    #[test]
    fn test_outcomes_are_complementary() {
        let decision = MatchResult::Decision { winner: 3 };
        assert_eq!(decision.outcome_for(3), WIN);
        assert_eq!(decision.outcome_for(8), LOSS);
        assert_eq!(MatchResult::Draw.outcome_for(3), DRAW);
        assert_eq!(MatchResult::NoContest.outcome_for(8), NC);
        assert_eq!(MatchResult::Pending.outcome_for(3), None);
    }

    #[test]
    fn test_result_round_trips_through_stored_outcomes() {
        for result in [
            MatchResult::Pending,
            MatchResult::Decision { winner: 3 },
            MatchResult::Decision { winner: 8 },
            MatchResult::Draw,
            MatchResult::NoContest,
        ] {
            let rebuilt =
                MatchResult::from_outcomes((3, result.outcome_for(3)), (8, result.outcome_for(8)))
                    .unwrap();
            assert_eq!(rebuilt, result);
        }
    }

    #[test]
    fn test_mismatched_outcomes_are_reported() {
        assert!(matches!(
            MatchResult::from_outcomes((3, WIN), (8, DRAW)),
            Err(StorageError::ConstraintViolation(_))
        ));
        assert!(MatchResult::from_outcomes((3, None), (8, LOSS)).is_err());
    }

    #[test]
    fn test_sentinels_survive_encoding() {
        assert_eq!(MatchResult::Draw.winner_value(), Some(DRAW_SENTINEL));
        assert_eq!(MatchResult::NoContest.winner_value(), Some(NO_CONTEST_SENTINEL));
        assert_eq!(MatchResult::Pending.winner_value(), None);
    }

    #[test]
    fn test_delta_table() {
        assert_eq!(RecordDelta::between(None, WIN), delta(1, 0, 0));
        assert_eq!(RecordDelta::between(None, NC), delta(0, 0, 0));
        assert_eq!(RecordDelta::between(DRAW, None), delta(0, 0, -1));
        assert_eq!(RecordDelta::between(DRAW, LOSS), delta(0, 1, -1));
        assert_eq!(RecordDelta::between(WIN, WIN), delta(0, 0, 0));
        assert_eq!(RecordDelta::between(LOSS, NC), delta(0, -1, 0));
        // no contest was never counted, so leaving it is increment-only
        assert_eq!(RecordDelta::between(NC, WIN), delta(1, 0, 0));
    }

    #[test]
    fn test_apply_refuses_negative_counters() {
        let mut record = FighterRecord::zeroed(3);
        delta(1, 0, 0).apply_to(&mut record).unwrap();
        assert_eq!(record.wins, 1);

        let err = delta(0, -1, 0).apply_to(&mut record).unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
        assert_eq!(record, FighterRecord { fighter_id: 3, wins: 1, losses: 0, draws: 0 });
    }

    #[test]
    fn test_ledger_nets_out_and_orders_by_fighter() {
        let mut ledger = RecordLedger::new();
        ledger.apply_outcome_delta(9, WIN, None);
        ledger.apply_outcome_delta(2, None, DRAW);
        ledger.apply_outcome_delta(9, None, WIN);
        ledger.apply_outcome_delta(5, NC, NC);

        assert_eq!(ledger.fighters(), vec![2]);
        assert_eq!(ledger.entries().collect::<Vec<_>>(), vec![(2, delta(0, 0, 1))]);
        assert!(!ledger.is_empty());
    }

    #[test]
    fn test_empty_ledger() {
        let mut ledger = RecordLedger::new();
        ledger.apply_outcome_delta(1, NC, None);
        assert!(ledger.is_empty());
        assert!(ledger.fighters().is_empty());
    }
}
