//! Match lifecycle operations that keep fighter records in step with outcomes.
//!
//! Each public operation runs inside exactly one unit of work. Outcome changes are
//! collected in a [`RecordLedger`] and written as one delta per fighter, in ascending
//! fighter id, right before commit. Any error returns early and drops the unit of
//! work, which discards every write made so far.

use tracing::{debug, info};

use crate::dto::match_event::CreateMatchRequest;
use crate::error::{Result, StorageError};
use crate::gateway::{Gateway, ParticipantState, UnitOfWork};
use crate::services::outcome::{MatchResult, RecordLedger};

pub struct MatchEngine<G> {
    gateway: G,
}

impl<G: Gateway> MatchEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Insert a match, its two participants and their record credit.
    /// Returns the new match id.
    pub async fn create_match(&self, request: &CreateMatchRequest) -> Result<i32> {
        request.validate_pairing().map_err(StorageError::invalid)?;

        let (first, second) = (request.fighter1_id, request.fighter2_id);
        let result = MatchResult::from_winner(request.winner.map(|w| w.value()), first, second);

        let mut unit = self.gateway.begin().await?;

        for fighter_id in [first, second] {
            if !unit.fighter_exists(fighter_id).await? {
                return Err(StorageError::not_found("fighter", fighter_id));
            }
        }

        let match_id = unit.insert_match(&request.new_match()).await?;

        let mut ledger = RecordLedger::new();
        for fighter_id in [first, second] {
            let outcome = result.outcome_for(fighter_id);
            unit.insert_participant(match_id, fighter_id, outcome).await?;
            ledger.apply_outcome_delta(fighter_id, None, outcome);
        }

        write_ledger(&mut unit, &ledger).await?;
        unit.commit().await?;

        info!(match_id, ?result, records = ?ledger.fighters(), "Match created");
        Ok(match_id)
    }

    /// Record or correct the result of a match. Repeating the current result
    /// changes nothing.
    pub async fn update_match_result(&self, match_id: i32, winner: i32) -> Result<MatchResult> {
        let mut unit = self.gateway.begin().await?;
        let pair = lock_pair(&mut unit, match_id).await?;

        let result = MatchResult::from_winner(Some(winner), pair[0].fighter_id, pair[1].fighter_id);

        let unchanged = pair
            .iter()
            .all(|p| p.outcome == result.outcome_for(p.fighter_id));
        if unchanged {
            unit.commit().await?;
            debug!(match_id, ?result, "Match result unchanged");
            return Ok(result);
        }

        let mut ledger = RecordLedger::new();
        for participant in &pair {
            let outcome = result.outcome_for(participant.fighter_id);
            unit.set_outcome(match_id, participant.fighter_id, outcome)
                .await?;
            ledger.apply_outcome_delta(participant.fighter_id, participant.outcome, outcome);
        }

        write_ledger(&mut unit, &ledger).await?;
        unit.commit().await?;

        info!(match_id, ?result, records = ?ledger.fighters(), "Match result updated");
        Ok(result)
    }

    /// Swap one side of a match for another fighter. The outgoing fighter loses the
    /// credit for this match and the incoming fighter receives the same outcome.
    pub async fn reassign_participant(
        &self,
        match_id: i32,
        old_fighter_id: i32,
        new_fighter_id: i32,
    ) -> Result<()> {
        if old_fighter_id == new_fighter_id {
            return Err(StorageError::invalid(
                "Replacement fighter must differ from the outgoing fighter",
            ));
        }

        let mut unit = self.gateway.begin().await?;
        let participants = unit.lock_participants(match_id).await?;

        let outgoing = participants
            .iter()
            .find(|p| p.fighter_id == old_fighter_id)
            .copied()
            .ok_or(StorageError::not_found("participant", old_fighter_id))?;

        if participants.iter().any(|p| p.fighter_id == new_fighter_id) {
            return Err(StorageError::invalid(format!(
                "Fighter {new_fighter_id} already participates in match {match_id}"
            )));
        }

        if !unit.fighter_exists(new_fighter_id).await? {
            return Err(StorageError::not_found("fighter", new_fighter_id));
        }

        let mut ledger = RecordLedger::new();
        ledger.apply_outcome_delta(old_fighter_id, outgoing.outcome, None);
        ledger.apply_outcome_delta(new_fighter_id, None, outgoing.outcome);

        unit.replace_fighter(match_id, old_fighter_id, new_fighter_id)
            .await?;
        write_ledger(&mut unit, &ledger).await?;
        unit.commit().await?;

        info!(
            match_id,
            old_fighter_id,
            new_fighter_id,
            outcome = ?outgoing.outcome,
            "Participant reassigned"
        );
        Ok(())
    }

    /// Remove a match after taking back every scored outcome it contributed
    pub async fn delete_match(&self, match_id: i32) -> Result<()> {
        let mut unit = self.gateway.begin().await?;
        let participants = unit.lock_participants(match_id).await?;

        let mut ledger = RecordLedger::new();
        for participant in &participants {
            ledger.apply_outcome_delta(participant.fighter_id, participant.outcome, None);
        }

        write_ledger(&mut unit, &ledger).await?;
        unit.delete_match(match_id).await?;
        unit.commit().await?;

        info!(match_id, records = ?ledger.fighters(), "Match deleted");
        Ok(())
    }
}

async fn lock_pair<U: UnitOfWork>(unit: &mut U, match_id: i32) -> Result<[ParticipantState; 2]> {
    let participants = unit.lock_participants(match_id).await?;
    let count = participants.len();

    <[ParticipantState; 2]>::try_from(participants).map_err(|_| {
        StorageError::ConstraintViolation(format!(
            "Match {match_id} has {count} participants instead of 2"
        ))
    })
}

async fn write_ledger<U: UnitOfWork>(unit: &mut U, ledger: &RecordLedger) -> Result<()> {
    for (fighter_id, delta) in ledger.entries() {
        unit.apply_record_delta(fighter_id, delta).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::dto::match_event::{ResultKeyword, WinnerInput};
    use crate::gateway::memory::MemoryGateway;
    use crate::models::{FighterRecord, Outcome};

    const F1: i32 = 1;
    const F2: i32 = 2;
    const F3: i32 = 3;
    const F4: i32 = 4;

    fn kickoff() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1999, 10, 15)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap()
    }

    fn bout(fighter1_id: i32, fighter2_id: i32, winner: Option<WinnerInput>) -> CreateMatchRequest {
        CreateMatchRequest {
            start_date: kickoff(),
            end_date: None,
            location: "Lou's Tavern".to_string(),
            fighter1_id,
            fighter2_id,
            winner,
        }
    }

    fn won_by(fighter_id: i32) -> Option<WinnerInput> {
        Some(WinnerInput::Value(fighter_id))
    }

    fn record(fighter_id: i32, wins: i32, losses: i32, draws: i32) -> FighterRecord {
        FighterRecord {
            fighter_id,
            wins,
            losses,
            draws,
        }
    }

    async fn setup() -> (MatchEngine<MemoryGateway>, MemoryGateway) {
        let gateway = MemoryGateway::new();
        for fighter_id in [F1, F2, F3, F4] {
            gateway.add_fighter(fighter_id).await;
        }
        (MatchEngine::new(gateway.clone()), gateway)
    }

    async fn assert_records_match_participants(gateway: &MemoryGateway) {
        for fighter_id in [F1, F2, F3, F4] {
            let stored = gateway.record(fighter_id).await.unwrap();
            assert_eq!(stored, gateway.recount(fighter_id).await, "fighter {fighter_id}");
        }
    }

    #[tokio::test]
    async fn test_decisive_match_credits_both_fighters() {
        let (engine, gateway) = setup().await;

        engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 1, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 1, 0));
    }

    #[tokio::test]
    async fn test_draw_then_corrected_to_decision() {
        let (engine, gateway) = setup().await;

        let match_id = engine
            .create_match(&bout(F1, F2, Some(WinnerInput::Value(0))))
            .await
            .unwrap();
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 1));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 0, 1));

        let result = engine.update_match_result(match_id, F2).await.unwrap();

        assert_eq!(result, MatchResult::Decision { winner: F2 });
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 1, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 1, 0, 0));
    }

    #[tokio::test]
    async fn test_reassign_moves_credit_to_replacement() {
        let (engine, gateway) = setup().await;

        let match_id = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();
        engine.reassign_participant(match_id, F1, F3).await.unwrap();

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));
        assert_eq!(gateway.record(F3).await.unwrap(), record(F3, 1, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 1, 0));

        let participants = gateway.participants(match_id).await;
        assert_eq!(
            participants,
            vec![
                ParticipantState { fighter_id: F2, outcome: Some(Outcome::Loss) },
                ParticipantState { fighter_id: F3, outcome: Some(Outcome::Win) },
            ]
        );
    }

    #[tokio::test]
    async fn test_no_contest_leaves_records_alone() {
        let (engine, gateway) = setup().await;

        let match_id = engine
            .create_match(&bout(F1, F2, Some(WinnerInput::Value(-1))))
            .await
            .unwrap();

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 0, 0));
        assert_eq!(
            gateway.participants(match_id).await[0].outcome,
            Some(Outcome::NoContest)
        );
    }

    #[tokio::test]
    async fn test_pending_match_has_no_outcomes() {
        let (engine, gateway) = setup().await;

        let match_id = engine.create_match(&bout(F1, F2, None)).await.unwrap();

        assert!(gateway.participants(match_id).await.iter().all(|p| p.outcome.is_none()));
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));

        engine.update_match_result(match_id, F2).await.unwrap();
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 1, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 1, 0, 0));
    }

    #[tokio::test]
    async fn test_create_then_delete_restores_records() {
        let (engine, gateway) = setup().await;
        engine.create_match(&bout(F1, F2, won_by(F2))).await.unwrap();
        let before = (gateway.record(F1).await, gateway.record(F2).await);

        let match_id = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();
        engine.delete_match(match_id).await.unwrap();

        assert_eq!((gateway.record(F1).await, gateway.record(F2).await), before);
        assert!(!gateway.match_exists(match_id).await);
        assert!(gateway.participants(match_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_result_update_is_idempotent() {
        let (engine, gateway) = setup().await;
        let match_id = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();

        engine.update_match_result(match_id, F2).await.unwrap();
        let once = (gateway.record(F1).await, gateway.record(F2).await);

        engine.update_match_result(match_id, F2).await.unwrap();
        let twice = (gateway.record(F1).await, gateway.record(F2).await);

        assert_eq!(once, twice);
        assert_eq!(twice.0.unwrap(), record(F1, 0, 1, 0));
    }

    #[tokio::test]
    async fn test_no_contest_to_decision_only_increments() {
        let (engine, gateway) = setup().await;
        let match_id = engine
            .create_match(&bout(F1, F2, Some(WinnerInput::Keyword(ResultKeyword::NoContest))))
            .await
            .unwrap();

        engine.update_match_result(match_id, F1).await.unwrap();

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 1, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 1, 0));
    }

    #[tokio::test]
    async fn test_decision_to_no_contest_only_decrements() {
        let (engine, gateway) = setup().await;
        let match_id = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();

        engine.update_match_result(match_id, -1).await.unwrap();

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 0, 0));
    }

    #[tokio::test]
    async fn test_missing_record_row_is_created() {
        let (engine, gateway) = setup().await;
        gateway.add_fighter_without_record(9).await;

        engine.create_match(&bout(9, F1, won_by(9))).await.unwrap();

        assert_eq!(gateway.record(9).await.unwrap(), record(9, 1, 0, 0));
    }

    #[tokio::test]
    async fn test_records_track_participants_across_mixed_operations() {
        let (engine, gateway) = setup().await;

        let m1 = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();
        let m2 = engine.create_match(&bout(F2, F3, Some(WinnerInput::Value(0)))).await.unwrap();
        let m3 = engine.create_match(&bout(F3, F4, None)).await.unwrap();
        let m4 = engine.create_match(&bout(F1, F4, Some(WinnerInput::Value(-1)))).await.unwrap();
        assert_records_match_participants(&gateway).await;

        engine.update_match_result(m3, F4).await.unwrap();
        engine.update_match_result(m2, F3).await.unwrap();
        engine.update_match_result(m4, 0).await.unwrap();
        engine.update_match_result(m1, -1).await.unwrap();
        assert_records_match_participants(&gateway).await;

        engine.reassign_participant(m2, F2, F1).await.unwrap();
        engine.reassign_participant(m3, F3, F2).await.unwrap();
        engine.update_match_result(m3, F2).await.unwrap();
        assert_records_match_participants(&gateway).await;

        engine.delete_match(m4).await.unwrap();
        engine.update_match_result(m1, F2).await.unwrap();
        engine.delete_match(m2).await.unwrap();
        assert_records_match_participants(&gateway).await;

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 1, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 2, 0, 0));
        assert_eq!(gateway.record(F3).await.unwrap(), record(F3, 0, 0, 0));
        assert_eq!(gateway.record(F4).await.unwrap(), record(F4, 0, 1, 0));
    }

    #[tokio::test]
    async fn test_self_match_is_rejected() {
        let (engine, _gateway) = setup().await;

        let err = engine.create_match(&bout(F1, F1, won_by(F1))).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unknown_fighter_is_not_found() {
        let (engine, gateway) = setup().await;

        let err = engine.create_match(&bout(F1, 77, won_by(F1))).await.unwrap_err();

        assert!(matches!(err, StorageError::NotFound { entity: "fighter", id: 77 }));
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));
        assert!(!gateway.match_exists(1).await);
    }

    #[tokio::test]
    async fn test_winner_outside_match_records_no_contest() {
        let (engine, gateway) = setup().await;

        let created = engine.create_match(&bout(F1, F2, won_by(999))).await.unwrap();
        assert!(gateway
            .participants(created)
            .await
            .iter()
            .all(|p| p.outcome == Some(Outcome::NoContest)));
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 0, 0));

        let decided = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();
        let result = engine.update_match_result(decided, F3).await.unwrap();

        assert_eq!(result, MatchResult::NoContest);
        assert!(gateway
            .participants(decided)
            .await
            .iter()
            .all(|p| p.outcome == Some(Outcome::NoContest)));
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 0, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 0, 0));
        assert_eq!(gateway.record(F3).await.unwrap(), record(F3, 0, 0, 0));
        assert_records_match_participants(&gateway).await;
    }

    #[tokio::test]
    async fn test_unknown_match_is_not_found() {
        let (engine, _gateway) = setup().await;

        assert!(matches!(
            engine.update_match_result(40, F1).await,
            Err(StorageError::NotFound { entity: "match", id: 40 })
        ));
        assert!(matches!(
            engine.delete_match(40).await,
            Err(StorageError::NotFound { entity: "match", .. })
        ));
    }

    #[tokio::test]
    async fn test_reassign_requires_outgoing_participant() {
        let (engine, gateway) = setup().await;
        let match_id = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();

        let err = engine.reassign_participant(match_id, F3, F4).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "participant", id: F3 }));

        let err = engine.reassign_participant(match_id, F1, F2).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));

        let err = engine.reassign_participant(match_id, F1, 99).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "fighter", id: 99 }));

        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 1, 0, 0));
    }

    #[tokio::test]
    async fn test_failed_record_write_rolls_back_everything() {
        let (engine, gateway) = setup().await;
        let match_id = engine.create_match(&bout(F1, F2, won_by(F1))).await.unwrap();

        // F1's delta is written first and succeeds; F2's fails afterwards
        gateway.break_record_writes(F2).await;
        let err = engine.update_match_result(match_id, F2).await.unwrap_err();

        assert!(matches!(err, StorageError::Database(_)));
        assert_eq!(gateway.record(F1).await.unwrap(), record(F1, 1, 0, 0));
        assert_eq!(gateway.record(F2).await.unwrap(), record(F2, 0, 1, 0));
        assert_eq!(
            gateway.participants(match_id).await,
            vec![
                ParticipantState { fighter_id: F1, outcome: Some(Outcome::Win) },
                ParticipantState { fighter_id: F2, outcome: Some(Outcome::Loss) },
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_updates_on_shared_fighter_serialize() {
        let (engine, gateway) = setup().await;
        let engine = std::sync::Arc::new(engine);
        let m1 = engine.create_match(&bout(F1, F2, None)).await.unwrap();
        let m2 = engine.create_match(&bout(F1, F3, None)).await.unwrap();

        let mut handles = Vec::new();
        for (match_id, winner) in [(m1, F1), (m2, F1), (m1, F2), (m2, 0), (m1, F1)] {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.update_match_result(match_id, winner).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_records_match_participants(&gateway).await;
    }
}
