//! In-process gateway used by the engine tests.
//!
//! A unit of work holds the state lock from `begin` until it is committed or dropped,
//! so units of work are fully serialized. Writes go to a private copy that replaces
//! the shared state only on commit.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Gateway, NewMatch, ParticipantState, UnitOfWork};
use crate::error::{Result, StorageError};
use crate::models::{FighterRecord, Outcome};
use crate::services::outcome::RecordDelta;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    fighters: BTreeSet<i32>,
    matches: BTreeMap<i32, NewMatch>,
    participants: BTreeMap<(i32, i32), Option<Outcome>>,
    records: BTreeMap<i32, FighterRecord>,
    last_match_id: i32,
    broken_record: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fighter together with a zeroed record
    pub async fn add_fighter(&self, fighter_id: i32) {
        let mut state = self.state.lock().await;
        state.fighters.insert(fighter_id);
        state
            .records
            .insert(fighter_id, FighterRecord::zeroed(fighter_id));
    }

    /// Register a fighter whose record row was never created
    pub async fn add_fighter_without_record(&self, fighter_id: i32) {
        self.state.lock().await.fighters.insert(fighter_id);
    }

    pub async fn record(&self, fighter_id: i32) -> Option<FighterRecord> {
        self.state.lock().await.records.get(&fighter_id).copied()
    }

    pub async fn participants(&self, match_id: i32) -> Vec<ParticipantState> {
        let state = self.state.lock().await;
        participants_of(&state, match_id)
    }

    pub async fn match_exists(&self, match_id: i32) -> bool {
        self.state.lock().await.matches.contains_key(&match_id)
    }

    /// Tally a fighter's scored outcomes straight from the participant rows
    pub async fn recount(&self, fighter_id: i32) -> FighterRecord {
        let state = self.state.lock().await;
        let mut record = FighterRecord::zeroed(fighter_id);
        for ((_, fighter), outcome) in &state.participants {
            if *fighter != fighter_id {
                continue;
            }
            match outcome {
                Some(Outcome::Win) => record.wins += 1,
                Some(Outcome::Loss) => record.losses += 1,
                Some(Outcome::Draw) => record.draws += 1,
                Some(Outcome::NoContest) | None => {}
            }
        }
        record
    }

    /// Make every later record write for `fighter_id` fail like a lost connection
    pub async fn break_record_writes(&self, fighter_id: i32) {
        self.state.lock().await.broken_record = Some(fighter_id);
    }
}

fn participants_of(state: &MemoryState, match_id: i32) -> Vec<ParticipantState> {
    state
        .participants
        .range((match_id, i32::MIN)..=(match_id, i32::MAX))
        .map(|((_, fighter_id), outcome)| ParticipantState {
            fighter_id: *fighter_id,
            outcome: *outcome,
        })
        .collect()
}

#[async_trait]
impl Gateway for MemoryGateway {
    type Unit = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryUnitOfWork { guard, working })
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryUnitOfWork {
    fn require_fighter(&self, fighter_id: i32) -> Result<()> {
        if self.working.fighters.contains(&fighter_id) {
            Ok(())
        } else {
            Err(StorageError::ConstraintViolation(format!(
                "Referenced row does not exist (fighter {fighter_id})"
            )))
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn fighter_exists(&mut self, fighter_id: i32) -> Result<bool> {
        Ok(self.working.fighters.contains(&fighter_id))
    }

    async fn insert_match(&mut self, new_match: &NewMatch) -> Result<i32> {
        self.working.last_match_id += 1;
        let match_id = self.working.last_match_id;
        self.working.matches.insert(match_id, new_match.clone());
        Ok(match_id)
    }

    async fn insert_participant(
        &mut self,
        match_id: i32,
        fighter_id: i32,
        outcome: Option<Outcome>,
    ) -> Result<()> {
        self.require_fighter(fighter_id)?;
        if self.working.participants.contains_key(&(match_id, fighter_id)) {
            return Err(StorageError::ConstraintViolation(format!(
                "Fighter {fighter_id} already participates in match {match_id}"
            )));
        }
        self.working
            .participants
            .insert((match_id, fighter_id), outcome);
        Ok(())
    }

    async fn lock_participants(&mut self, match_id: i32) -> Result<Vec<ParticipantState>> {
        if !self.working.matches.contains_key(&match_id) {
            return Err(StorageError::not_found("match", match_id));
        }
        Ok(participants_of(&self.working, match_id))
    }

    async fn set_outcome(
        &mut self,
        match_id: i32,
        fighter_id: i32,
        outcome: Option<Outcome>,
    ) -> Result<()> {
        let slot = self
            .working
            .participants
            .get_mut(&(match_id, fighter_id))
            .ok_or(StorageError::not_found("participant", fighter_id))?;
        *slot = outcome;
        Ok(())
    }

    async fn replace_fighter(
        &mut self,
        match_id: i32,
        old_fighter_id: i32,
        new_fighter_id: i32,
    ) -> Result<()> {
        self.require_fighter(new_fighter_id)?;
        let outcome = self
            .working
            .participants
            .remove(&(match_id, old_fighter_id))
            .ok_or(StorageError::not_found("participant", old_fighter_id))?;
        self.working
            .participants
            .insert((match_id, new_fighter_id), outcome);
        Ok(())
    }

    async fn apply_record_delta(&mut self, fighter_id: i32, delta: RecordDelta) -> Result<()> {
        if self.working.broken_record == Some(fighter_id) {
            return Err(StorageError::Database(sqlx::Error::PoolClosed));
        }
        self.require_fighter(fighter_id)?;
        let record = self
            .working
            .records
            .entry(fighter_id)
            .or_insert_with(|| FighterRecord::zeroed(fighter_id));
        delta.apply_to(record)
    }

    async fn delete_match(&mut self, match_id: i32) -> Result<()> {
        if self.working.matches.remove(&match_id).is_none() {
            return Err(StorageError::not_found("match", match_id));
        }
        self.working
            .participants
            .retain(|(participant_match, _), _| *participant_match != match_id);
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        let MemoryUnitOfWork { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}
