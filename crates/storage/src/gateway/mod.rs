//! Transactional access to the rows the match outcome engine mutates.
//!
//! A [`Gateway`] hands out [`UnitOfWork`]s. Everything done through a unit of work
//! becomes visible only on [`UnitOfWork::commit`]; dropping it without committing
//! rolls every write back.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::models::Outcome;
use crate::services::outcome::RecordDelta;

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::{PgGateway, PgUnitOfWork};

/// Columns of a `match_events` row about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub location: String,
}

/// A participant as seen inside a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantState {
    pub fighter_id: i32,
    pub outcome: Option<Outcome>,
}

#[async_trait]
pub trait Gateway: Send + Sync {
    type Unit: UnitOfWork;

    async fn begin(&self) -> Result<Self::Unit>;
}

#[async_trait]
pub trait UnitOfWork: Send {
    async fn fighter_exists(&mut self, fighter_id: i32) -> Result<bool>;

    async fn insert_match(&mut self, new_match: &NewMatch) -> Result<i32>;

    async fn insert_participant(
        &mut self,
        match_id: i32,
        fighter_id: i32,
        outcome: Option<Outcome>,
    ) -> Result<()>;

    /// Lock the match for the rest of the unit of work and return its participants
    /// ordered by fighter id. Fails with `NotFound` when the match does not exist.
    async fn lock_participants(&mut self, match_id: i32) -> Result<Vec<ParticipantState>>;

    async fn set_outcome(
        &mut self,
        match_id: i32,
        fighter_id: i32,
        outcome: Option<Outcome>,
    ) -> Result<()>;

    /// Point an existing participant row at another fighter, keeping its outcome
    async fn replace_fighter(
        &mut self,
        match_id: i32,
        old_fighter_id: i32,
        new_fighter_id: i32,
    ) -> Result<()>;

    /// Add signed counter changes to a fighter record, creating a zeroed record first
    /// when the fighter has none.
    async fn apply_record_delta(
        &mut self,
        fighter_id: i32,
        delta: RecordDelta,
    ) -> Result<()>;

    /// Delete the match; its participants go with it
    async fn delete_match(&mut self, match_id: i32) -> Result<()>;

    async fn commit(self) -> Result<()>;
}
