use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{Gateway, NewMatch, ParticipantState, UnitOfWork};
use crate::error::{Result, StorageError};
use crate::models::{Outcome, Participant};
use crate::services::outcome::RecordDelta;

/// Gateway over the PostgreSQL pool; every unit of work is one database transaction
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    type Unit = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork { tx })
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn fighter_exists(&mut self, fighter_id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM fighters WHERE fighter_id = $1)",
        )
        .bind(fighter_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn insert_match(&mut self, new_match: &NewMatch) -> Result<i32> {
        let match_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO match_events (start_date, end_date, location)
            VALUES ($1, $2, $3)
            RETURNING match_id
            "#,
        )
        .bind(new_match.start_date)
        .bind(new_match.end_date)
        .bind(&new_match.location)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(StorageError::from_constraint)?;

        Ok(match_id)
    }

    async fn insert_participant(
        &mut self,
        match_id: i32,
        fighter_id: i32,
        outcome: Option<Outcome>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO participants (match_id, fighter_id, result)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(match_id)
        .bind(fighter_id)
        .bind(outcome.map(|o| o.as_str()))
        .execute(&mut *self.tx)
        .await
        .map_err(StorageError::from_constraint)?;

        Ok(())
    }

    async fn lock_participants(&mut self, match_id: i32) -> Result<Vec<ParticipantState>> {
        sqlx::query_scalar::<_, i32>(
            "SELECT match_id FROM match_events WHERE match_id = $1 FOR UPDATE",
        )
        .bind(match_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or(StorageError::not_found("match", match_id))?;

        let rows = sqlx::query_as::<_, Participant>(
            r#"
            SELECT match_id, fighter_id, result
            FROM participants
            WHERE match_id = $1
            ORDER BY fighter_id
            FOR UPDATE
            "#,
        )
        .bind(match_id)
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ParticipantState {
                    fighter_id: row.fighter_id,
                    outcome: row.outcome()?,
                })
            })
            .collect()
    }

    async fn set_outcome(
        &mut self,
        match_id: i32,
        fighter_id: i32,
        outcome: Option<Outcome>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET result = $3
            WHERE match_id = $1 AND fighter_id = $2
            "#,
        )
        .bind(match_id)
        .bind(fighter_id)
        .bind(outcome.map(|o| o.as_str()))
        .execute(&mut *self.tx)
        .await
        .map_err(StorageError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("participant", fighter_id));
        }

        Ok(())
    }

    async fn replace_fighter(
        &mut self,
        match_id: i32,
        old_fighter_id: i32,
        new_fighter_id: i32,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET fighter_id = $3
            WHERE match_id = $1 AND fighter_id = $2
            "#,
        )
        .bind(match_id)
        .bind(old_fighter_id)
        .bind(new_fighter_id)
        .execute(&mut *self.tx)
        .await
        .map_err(StorageError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("participant", old_fighter_id));
        }

        Ok(())
    }

    async fn apply_record_delta(&mut self, fighter_id: i32, delta: RecordDelta) -> Result<()> {
        // Records created out of band may be missing; start those from zero.
        sqlx::query(
            r#"
            INSERT INTO fighter_records (fighter_id, wins, losses, draws)
            VALUES ($1, 0, 0, 0)
            ON CONFLICT (fighter_id) DO NOTHING
            "#,
        )
        .bind(fighter_id)
        .execute(&mut *self.tx)
        .await
        .map_err(StorageError::from_constraint)?;

        sqlx::query(
            r#"
            UPDATE fighter_records
            SET wins = wins + $2,
                losses = losses + $3,
                draws = draws + $4
            WHERE fighter_id = $1
            "#,
        )
        .bind(fighter_id)
        .bind(delta.wins)
        .bind(delta.losses)
        .bind(delta.draws)
        .execute(&mut *self.tx)
        .await
        .map_err(StorageError::from_constraint)?;

        Ok(())
    }

    async fn delete_match(&mut self, match_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM match_events WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("match", match_id));
        }

        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
