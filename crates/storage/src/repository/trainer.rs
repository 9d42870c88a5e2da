use chrono::NaiveDate;
use sqlx::PgPool;

use crate::dto::trainer::{CreateTrainerRequest, UpdateTrainerRequest};
use crate::error::{Result, StorageError};
use crate::models::{Fighter, Trainer, TrainerAssignment};

pub struct TrainerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TrainerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<Trainer>> {
        let trainers = sqlx::query_as::<_, Trainer>(
            r#"
            SELECT trainer_id, name, specialty, gym_id
            FROM trainers
            ORDER BY trainer_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(trainers)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Trainer> {
        let trainer = sqlx::query_as::<_, Trainer>(
            "SELECT trainer_id, name, specialty, gym_id FROM trainers WHERE trainer_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::not_found("trainer", id))?;

        Ok(trainer)
    }

    pub async fn list_by_gym(&self, gym_id: i32) -> Result<Vec<Trainer>> {
        let trainers = sqlx::query_as::<_, Trainer>(
            r#"
            SELECT trainer_id, name, specialty, gym_id
            FROM trainers
            WHERE gym_id = $1
            ORDER BY name
            "#,
        )
        .bind(gym_id)
        .fetch_all(self.pool)
        .await?;

        Ok(trainers)
    }

    pub async fn create(&self, req: &CreateTrainerRequest) -> Result<Trainer> {
        let trainer = sqlx::query_as::<_, Trainer>(
            r#"
            INSERT INTO trainers (name, specialty, gym_id)
            VALUES ($1, $2, $3)
            RETURNING trainer_id, name, specialty, gym_id
            "#,
        )
        .bind(&req.name)
        .bind(&req.specialty)
        .bind(req.gym_id)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from_constraint)?;

        Ok(trainer)
    }

    pub async fn update(
        &self,
        id: i32,
        existing: &Trainer,
        req: &UpdateTrainerRequest,
    ) -> Result<Trainer> {
        let trainer = sqlx::query_as::<_, Trainer>(
            r#"
            UPDATE trainers
            SET name = $2, specialty = $3, gym_id = $4
            WHERE trainer_id = $1
            RETURNING trainer_id, name, specialty, gym_id
            "#,
        )
        .bind(id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.specialty.as_ref().unwrap_or(&existing.specialty))
        .bind(req.gym_id.or(existing.gym_id))
        .fetch_optional(self.pool)
        .await
        .map_err(StorageError::from_constraint)?
        .ok_or(StorageError::not_found("trainer", id))?;

        Ok(trainer)
    }

    pub async fn set_gym(&self, id: i32, gym_id: Option<i32>) -> Result<()> {
        let result = sqlx::query("UPDATE trainers SET gym_id = $2 WHERE trainer_id = $1")
            .bind(id)
            .bind(gym_id)
            .execute(self.pool)
            .await
            .map_err(StorageError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("trainer", id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM trainers WHERE trainer_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("trainer", id));
        }

        Ok(())
    }

    /// Fighters currently training with this trainer
    pub async fn active_fighters(&self, trainer_id: i32) -> Result<Vec<Fighter>> {
        let fighters = sqlx::query_as::<_, Fighter>(
            r#"
            SELECT f.fighter_id, f.name, f.nickname, f.weight_class, f.height, f.age,
                   f.nationality, f.status, f.gym_id
            FROM fighters f
            JOIN fighter_trainer ft ON ft.fighter_id = f.fighter_id
            WHERE ft.trainer_id = $1 AND ft.end_date IS NULL
            ORDER BY f.name
            "#,
        )
        .bind(trainer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(fighters)
    }

    /// Open an assignment; a pair can only have one active assignment at a time
    pub async fn assign(
        &self,
        fighter_id: i32,
        trainer_id: i32,
        start_date: NaiveDate,
    ) -> Result<TrainerAssignment> {
        let assignment = sqlx::query_as::<_, TrainerAssignment>(
            r#"
            INSERT INTO fighter_trainer (fighter_id, trainer_id, start_date)
            VALUES ($1, $2, $3)
            RETURNING ft_id, fighter_id, trainer_id, start_date, end_date
            "#,
        )
        .bind(fighter_id)
        .bind(trainer_id)
        .bind(start_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some("23505")
            {
                return StorageError::ConstraintViolation(format!(
                    "Trainer {trainer_id} is already assigned to fighter {fighter_id}"
                ));
            }
            StorageError::from_constraint(e)
        })?;

        Ok(assignment)
    }

    /// Close the active assignment of a pair, keeping it as history
    pub async fn end_assignment(
        &self,
        fighter_id: i32,
        trainer_id: i32,
        end_date: NaiveDate,
    ) -> Result<TrainerAssignment> {
        let mut tx = self.pool.begin().await?;

        let active = sqlx::query_as::<_, TrainerAssignment>(
            r#"
            SELECT ft_id, fighter_id, trainer_id, start_date, end_date
            FROM fighter_trainer
            WHERE fighter_id = $1 AND trainer_id = $2 AND end_date IS NULL
            FOR UPDATE
            "#,
        )
        .bind(fighter_id)
        .bind(trainer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::not_found("assignment", trainer_id))?;

        if end_date < active.start_date {
            return Err(StorageError::invalid(format!(
                "Assignment cannot end on {end_date}, before it started on {}",
                active.start_date
            )));
        }

        let ended = sqlx::query_as::<_, TrainerAssignment>(
            r#"
            UPDATE fighter_trainer
            SET end_date = $2
            WHERE ft_id = $1
            RETURNING ft_id, fighter_id, trainer_id, start_date, end_date
            "#,
        )
        .bind(active.ft_id)
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::from_constraint)?;

        tx.commit().await?;
        Ok(ended)
    }
}
