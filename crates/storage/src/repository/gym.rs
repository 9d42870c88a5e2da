use sqlx::PgPool;

use crate::dto::gym::{CreateGymRequest, GymFilter, UpdateGymRequest};
use crate::error::{Result, StorageError};
use crate::models::Gym;

pub struct GymRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GymRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recent gyms first, optionally within a reputation range
    pub async fn list(&self, limit: i64, filter: &GymFilter) -> Result<Vec<Gym>> {
        let gyms = sqlx::query_as::<_, Gym>(
            r#"
            SELECT gym_id, name, location, owner, reputation_score
            FROM gyms
            WHERE ($2::INTEGER IS NULL OR reputation_score >= $2)
              AND ($3::INTEGER IS NULL OR reputation_score <= $3)
            ORDER BY gym_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(filter.min_reputation)
        .bind(filter.max_reputation)
        .fetch_all(self.pool)
        .await?;

        Ok(gyms)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Gym> {
        let gym = sqlx::query_as::<_, Gym>(
            r#"
            SELECT gym_id, name, location, owner, reputation_score
            FROM gyms
            WHERE gym_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::not_found("gym", id))?;

        Ok(gym)
    }

    pub async fn create(&self, req: &CreateGymRequest) -> Result<Gym> {
        let gym = sqlx::query_as::<_, Gym>(
            r#"
            INSERT INTO gyms (name, location, owner, reputation_score)
            VALUES ($1, $2, $3, $4)
            RETURNING gym_id, name, location, owner, reputation_score
            "#,
        )
        .bind(&req.name)
        .bind(&req.location)
        .bind(&req.owner)
        .bind(req.reputation_score)
        .fetch_one(self.pool)
        .await
        .map_err(duplicate_name_location)?;

        Ok(gym)
    }

    pub async fn update(&self, id: i32, existing: &Gym, req: &UpdateGymRequest) -> Result<Gym> {
        let gym = sqlx::query_as::<_, Gym>(
            r#"
            UPDATE gyms
            SET name = $2,
                location = $3,
                owner = $4,
                reputation_score = $5
            WHERE gym_id = $1
            RETURNING gym_id, name, location, owner, reputation_score
            "#,
        )
        .bind(id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.location.as_ref().unwrap_or(&existing.location))
        .bind(req.owner.as_ref().unwrap_or(&existing.owner))
        .bind(req.reputation_score.unwrap_or(existing.reputation_score))
        .fetch_optional(self.pool)
        .await
        .map_err(duplicate_name_location)?
        .ok_or(StorageError::not_found("gym", id))?;

        Ok(gym)
    }

    /// Delete a gym; its fighters and trainers stay, with the reference cleared
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM gyms WHERE gym_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("gym", id));
        }

        Ok(())
    }
}

fn duplicate_name_location(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.code().as_deref() == Some("23505")
    {
        return StorageError::ConstraintViolation(
            "A gym with this name already exists at this location".to_string(),
        );
    }
    StorageError::from_constraint(e)
}
