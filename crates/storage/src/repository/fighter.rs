use sqlx::PgPool;

use crate::dto::fighter::{CreateFighterRequest, FighterResponse, UpdateFighterRequest};
use crate::dto::match_event::{FighterMatchResponse, MatchResponse};
use crate::dto::trainer::AssignmentDetail;
use crate::error::{Result, StorageError};
use crate::models::{Fighter, MatchEvent, Outcome};

const FIGHTER_WITH_RECORD: &str = r#"
    SELECT f.fighter_id, f.name, f.nickname, f.weight_class, f.height, f.age,
           f.nationality, f.status, f.gym_id,
           COALESCE(r.wins, 0) AS wins,
           COALESCE(r.losses, 0) AS losses,
           COALESCE(r.draws, 0) AS draws
    FROM fighters f
    LEFT JOIN fighter_records r ON r.fighter_id = f.fighter_id
"#;

/// Repository for Fighter database operations
pub struct FighterRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct FighterMatchRow {
    #[sqlx(flatten)]
    event: MatchEvent,
    result: Option<String>,
}

impl<'a> FighterRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recently registered fighters first
    pub async fn list(&self, limit: i64) -> Result<Vec<FighterResponse>> {
        let fighters = sqlx::query_as::<_, FighterResponse>(&format!(
            "{FIGHTER_WITH_RECORD} ORDER BY f.fighter_id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(fighters)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Fighter> {
        let fighter = sqlx::query_as::<_, Fighter>(
            r#"
            SELECT fighter_id, name, nickname, weight_class, height, age,
                   nationality, status, gym_id
            FROM fighters
            WHERE fighter_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::not_found("fighter", id))?;

        Ok(fighter)
    }

    pub async fn find_with_record(&self, id: i32) -> Result<FighterResponse> {
        let fighter = sqlx::query_as::<_, FighterResponse>(&format!(
            "{FIGHTER_WITH_RECORD} WHERE f.fighter_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::not_found("fighter", id))?;

        Ok(fighter)
    }

    pub async fn list_by_gym(&self, gym_id: i32) -> Result<Vec<Fighter>> {
        let fighters = sqlx::query_as::<_, Fighter>(
            r#"
            SELECT fighter_id, name, nickname, weight_class, height, age,
                   nationality, status, gym_id
            FROM fighters
            WHERE gym_id = $1
            ORDER BY name
            "#,
        )
        .bind(gym_id)
        .fetch_all(self.pool)
        .await?;

        Ok(fighters)
    }

    /// Register a fighter with a zeroed record in one transaction
    pub async fn create(&self, req: &CreateFighterRequest) -> Result<FighterResponse> {
        let mut tx = self.pool.begin().await?;

        let fighter = sqlx::query_as::<_, Fighter>(
            r#"
            INSERT INTO fighters (name, nickname, weight_class, height, age, nationality, status, gym_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING fighter_id, name, nickname, weight_class, height, age,
                      nationality, status, gym_id
            "#,
        )
        .bind(&req.name)
        .bind(&req.nickname)
        .bind(&req.weight_class)
        .bind(req.height)
        .bind(req.age)
        .bind(&req.nationality)
        .bind(&req.status)
        .bind(req.gym_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::from_constraint)?;

        sqlx::query("INSERT INTO fighter_records (fighter_id, wins, losses, draws) VALUES ($1, 0, 0, 0)")
            .bind(fighter.fighter_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(FighterResponse {
            fighter,
            record: Default::default(),
        })
    }

    /// Update profile fields; the record is owned by the match engine
    pub async fn update(
        &self,
        id: i32,
        existing: &Fighter,
        req: &UpdateFighterRequest,
    ) -> Result<Fighter> {
        let fighter = sqlx::query_as::<_, Fighter>(
            r#"
            UPDATE fighters
            SET name = $2,
                nickname = $3,
                weight_class = $4,
                height = $5,
                age = $6,
                nationality = $7,
                status = $8,
                gym_id = $9
            WHERE fighter_id = $1
            RETURNING fighter_id, name, nickname, weight_class, height, age,
                      nationality, status, gym_id
            "#,
        )
        .bind(id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.nickname.as_ref().or(existing.nickname.as_ref()))
        .bind(req.weight_class.as_ref().unwrap_or(&existing.weight_class))
        .bind(req.height.or(existing.height))
        .bind(req.age.unwrap_or(existing.age))
        .bind(req.nationality.as_ref().or(existing.nationality.as_ref()))
        .bind(req.status.as_ref().unwrap_or(&existing.status))
        .bind(req.gym_id.or(existing.gym_id))
        .fetch_optional(self.pool)
        .await
        .map_err(StorageError::from_constraint)?
        .ok_or(StorageError::not_found("fighter", id))?;

        Ok(fighter)
    }

    /// Move a fighter into a gym, or out of any gym with `None`
    pub async fn set_gym(&self, id: i32, gym_id: Option<i32>) -> Result<()> {
        let result = sqlx::query("UPDATE fighters SET gym_id = $2 WHERE fighter_id = $1")
            .bind(id)
            .bind(gym_id)
            .execute(self.pool)
            .await
            .map_err(StorageError::from_constraint)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("fighter", id));
        }

        Ok(())
    }

    /// Delete a fighter; assignments, participation and record cascade
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM fighters WHERE fighter_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("fighter", id));
        }

        Ok(())
    }

    pub async fn matches(&self, fighter_id: i32) -> Result<Vec<FighterMatchResponse>> {
        let rows = sqlx::query_as::<_, FighterMatchRow>(
            r#"
            SELECT m.match_id, m.start_date, m.end_date, m.location, p.result
            FROM match_events m
            JOIN participants p ON p.match_id = m.match_id
            WHERE p.fighter_id = $1
            ORDER BY m.start_date DESC, m.match_id DESC
            "#,
        )
        .bind(fighter_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let result = row
                    .result
                    .as_deref()
                    .map(str::parse::<Outcome>)
                    .transpose()?;
                Ok(FighterMatchResponse {
                    event: MatchResponse::from(row.event),
                    result,
                })
            })
            .collect()
    }

    /// Full training history, active assignments first
    pub async fn assignments(&self, fighter_id: i32) -> Result<Vec<AssignmentDetail>> {
        let assignments = sqlx::query_as::<_, AssignmentDetail>(
            r#"
            SELECT ft.ft_id, t.trainer_id, t.name AS trainer_name, t.specialty,
                   ft.start_date, ft.end_date
            FROM fighter_trainer ft
            JOIN trainers t ON t.trainer_id = ft.trainer_id
            WHERE ft.fighter_id = $1
            ORDER BY ft.end_date IS NOT NULL, ft.start_date DESC
            "#,
        )
        .bind(fighter_id)
        .fetch_all(self.pool)
        .await?;

        Ok(assignments)
    }
}
