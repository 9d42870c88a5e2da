use sqlx::PgPool;

use crate::dto::match_event::{MatchDetailResponse, MatchResponse, ParticipantDetail};
use crate::error::{Result, StorageError};
use crate::models::{MatchEvent, Outcome};
use crate::services::outcome::MatchResult;

/// Read side of matches; every write goes through the match engine
pub struct MatchEventRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    fighter_id: i32,
    fighter_name: String,
    result: Option<String>,
}

impl<'a> MatchEventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<MatchEvent>> {
        let events = sqlx::query_as::<_, MatchEvent>(
            r#"
            SELECT match_id, start_date, end_date, location
            FROM match_events
            ORDER BY start_date DESC, match_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<MatchEvent> {
        let event = sqlx::query_as::<_, MatchEvent>(
            "SELECT match_id, start_date, end_date, location FROM match_events WHERE match_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::not_found("match", id))?;

        Ok(event)
    }

    /// Match with its participants and the decoded winner
    pub async fn find_detailed(&self, id: i32) -> Result<MatchDetailResponse> {
        let event = self.find_by_id(id).await?;

        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT p.fighter_id, f.name AS fighter_name, p.result
            FROM participants p
            JOIN fighters f ON f.fighter_id = p.fighter_id
            WHERE p.match_id = $1
            ORDER BY p.fighter_id
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let participants = rows
            .into_iter()
            .map(|row| {
                Ok(ParticipantDetail {
                    fighter_id: row.fighter_id,
                    fighter_name: row.fighter_name,
                    result: row
                        .result
                        .as_deref()
                        .map(str::parse::<Outcome>)
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let winner = match participants.as_slice() {
            [a, b] => match MatchResult::from_outcomes(
                (a.fighter_id, a.result),
                (b.fighter_id, b.result),
            ) {
                Ok(result) => result.winner_value(),
                Err(e) => {
                    tracing::warn!("Match {} has inconsistent results: {}", id, e);
                    None
                }
            },
            _ => None,
        };

        Ok(MatchDetailResponse {
            event: MatchResponse::from(event),
            participants,
            winner,
        })
    }
}
