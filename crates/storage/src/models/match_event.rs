use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MatchEvent {
    pub match_id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub location: String,
}

impl MatchEvent {
    /// Elapsed time between start and end, unknown until the match has ended
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end_date.map(|end| end - self.start_date)
    }
}
