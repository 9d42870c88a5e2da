use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of a fighter's training history; `end_date` is null while active
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainerAssignment {
    pub ft_id: i32,
    pub fighter_id: i32,
    pub trainer_id: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl TrainerAssignment {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}
