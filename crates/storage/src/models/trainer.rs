use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Trainer {
    pub trainer_id: i32,
    pub name: String,
    pub specialty: String,
    pub gym_id: Option<i32>,
}
