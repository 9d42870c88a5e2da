use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Gym {
    pub gym_id: i32,
    pub name: String,
    pub location: String,
    pub owner: String,
    pub reputation_score: i32,
}
