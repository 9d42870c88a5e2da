use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Fighter, Gym, Trainer};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTrainerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub specialty: String,

    pub gym_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTrainerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub specialty: Option<String>,

    pub gym_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrainerDetailResponse {
    #[serde(flatten)]
    pub trainer: Trainer,
    pub gym: Option<Gym>,
    /// Fighters with an active assignment to this trainer
    pub fighters: Vec<Fighter>,
}

/// Request payload for assigning a trainer to a fighter
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignTrainerRequest {
    #[validate(range(min = 1))]
    pub trainer_id: i32,

    /// Defaults to today
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EndAssignmentRequest {
    /// Defaults to today
    pub end_date: Option<NaiveDate>,
}

/// Assignment row joined with the trainer it points at
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AssignmentDetail {
    pub ft_id: i32,
    pub trainer_id: i32,
    pub trainer_name: String,
    pub specialty: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
