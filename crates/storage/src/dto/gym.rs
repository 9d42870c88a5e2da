use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Fighter, Gym, Trainer};

/// Request payload for creating a gym
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateGymRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub location: String,

    #[validate(length(min = 1, max = 255))]
    pub owner: String,

    #[validate(range(min = 0, max = 100, message = "Reputation must be between 0 and 100"))]
    #[serde(default = "default_reputation")]
    pub reputation_score: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateGymRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub owner: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Reputation must be between 0 and 100"))]
    pub reputation_score: Option<i32>,
}

/// Inclusive reputation bounds for listing gyms; either side may be left open
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "validate_reputation_bounds"))]
pub struct GymFilter {
    #[validate(range(min = 0, max = 100, message = "Reputation must be between 0 and 100"))]
    pub min_reputation: Option<i32>,

    #[validate(range(min = 0, max = 100, message = "Reputation must be between 0 and 100"))]
    pub max_reputation: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GymDetailResponse {
    #[serde(flatten)]
    pub gym: Gym,
    pub fighters: Vec<Fighter>,
    pub trainers: Vec<Trainer>,
}

fn default_reputation() -> i32 {
    75
}

fn validate_reputation_bounds(filter: &GymFilter) -> Result<(), validator::ValidationError> {
    if let (Some(min), Some(max)) = (filter.min_reputation, filter.max_reputation)
        && min > max
    {
        return Err(validator::ValidationError::new("min_reputation_above_max"));
    }
    Ok(())
}
