use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::match_event::FighterMatchResponse;
use crate::models::{FIGHTER_STATUSES, Fighter, FighterRecord, Gym, WEIGHT_CLASSES};

/// Request payload for registering a fighter
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFighterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 255))]
    pub nickname: Option<String>,

    #[validate(custom(function = "validate_weight_class"))]
    pub weight_class: String,

    #[validate(custom(function = "validate_height"))]
    pub height: Option<Decimal>,

    #[validate(range(min = 1, message = "Age must be positive"))]
    pub age: i32,

    #[validate(length(max = 255))]
    pub nationality: Option<String>,

    #[validate(custom(function = "validate_status"))]
    #[serde(default = "default_status")]
    pub status: String,

    pub gym_id: Option<i32>,
}

/// Typed partial update; win/loss/draw counters are deliberately not part of it
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateFighterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 255))]
    pub nickname: Option<String>,

    #[validate(custom(function = "validate_weight_class"))]
    pub weight_class: Option<String>,

    #[validate(custom(function = "validate_height"))]
    pub height: Option<Decimal>,

    #[validate(range(min = 1, message = "Age must be positive"))]
    pub age: Option<i32>,

    #[validate(length(max = 255))]
    pub nationality: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    pub gym_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecordSummary {
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
}

impl From<FighterRecord> for RecordSummary {
    fn from(record: FighterRecord) -> Self {
        Self {
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FighterResponse {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fighter: Fighter,
    #[sqlx(flatten)]
    pub record: RecordSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FighterDetailResponse {
    #[serde(flatten)]
    pub fighter: Fighter,
    pub record: RecordSummary,
    pub gym: Option<Gym>,
    pub trainers: Vec<crate::dto::trainer::AssignmentDetail>,
    pub matches: Vec<FighterMatchResponse>,
}

fn default_status() -> String {
    "active".to_string()
}

fn validate_weight_class(weight_class: &str) -> Result<(), validator::ValidationError> {
    if WEIGHT_CLASSES.contains(&weight_class) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_weight_class"))
    }
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if FIGHTER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_status"))
    }
}

fn validate_height(height: &Decimal) -> Result<(), validator::ValidationError> {
    // numeric(5, 2)
    if *height > Decimal::ZERO && *height < Decimal::from(1000) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_height"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateFighterRequest {
        CreateFighterRequest {
            name: "Tyler Durden".to_string(),
            nickname: None,
            weight_class: "Welterweight".to_string(),
            height: Some(Decimal::new(18300, 2)),
            age: 31,
            nationality: None,
            status: default_status(),
            gym_id: None,
        }
    }

    #[test]
    fn test_valid_fighter() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_unknown_weight_class() {
        let mut req = request();
        req.weight_class = "Cruiserweight".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_non_positive_height_and_age() {
        let mut req = request();
        req.height = Some(Decimal::ZERO);
        assert!(req.validate().is_err());

        let mut req = request();
        req.age = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_defaults_to_active() {
        let req: CreateFighterRequest = serde_json::from_str(
            r#"{"name": "Bob", "weight_class": "Heavyweight", "age": 45}"#,
        )
        .unwrap();
        assert_eq!(req.status, "active");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_unknown_status() {
        let req = UpdateFighterRequest {
            status: Some("banned".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
