use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::gateway::NewMatch;
use crate::models::{MatchEvent, Outcome};
use crate::services::outcome::{DRAW_SENTINEL, NO_CONTEST_SENTINEL};

/// Non-decisive results accepted by name instead of by sentinel value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResultKeyword {
    Draw,
    NoContest,
}

/// Winner field: a fighter id, a sentinel (`0` draw, `-1` no contest) or a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WinnerInput {
    Value(i32),
    Keyword(ResultKeyword),
}

impl WinnerInput {
    pub fn value(&self) -> i32 {
        match self {
            WinnerInput::Value(v) => *v,
            WinnerInput::Keyword(ResultKeyword::Draw) => DRAW_SENTINEL,
            WinnerInput::Keyword(ResultKeyword::NoContest) => NO_CONTEST_SENTINEL,
        }
    }
}

/// Request payload for creating a match with its two participants
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMatchRequest {
    pub start_date: NaiveDateTime,

    pub end_date: Option<NaiveDateTime>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Location must be between 1 and 255 characters"
    ))]
    pub location: String,

    #[validate(range(min = 1, message = "Fighter ids are positive"))]
    pub fighter1_id: i32,

    #[validate(range(min = 1, message = "Fighter ids are positive"))]
    pub fighter2_id: i32,

    /// Absent while the result is still pending
    pub winner: Option<WinnerInput>,
}

impl CreateMatchRequest {
    /// Checks spanning several fields
    pub fn validate_pairing(&self) -> Result<(), &'static str> {
        if self.fighter1_id == self.fighter2_id {
            return Err("A fighter cannot be matched against themselves");
        }

        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err("End time must be on or after start time");
        }

        Ok(())
    }

    pub fn new_match(&self) -> NewMatch {
        NewMatch {
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateMatchResultRequest {
    pub winner: WinnerInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReassignParticipantRequest {
    #[validate(range(min = 1))]
    pub old_fighter_id: i32,

    #[validate(range(min = 1))]
    pub new_fighter_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchResponse {
    pub match_id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    pub location: String,
}

impl From<MatchEvent> for MatchResponse {
    fn from(event: MatchEvent) -> Self {
        Self {
            duration_seconds: event.duration().map(|d| d.num_seconds()),
            match_id: event.match_id,
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantDetail {
    pub fighter_id: i32,
    pub fighter_name: String,
    pub result: Option<Outcome>,
}

/// Match with both participants; `winner` uses the same encoding as the requests
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchDetailResponse {
    #[serde(flatten)]
    pub event: MatchResponse,
    pub participants: Vec<ParticipantDetail>,
    pub winner: Option<i32>,
}

/// One entry of a fighter's match history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FighterMatchResponse {
    #[serde(flatten)]
    pub event: MatchResponse,
    pub result: Option<Outcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(fighter1_id: i32, fighter2_id: i32) -> CreateMatchRequest {
        let start = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        CreateMatchRequest {
            start_date: start,
            end_date: None,
            location: "  Paper Street  ".to_string(),
            fighter1_id,
            fighter2_id,
            winner: None,
        }
    }

    #[test]
    fn test_winner_keywords_map_to_sentinels() {
        let draw: WinnerInput = serde_json::from_str("\"draw\"").unwrap();
        let no_contest: WinnerInput = serde_json::from_str("\"no_contest\"").unwrap();
        let fighter: WinnerInput = serde_json::from_str("12").unwrap();

        assert_eq!(draw.value(), 0);
        assert_eq!(no_contest.value(), -1);
        assert_eq!(fighter.value(), 12);
    }

    #[test]
    fn test_unknown_winner_keyword_is_rejected() {
        assert!(serde_json::from_str::<WinnerInput>("\"forfeit\"").is_err());
    }

    #[test]
    fn test_self_match_is_rejected() {
        assert!(request(4, 4).validate_pairing().is_err());
        assert!(request(4, 5).validate_pairing().is_ok());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut req = request(4, 5);
        req.end_date = Some(req.start_date - chrono::TimeDelta::minutes(1));
        assert!(req.validate_pairing().is_err());

        req.end_date = Some(req.start_date);
        assert!(req.validate_pairing().is_ok());
    }

    #[test]
    fn test_location_is_trimmed() {
        assert_eq!(request(1, 2).new_match().location, "Paper Street");
    }

    #[test]
    fn test_blank_location_fails_validation() {
        let mut req = request(1, 2);
        req.location = String::new();
        assert!(req.validate().is_err());
    }
}
