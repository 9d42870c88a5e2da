use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::StorageError;

/// Result label of one fighter in one match. "Not yet recorded" is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Outcome {
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "loss")]
    Loss,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "no contest")]
    NoContest,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Draw => "draw",
            Outcome::NoContest => "no contest",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            "draw" => Ok(Outcome::Draw),
            "no contest" => Ok(Outcome::NoContest),
            other => Err(StorageError::invalid(format!("Unknown outcome '{other}'"))),
        }
    }
}

/// Raw `participants` row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub match_id: i32,
    pub fighter_id: i32,
    pub result: Option<String>,
}

impl Participant {
    pub fn outcome(&self) -> Result<Option<Outcome>, StorageError> {
        self.result.as_deref().map(Outcome::from_str).transpose()
    }
}
