use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Denormalized tally of a fighter's scored outcomes.
///
/// Only the match outcome engine writes these rows; the counters always equal the
/// number of the fighter's participant rows holding `win`, `loss` and `draw`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FighterRecord {
    pub fighter_id: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
}

impl FighterRecord {
    pub fn zeroed(fighter_id: i32) -> Self {
        Self {
            fighter_id,
            ..Self::default()
        }
    }
}
