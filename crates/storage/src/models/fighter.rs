use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const WEIGHT_CLASSES: &[&str] = &[
    "Strawweight",
    "Flyweight",
    "Bantamweight",
    "Featherweight",
    "Lightweight",
    "Welterweight",
    "Middleweight",
    "Light Heavyweight",
    "Heavyweight",
    "Catchweight",
];

pub const FIGHTER_STATUSES: &[&str] = &["active", "retired", "suspended"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fighter {
    pub fighter_id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub weight_class: String,
    pub height: Option<Decimal>,
    pub age: i32,
    pub nationality: Option<String>,
    pub status: String,
    pub gym_id: Option<i32>,
}
