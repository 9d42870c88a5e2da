use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use storage::{
    dto::{
        fighter::{
            CreateFighterRequest, FighterDetailResponse, FighterResponse, UpdateFighterRequest,
        },
        match_event::FighterMatchResponse,
        trainer::{AssignTrainerRequest, AssignmentDetail},
    },
    error::Result,
    models::TrainerAssignment,
    repository::{
        fighter::FighterRepository, gym::GymRepository, trainer::TrainerRepository,
    },
};

pub const LIST_LIMIT: i64 = 100;

pub async fn list_fighters(pool: &PgPool) -> Result<Vec<FighterResponse>> {
    let repo = FighterRepository::new(pool);
    repo.list(LIST_LIMIT).await
}

pub async fn get_fighter(pool: &PgPool, id: i32) -> Result<FighterResponse> {
    let repo = FighterRepository::new(pool);
    repo.find_with_record(id).await
}

/// Fighter with record, gym, training history and match history
pub async fn get_fighter_detailed(pool: &PgPool, id: i32) -> Result<FighterDetailResponse> {
    let repo = FighterRepository::new(pool);
    let FighterResponse { fighter, record } = repo.find_with_record(id).await?;

    let gym = match fighter.gym_id {
        Some(gym_id) => Some(GymRepository::new(pool).find_by_id(gym_id).await?),
        None => None,
    };
    let trainers = repo.assignments(id).await?;
    let matches = repo.matches(id).await?;

    Ok(FighterDetailResponse {
        fighter,
        record,
        gym,
        trainers,
        matches,
    })
}

pub async fn list_fighter_matches(pool: &PgPool, id: i32) -> Result<Vec<FighterMatchResponse>> {
    let repo = FighterRepository::new(pool);
    repo.find_by_id(id).await?;
    repo.matches(id).await
}

pub async fn create_fighter(pool: &PgPool, request: &CreateFighterRequest) -> Result<FighterResponse> {
    let repo = FighterRepository::new(pool);
    repo.create(request).await
}

pub async fn update_fighter(
    pool: &PgPool,
    id: i32,
    request: &UpdateFighterRequest,
) -> Result<FighterResponse> {
    let repo = FighterRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(id, &existing, request).await?;
    repo.find_with_record(id).await
}

pub async fn delete_fighter(pool: &PgPool, id: i32) -> Result<()> {
    let repo = FighterRepository::new(pool);
    repo.delete(id).await
}

pub async fn list_assignments(pool: &PgPool, fighter_id: i32) -> Result<Vec<AssignmentDetail>> {
    let repo = FighterRepository::new(pool);
    repo.find_by_id(fighter_id).await?;
    repo.assignments(fighter_id).await
}

pub async fn assign_trainer(
    pool: &PgPool,
    fighter_id: i32,
    request: &AssignTrainerRequest,
) -> Result<TrainerAssignment> {
    FighterRepository::new(pool).find_by_id(fighter_id).await?;
    let trainers = TrainerRepository::new(pool);
    trainers.find_by_id(request.trainer_id).await?;

    let start_date = request.start_date.unwrap_or_else(today);
    trainers.assign(fighter_id, request.trainer_id, start_date).await
}

pub async fn end_assignment(
    pool: &PgPool,
    fighter_id: i32,
    trainer_id: i32,
    end_date: Option<NaiveDate>,
) -> Result<TrainerAssignment> {
    let trainers = TrainerRepository::new(pool);
    trainers
        .end_assignment(fighter_id, trainer_id, end_date.unwrap_or_else(today))
        .await
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
