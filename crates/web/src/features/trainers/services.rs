use sqlx::PgPool;
use storage::{
    dto::trainer::{CreateTrainerRequest, TrainerDetailResponse, UpdateTrainerRequest},
    error::Result,
    models::Trainer,
    repository::{gym::GymRepository, trainer::TrainerRepository},
};

pub const LIST_LIMIT: i64 = 100;

pub async fn list_trainers(pool: &PgPool) -> Result<Vec<Trainer>> {
    let repo = TrainerRepository::new(pool);
    repo.list(LIST_LIMIT).await
}

pub async fn get_trainer(pool: &PgPool, id: i32) -> Result<Trainer> {
    let repo = TrainerRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn get_trainer_detailed(pool: &PgPool, id: i32) -> Result<TrainerDetailResponse> {
    let repo = TrainerRepository::new(pool);
    let trainer = repo.find_by_id(id).await?;

    let gym = match trainer.gym_id {
        Some(gym_id) => Some(GymRepository::new(pool).find_by_id(gym_id).await?),
        None => None,
    };
    let fighters = repo.active_fighters(id).await?;

    Ok(TrainerDetailResponse {
        trainer,
        gym,
        fighters,
    })
}

pub async fn create_trainer(pool: &PgPool, request: &CreateTrainerRequest) -> Result<Trainer> {
    let repo = TrainerRepository::new(pool);
    repo.create(request).await
}

pub async fn update_trainer(
    pool: &PgPool,
    id: i32,
    request: &UpdateTrainerRequest,
) -> Result<Trainer> {
    let repo = TrainerRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(id, &existing, request).await
}

pub async fn delete_trainer(pool: &PgPool, id: i32) -> Result<()> {
    let repo = TrainerRepository::new(pool);
    repo.delete(id).await
}
