use sqlx::PgPool;
use storage::{
    dto::gym::{CreateGymRequest, GymDetailResponse, GymFilter, UpdateGymRequest},
    error::{Result, StorageError},
    models::Gym,
    repository::{fighter::FighterRepository, gym::GymRepository, trainer::TrainerRepository},
};

pub const LIST_LIMIT: i64 = 100;

pub async fn list_gyms(pool: &PgPool, filter: &GymFilter) -> Result<Vec<Gym>> {
    let repo = GymRepository::new(pool);
    repo.list(LIST_LIMIT, filter).await
}

pub async fn get_gym(pool: &PgPool, id: i32) -> Result<Gym> {
    let repo = GymRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn get_gym_detailed(pool: &PgPool, id: i32) -> Result<GymDetailResponse> {
    let gym = GymRepository::new(pool).find_by_id(id).await?;
    let fighters = FighterRepository::new(pool).list_by_gym(id).await?;
    let trainers = TrainerRepository::new(pool).list_by_gym(id).await?;

    Ok(GymDetailResponse {
        gym,
        fighters,
        trainers,
    })
}

pub async fn create_gym(pool: &PgPool, request: &CreateGymRequest) -> Result<Gym> {
    let repo = GymRepository::new(pool);
    repo.create(request).await
}

pub async fn update_gym(pool: &PgPool, id: i32, request: &UpdateGymRequest) -> Result<Gym> {
    let repo = GymRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(id, &existing, request).await
}

pub async fn delete_gym(pool: &PgPool, id: i32) -> Result<()> {
    let repo = GymRepository::new(pool);
    repo.delete(id).await
}

pub async fn add_fighter(pool: &PgPool, gym_id: i32, fighter_id: i32) -> Result<()> {
    GymRepository::new(pool).find_by_id(gym_id).await?;
    FighterRepository::new(pool)
        .set_gym(fighter_id, Some(gym_id))
        .await
}

pub async fn remove_fighter(pool: &PgPool, gym_id: i32, fighter_id: i32) -> Result<()> {
    let repo = FighterRepository::new(pool);
    let fighter = repo.find_by_id(fighter_id).await?;

    if fighter.gym_id != Some(gym_id) {
        return Err(StorageError::invalid(format!(
            "Fighter {fighter_id} is not a member of gym {gym_id}"
        )));
    }

    repo.set_gym(fighter_id, None).await
}

pub async fn add_trainer(pool: &PgPool, gym_id: i32, trainer_id: i32) -> Result<()> {
    GymRepository::new(pool).find_by_id(gym_id).await?;
    TrainerRepository::new(pool)
        .set_gym(trainer_id, Some(gym_id))
        .await
}

pub async fn remove_trainer(pool: &PgPool, gym_id: i32, trainer_id: i32) -> Result<()> {
    let repo = TrainerRepository::new(pool);
    let trainer = repo.find_by_id(trainer_id).await?;

    if trainer.gym_id != Some(gym_id) {
        return Err(StorageError::invalid(format!(
            "Trainer {trainer_id} does not work at gym {gym_id}"
        )));
    }

    repo.set_gym(trainer_id, None).await
}
