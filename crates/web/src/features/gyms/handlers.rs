use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::gym::{CreateGymRequest, GymDetailResponse, GymFilter, UpdateGymRequest},
    models::Gym,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/gyms",
    params(GymFilter),
    responses(
        (status = 200, description = "Most recent gyms within the reputation range", body = Vec<Gym>),
        (status = 400, description = "Invalid reputation range")
    ),
    tag = "gyms"
)]
pub async fn list_gyms(
    State(db): State<Database>,
    Query(filter): Query<GymFilter>,
) -> Result<Response, WebError> {
    filter.validate()?;

    let gyms = services::list_gyms(db.pool(), &filter).await?;

    Ok(Json(gyms).into_response())
}

#[utoipa::path(
    get,
    path = "/api/gyms/{id}",
    params(
        ("id" = i32, Path, description = "Gym id")
    ),
    responses(
        (status = 200, description = "Gym found", body = Gym),
        (status = 404, description = "Gym not found")
    ),
    tag = "gyms"
)]
pub async fn get_gym(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let gym = services::get_gym(db.pool(), id).await?;

    Ok(Json(gym).into_response())
}

#[utoipa::path(
    get,
    path = "/api/gyms/{id}/detailed",
    params(
        ("id" = i32, Path, description = "Gym id")
    ),
    responses(
        (status = 200, description = "Gym with its fighters and trainers", body = GymDetailResponse),
        (status = 404, description = "Gym not found")
    ),
    tag = "gyms"
)]
pub async fn get_gym_detailed(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let gym = services::get_gym_detailed(db.pool(), id).await?;

    Ok(Json(gym).into_response())
}

#[utoipa::path(
    post,
    path = "/api/gyms",
    request_body = CreateGymRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Gym created successfully", body = Gym),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Gym already exists at this location")
    ),
    tag = "gyms"
)]
pub async fn create_gym(
    State(db): State<Database>,
    Json(req): Json<CreateGymRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let gym = services::create_gym(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(gym)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/gyms/{id}",
    params(
        ("id" = i32, Path, description = "Gym id")
    ),
    request_body = UpdateGymRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Gym updated successfully", body = Gym),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Gym not found")
    ),
    tag = "gyms"
)]
pub async fn update_gym(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(update_req): Json<UpdateGymRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_gym(db.pool(), id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/gyms/{id}",
    params(
        ("id" = i32, Path, description = "Gym id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Gym deleted; members stay without a gym"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Gym not found")
    ),
    tag = "gyms"
)]
pub async fn delete_gym(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_gym(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/gyms/{id}/fighters/{fighter_id}",
    params(
        ("id" = i32, Path, description = "Gym id"),
        ("fighter_id" = i32, Path, description = "Fighter id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Fighter moved into the gym"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Gym or fighter not found")
    ),
    tag = "gyms"
)]
pub async fn add_fighter(
    State(db): State<Database>,
    Path((id, fighter_id)): Path<(i32, i32)>,
) -> Result<Response, WebError> {
    services::add_fighter(db.pool(), id, fighter_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/gyms/{id}/fighters/{fighter_id}",
    params(
        ("id" = i32, Path, description = "Gym id"),
        ("fighter_id" = i32, Path, description = "Fighter id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Fighter left the gym"),
        (status = 400, description = "Fighter is not at this gym"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Gym or fighter not found")
    ),
    tag = "gyms"
)]
pub async fn remove_fighter(
    State(db): State<Database>,
    Path((id, fighter_id)): Path<(i32, i32)>,
) -> Result<Response, WebError> {
    services::remove_fighter(db.pool(), id, fighter_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/gyms/{id}/trainers/{trainer_id}",
    params(
        ("id" = i32, Path, description = "Gym id"),
        ("trainer_id" = i32, Path, description = "Trainer id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Trainer moved into the gym"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Gym or trainer not found")
    ),
    tag = "gyms"
)]
pub async fn add_trainer(
    State(db): State<Database>,
    Path((id, trainer_id)): Path<(i32, i32)>,
) -> Result<Response, WebError> {
    services::add_trainer(db.pool(), id, trainer_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/gyms/{id}/trainers/{trainer_id}",
    params(
        ("id" = i32, Path, description = "Gym id"),
        ("trainer_id" = i32, Path, description = "Trainer id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Trainer left the gym"),
        (status = 400, description = "Trainer is not at this gym"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Gym or trainer not found")
    ),
    tag = "gyms"
)]
pub async fn remove_trainer(
    State(db): State<Database>,
    Path((id, trainer_id)): Path<(i32, i32)>,
) -> Result<Response, WebError> {
    services::remove_trainer(db.pool(), id, trainer_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
