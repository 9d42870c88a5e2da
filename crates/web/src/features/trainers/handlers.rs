use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::trainer::{CreateTrainerRequest, TrainerDetailResponse, UpdateTrainerRequest},
    models::Trainer,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/trainers",
    responses(
        (status = 200, description = "Most recent trainers", body = Vec<Trainer>)
    ),
    tag = "trainers"
)]
pub async fn list_trainers(State(db): State<Database>) -> Result<Response, WebError> {
    let trainers = services::list_trainers(db.pool()).await?;

    Ok(Json(trainers).into_response())
}

#[utoipa::path(
    get,
    path = "/api/trainers/{id}",
    params(
        ("id" = i32, Path, description = "Trainer id")
    ),
    responses(
        (status = 200, description = "Trainer found", body = Trainer),
        (status = 404, description = "Trainer not found")
    ),
    tag = "trainers"
)]
pub async fn get_trainer(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let trainer = services::get_trainer(db.pool(), id).await?;

    Ok(Json(trainer).into_response())
}

#[utoipa::path(
    get,
    path = "/api/trainers/{id}/detailed",
    params(
        ("id" = i32, Path, description = "Trainer id")
    ),
    responses(
        (status = 200, description = "Trainer with gym and currently coached fighters", body = TrainerDetailResponse),
        (status = 404, description = "Trainer not found")
    ),
    tag = "trainers"
)]
pub async fn get_trainer_detailed(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let trainer = services::get_trainer_detailed(db.pool(), id).await?;

    Ok(Json(trainer).into_response())
}

#[utoipa::path(
    post,
    path = "/api/trainers",
    request_body = CreateTrainerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Trainer created successfully", body = Trainer),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Unknown gym")
    ),
    tag = "trainers"
)]
pub async fn create_trainer(
    State(db): State<Database>,
    Json(req): Json<CreateTrainerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let trainer = services::create_trainer(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(trainer)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/trainers/{id}",
    params(
        ("id" = i32, Path, description = "Trainer id")
    ),
    request_body = UpdateTrainerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Trainer updated successfully", body = Trainer),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Trainer not found")
    ),
    tag = "trainers"
)]
pub async fn update_trainer(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(update_req): Json<UpdateTrainerRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_trainer(db.pool(), id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/trainers/{id}",
    params(
        ("id" = i32, Path, description = "Trainer id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Trainer deleted with their assignments"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Trainer not found")
    ),
    tag = "trainers"
)]
pub async fn delete_trainer(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_trainer(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
