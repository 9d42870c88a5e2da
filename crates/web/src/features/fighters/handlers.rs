use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        fighter::{
            CreateFighterRequest, FighterDetailResponse, FighterResponse, UpdateFighterRequest,
        },
        match_event::FighterMatchResponse,
        trainer::{AssignTrainerRequest, AssignmentDetail, EndAssignmentRequest},
    },
    models::TrainerAssignment,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/fighters",
    responses(
        (status = 200, description = "Most recent fighters with their records", body = Vec<FighterResponse>)
    ),
    tag = "fighters"
)]
pub async fn list_fighters(State(db): State<Database>) -> Result<Response, WebError> {
    let fighters = services::list_fighters(db.pool()).await?;

    Ok(Json(fighters).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fighters/{id}",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    responses(
        (status = 200, description = "Fighter found", body = FighterResponse),
        (status = 404, description = "Fighter not found")
    ),
    tag = "fighters"
)]
pub async fn get_fighter(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let fighter = services::get_fighter(db.pool(), id).await?;

    Ok(Json(fighter).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fighters/{id}/detailed",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    responses(
        (status = 200, description = "Fighter with gym, trainers and match history", body = FighterDetailResponse),
        (status = 404, description = "Fighter not found")
    ),
    tag = "fighters"
)]
pub async fn get_fighter_detailed(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let fighter = services::get_fighter_detailed(db.pool(), id).await?;

    Ok(Json(fighter).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fighters/{id}/matches",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    responses(
        (status = 200, description = "Matches the fighter took part in, newest first", body = Vec<FighterMatchResponse>),
        (status = 404, description = "Fighter not found")
    ),
    tag = "fighters"
)]
pub async fn list_fighter_matches(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let matches = services::list_fighter_matches(db.pool(), id).await?;

    Ok(Json(matches).into_response())
}

#[utoipa::path(
    post,
    path = "/api/fighters",
    request_body = CreateFighterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Fighter registered with an empty record", body = FighterResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Unknown gym")
    ),
    tag = "fighters"
)]
pub async fn create_fighter(
    State(db): State<Database>,
    Json(req): Json<CreateFighterRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let fighter = services::create_fighter(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(fighter)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/fighters/{id}",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    request_body = UpdateFighterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Fighter updated successfully", body = FighterResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Fighter not found")
    ),
    tag = "fighters"
)]
pub async fn update_fighter(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(update_req): Json<UpdateFighterRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_fighter(db.pool(), id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/fighters/{id}",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Fighter deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Fighter not found")
    ),
    tag = "fighters"
)]
pub async fn delete_fighter(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_fighter(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/fighters/{id}/trainers",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    responses(
        (status = 200, description = "Training history, active assignments first", body = Vec<AssignmentDetail>),
        (status = 404, description = "Fighter not found")
    ),
    tag = "fighters"
)]
pub async fn list_assignments(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let assignments = services::list_assignments(db.pool(), id).await?;

    Ok(Json(assignments).into_response())
}

#[utoipa::path(
    post,
    path = "/api/fighters/{id}/trainers",
    params(
        ("id" = i32, Path, description = "Fighter id")
    ),
    request_body = AssignTrainerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Trainer assigned", body = TrainerAssignment),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Fighter or trainer not found"),
        (status = 409, description = "Trainer already assigned")
    ),
    tag = "fighters"
)]
pub async fn assign_trainer(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(req): Json<AssignTrainerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let assignment = services::assign_trainer(db.pool(), id, &req).await?;

    Ok((StatusCode::CREATED, Json(assignment)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/fighters/{id}/trainers/{trainer_id}/end",
    params(
        ("id" = i32, Path, description = "Fighter id"),
        ("trainer_id" = i32, Path, description = "Trainer id")
    ),
    request_body = EndAssignmentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Assignment ended", body = TrainerAssignment),
        (status = 400, description = "End date before start date"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No active assignment")
    ),
    tag = "fighters"
)]
pub async fn end_assignment(
    State(db): State<Database>,
    Path((id, trainer_id)): Path<(i32, i32)>,
    Json(req): Json<EndAssignmentRequest>,
) -> Result<Response, WebError> {
    let assignment = services::end_assignment(db.pool(), id, trainer_id, req.end_date).await?;

    Ok(Json(assignment).into_response())
}
