use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::match_event::{
        CreateMatchRequest, MatchDetailResponse, MatchResponse, ReassignParticipantRequest,
        UpdateMatchResultRequest,
    },
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/matches",
    responses(
        (status = 200, description = "Most recent matches", body = Vec<MatchResponse>)
    ),
    tag = "matches"
)]
pub async fn list_matches(State(db): State<Database>) -> Result<Response, WebError> {
    let matches = services::list_matches(db.pool()).await?;

    Ok(Json(matches).into_response())
}

#[utoipa::path(
    get,
    path = "/api/matches/{id}",
    params(
        ("id" = i32, Path, description = "Match id")
    ),
    responses(
        (status = 200, description = "Match with both participants", body = MatchDetailResponse),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn get_match(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let detail = services::get_match(db.pool(), id).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    post,
    path = "/api/matches",
    request_body = CreateMatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Match created and records credited", body = MatchDetailResponse),
        (status = 400, description = "Self-match, bad location or end before start"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Fighter not found")
    ),
    tag = "matches"
)]
pub async fn create_match(
    State(db): State<Database>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    req.validate_pairing()
        .map_err(|msg| WebError::BadRequest(msg.to_string()))?;

    let detail = services::create_match(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/matches/{id}/result",
    params(
        ("id" = i32, Path, description = "Match id")
    ),
    request_body = UpdateMatchResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Result recorded and records reconciled", body = MatchDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Match does not have exactly two participants")
    ),
    tag = "matches"
)]
pub async fn update_match_result(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateMatchResultRequest>,
) -> Result<Response, WebError> {
    let detail = services::update_match_result(db.pool(), id, req.winner).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    put,
    path = "/api/matches/{id}/participants",
    params(
        ("id" = i32, Path, description = "Match id")
    ),
    request_body = ReassignParticipantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participant replaced and outcome moved", body = MatchDetailResponse),
        (status = 400, description = "Invalid replacement"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Match, participant or fighter not found")
    ),
    tag = "matches"
)]
pub async fn reassign_participant(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(req): Json<ReassignParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let detail = services::reassign_participant(db.pool(), id, &req).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/matches/{id}",
    params(
        ("id" = i32, Path, description = "Match id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Match deleted and records debited"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn delete_match(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_match(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
