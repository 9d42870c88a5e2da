use sqlx::PgPool;
use storage::{
    dto::match_event::{
        CreateMatchRequest, MatchDetailResponse, MatchResponse, ReassignParticipantRequest,
        WinnerInput,
    },
    error::Result,
    gateway::PgGateway,
    repository::match_event::MatchEventRepository,
    services::match_engine::MatchEngine,
};

pub const LIST_LIMIT: i64 = 100;

fn engine(pool: &PgPool) -> MatchEngine<PgGateway> {
    MatchEngine::new(PgGateway::new(pool.clone()))
}

pub async fn list_matches(pool: &PgPool) -> Result<Vec<MatchResponse>> {
    let repo = MatchEventRepository::new(pool);
    let events = repo.list(LIST_LIMIT).await?;

    Ok(events.into_iter().map(MatchResponse::from).collect())
}

pub async fn get_match(pool: &PgPool, id: i32) -> Result<MatchDetailResponse> {
    let repo = MatchEventRepository::new(pool);
    repo.find_detailed(id).await
}

pub async fn create_match(pool: &PgPool, request: &CreateMatchRequest) -> Result<MatchDetailResponse> {
    let match_id = engine(pool).create_match(request).await?;
    get_match(pool, match_id).await
}

pub async fn update_match_result(
    pool: &PgPool,
    id: i32,
    winner: WinnerInput,
) -> Result<MatchDetailResponse> {
    engine(pool).update_match_result(id, winner.value()).await?;
    get_match(pool, id).await
}

pub async fn reassign_participant(
    pool: &PgPool,
    id: i32,
    request: &ReassignParticipantRequest,
) -> Result<MatchDetailResponse> {
    engine(pool)
        .reassign_participant(id, request.old_fighter_id, request.new_fighter_id)
        .await?;
    get_match(pool, id).await
}

pub async fn delete_match(pool: &PgPool, id: i32) -> Result<()> {
    engine(pool).delete_match(id).await
}
