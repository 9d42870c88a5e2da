use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use features::{fighters, gyms, matches, trainers};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        gyms::handlers::list_gyms,
        gyms::handlers::get_gym,
        gyms::handlers::get_gym_detailed,
        gyms::handlers::create_gym,
        gyms::handlers::update_gym,
        gyms::handlers::delete_gym,
        gyms::handlers::add_fighter,
        gyms::handlers::remove_fighter,
        gyms::handlers::add_trainer,
        gyms::handlers::remove_trainer,
        fighters::handlers::list_fighters,
        fighters::handlers::get_fighter,
        fighters::handlers::get_fighter_detailed,
        fighters::handlers::list_fighter_matches,
        fighters::handlers::create_fighter,
        fighters::handlers::update_fighter,
        fighters::handlers::delete_fighter,
        fighters::handlers::list_assignments,
        fighters::handlers::assign_trainer,
        fighters::handlers::end_assignment,
        trainers::handlers::list_trainers,
        trainers::handlers::get_trainer,
        trainers::handlers::get_trainer_detailed,
        trainers::handlers::create_trainer,
        trainers::handlers::update_trainer,
        trainers::handlers::delete_trainer,
        matches::handlers::list_matches,
        matches::handlers::get_match,
        matches::handlers::create_match,
        matches::handlers::update_match_result,
        matches::handlers::reassign_participant,
        matches::handlers::delete_match,
    ),
    components(
        schemas(
            storage::dto::gym::CreateGymRequest,
            storage::dto::gym::UpdateGymRequest,
            storage::dto::gym::GymDetailResponse,
            storage::dto::fighter::CreateFighterRequest,
            storage::dto::fighter::UpdateFighterRequest,
            storage::dto::fighter::FighterResponse,
            storage::dto::fighter::FighterDetailResponse,
            storage::dto::fighter::RecordSummary,
            storage::dto::trainer::CreateTrainerRequest,
            storage::dto::trainer::UpdateTrainerRequest,
            storage::dto::trainer::TrainerDetailResponse,
            storage::dto::trainer::AssignTrainerRequest,
            storage::dto::trainer::EndAssignmentRequest,
            storage::dto::trainer::AssignmentDetail,
            storage::dto::match_event::CreateMatchRequest,
            storage::dto::match_event::UpdateMatchResultRequest,
            storage::dto::match_event::ReassignParticipantRequest,
            storage::dto::match_event::WinnerInput,
            storage::dto::match_event::ResultKeyword,
            storage::dto::match_event::MatchResponse,
            storage::dto::match_event::MatchDetailResponse,
            storage::dto::match_event::ParticipantDetail,
            storage::dto::match_event::FighterMatchResponse,
            storage::models::Gym,
            storage::models::Fighter,
            storage::models::Trainer,
            storage::models::TrainerAssignment,
            storage::models::Outcome,
        )
    ),
    tags(
        (name = "gyms", description = "Gyms and their members"),
        (name = "fighters", description = "Fighters, records and training history"),
        (name = "trainers", description = "Trainers"),
        (name = "matches", description = "Matches and their results"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn api_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .nest("/gyms", gyms::routes::routes(api_keys.clone()))
        .nest("/fighters", fighters::routes::routes(api_keys.clone()))
        .nest("/trainers", trainers::routes::routes(api_keys.clone()))
        .nest("/matches", matches::routes::routes(api_keys))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting fight club API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "Database connection established"
    );

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty; every mutating endpoint will answer 401");
    }

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes(api_keys))
        .layer(CorsLayer::permissive())
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
