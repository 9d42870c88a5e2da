use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    assign_trainer, create_fighter, delete_fighter, end_assignment, get_fighter,
    get_fighter_detailed, list_assignments, list_fighter_matches, list_fighters, update_fighter,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_fighter))
        .route("/:id", put(update_fighter).delete(delete_fighter))
        .route("/:id/trainers", post(assign_trainer))
        .route("/:id/trainers/:trainer_id/end", put(end_assignment))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_fighters))
        .route("/:id", get(get_fighter))
        .route("/:id/detailed", get(get_fighter_detailed))
        .route("/:id/matches", get(list_fighter_matches))
        .route("/:id/trainers", get(list_assignments))
        .merge(protected)
}
