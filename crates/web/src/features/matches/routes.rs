use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    create_match, delete_match, get_match, list_matches, reassign_participant,
    update_match_result,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_match))
        .route("/:id", delete(delete_match))
        .route("/:id/result", put(update_match_result))
        .route("/:id/participants", put(reassign_participant))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_matches))
        .route("/:id", get(get_match))
        .merge(protected)
}
