use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    create_trainer, delete_trainer, get_trainer, get_trainer_detailed, list_trainers,
    update_trainer,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_trainer))
        .route("/:id", put(update_trainer).delete(delete_trainer))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_trainers))
        .route("/:id", get(get_trainer))
        .route("/:id/detailed", get(get_trainer_detailed))
        .merge(protected)
}
