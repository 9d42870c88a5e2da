use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    add_fighter, add_trainer, create_gym, delete_gym, get_gym, get_gym_detailed, list_gyms,
    remove_fighter, remove_trainer, update_gym,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_gym))
        .route("/:id", put(update_gym).delete(delete_gym))
        .route("/:id/fighters/:fighter_id", put(add_fighter).delete(remove_fighter))
        .route("/:id/trainers/:trainer_id", put(add_trainer).delete(remove_trainer))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_gyms))
        .route("/:id", get(get_gym))
        .route("/:id/detailed", get(get_gym_detailed))
        .merge(protected)
}
