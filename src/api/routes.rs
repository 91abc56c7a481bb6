/*
 * Responsibility
 * - /api の URL 構造を定義
 * - route ごとに必要な permission をここで決める (middleware::auth::protect)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    actors::{create_actor, delete_actor, list_actors, update_actor},
    health::status,
    login::login,
    movies::{create_movie, delete_movie, list_movies, update_movie},
};
use crate::middleware::auth::protect;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/auth", get(login))
        .route(
            "/actors",
            protect(get(list_actors), state, "get:actors")
                .merge(protect(post(create_actor), state, "post:actors")),
        )
        .route(
            "/actors/{id}",
            protect(patch(update_actor), state, "patch:actors")
                .merge(protect(delete(delete_actor), state, "delete:actors")),
        )
        .route(
            "/movies",
            protect(get(list_movies), state, "get:movies")
                .merge(protect(post(create_movie), state, "post:movies")),
        )
        .route(
            "/movies/{id}",
            protect(patch(update_movie), state, "patch:movies")
                .merge(protect(delete(delete_movie), state, "delete:movies")),
        )
}
