/*
 * Responsibility
 * - /actors 系 CRUD handler
 * - 認可は route_layer (permission gate) で済んでいる前提。handler は Authorized を受け取る
 * - 書き込み失敗は 422、存在しない id は 404
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    api::{
        dto::{
            actors::{ActorListResponse, ActorResponse, CreateActorRequest, UpdateActorRequest},
            common::{CreatedResponse, DeletedResponse, UpdatedResponse},
        },
        extractors::Authorized,
    },
    error::AppError,
    repos::actor_repo,
    state::AppState,
};

pub async fn list_actors(
    State(state): State<AppState>,
    Authorized(_claims): Authorized,
) -> Result<Json<ActorListResponse>, AppError> {
    let rows = actor_repo::list(&state.db).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }

    let actors: Vec<ActorResponse> = rows.into_iter().map(ActorResponse::from).collect();

    Ok(Json(ActorListResponse {
        success: true,
        count: actors.len(),
        actors,
    }))
}

pub async fn create_actor(
    State(state): State<AppState>,
    Authorized(claims): Authorized,
    payload: Result<Json<CreateActorRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    let Json(req) = payload?;
    let actor = req.validate().map_err(AppError::bad_request)?;

    let id = actor_repo::create(&state.db, &actor.name, actor.age, &actor.gender)
        .await
        .map_err(AppError::unprocessable)?;

    tracing::info!(actor_id = id, sub = claims.subject(), "actor created");
    Ok(Json(CreatedResponse::new(id)))
}

pub async fn update_actor(
    State(state): State<AppState>,
    Authorized(claims): Authorized,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateActorRequest>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let changes = req.validate().map_err(AppError::bad_request)?;

    let updated = actor_repo::update(
        &state.db,
        id,
        changes.name.as_deref(),
        changes.age,
        changes.gender.as_deref(),
    )
    .await
    .map_err(AppError::unprocessable)?;

    if !updated {
        return Err(AppError::NotFound);
    }

    tracing::info!(actor_id = id, sub = claims.subject(), "actor updated");
    Ok(Json(UpdatedResponse::new(id)))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    Authorized(claims): Authorized,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = path?;

    let deleted = actor_repo::delete(&state.db, id)
        .await
        .map_err(AppError::unprocessable)?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(actor_id = id, sub = claims.subject(), "actor deleted");
    Ok(Json(DeletedResponse::new(id)))
}
