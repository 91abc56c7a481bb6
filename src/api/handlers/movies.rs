/*
 * Responsibility
 * - /movies 系 CRUD handler
 * - release_date のパースは DTO 側 (dto::movies::parse_release_date)
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
            common::{CreatedResponse, DeletedResponse, UpdatedResponse},
            movies::{CreateMovieRequest, MovieListResponse, MovieResponse, UpdateMovieRequest},
        },
        extractors::Authorized,
    },
    error::AppError,
    repos::movie_repo,
    state::AppState,
};

pub async fn list_movies(
    State(state): State<AppState>,
    Authorized(_claims): Authorized,
) -> Result<Json<MovieListResponse>, AppError> {
    let rows = movie_repo::list(&state.db).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }

    let movies: Vec<MovieResponse> = rows.into_iter().map(MovieResponse::from).collect();

    Ok(Json(MovieListResponse {
        success: true,
        count: movies.len(),
        movies,
    }))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Authorized(claims): Authorized,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    let Json(req) = payload?;
    let movie = req.validate().map_err(AppError::bad_request)?;

    let id = movie_repo::create(&state.db, &movie.title, movie.release_date)
        .await
        .map_err(AppError::unprocessable)?;

    tracing::info!(movie_id = id, sub = claims.subject(), "movie created");
    Ok(Json(CreatedResponse::new(id)))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Authorized(claims): Authorized,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let changes = req.validate().map_err(AppError::bad_request)?;

    let updated = movie_repo::update(&state.db, id, changes.title.as_deref(), changes.release_date)
        .await
        .map_err(AppError::unprocessable)?;

    if !updated {
        return Err(AppError::NotFound);
    }

    tracing::info!(movie_id = id, sub = claims.subject(), "movie updated");
    Ok(Json(UpdatedResponse::new(id)))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Authorized(claims): Authorized,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = path?;

    let deleted = movie_repo::delete(&state.db, id)
        .await
        .map_err(AppError::unprocessable)?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(movie_id = id, sub = claims.subject(), "movie deleted");
    Ok(Json(DeletedResponse::new(id)))
}
