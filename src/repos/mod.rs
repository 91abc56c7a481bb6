pub mod actor_repo;
pub mod error;
pub mod movie_repo;
