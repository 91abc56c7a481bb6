pub mod actors;
pub mod common;
pub mod movies;
