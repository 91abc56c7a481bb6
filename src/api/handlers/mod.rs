pub mod actors;
pub mod health;
pub mod login;
pub mod movies;
