pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod player;
pub mod query;
pub mod tmdb;
