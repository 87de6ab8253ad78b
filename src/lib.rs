pub mod config;
pub mod environment;
pub mod errors;
pub mod recipe;
pub mod repository;
pub mod routes;
pub mod service;
pub mod urls;
