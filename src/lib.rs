// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod errors;
pub mod models;
pub mod patch;
pub mod preprocess;
pub mod resolver;
pub mod runner;
pub mod sandbox;
