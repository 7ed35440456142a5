// src/api/handlers/mod.rs
mod convert;
mod health;

pub use convert::convert;
pub use health::health_check;
