// API routes and handlers

pub mod clients;
pub mod error;
pub mod health;
pub mod income;
pub mod late_fees;
pub mod packages;
pub mod pricing;
pub mod routes;
pub mod sessions;
pub mod trainers;

pub use error::ApiError;
pub use routes::{create_routes, AppState};
