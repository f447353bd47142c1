pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod fanout;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use error::ApiError;
pub use routes::app;
pub use state::AppState;
