pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod session;
pub mod views;

pub use auth::Principal;
pub use error::PorticoError;
pub use router::{AppState, portico_router};
