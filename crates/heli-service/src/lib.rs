//! HeLI Service
//!
//! HTTP front end for line-based language identification. Text posted to
//! `/process` is split into lines, each line is ranked by the HeLI process,
//! and the results come back grouped by language with character offsets.

pub mod cli;
pub mod config;
pub mod error;
pub mod params;
pub mod routes;
pub mod service;

pub use cli::Cli;
pub use config::{ServerConfig, ServiceConfig};
pub use error::AppError;
pub use routes::create_router;
pub use service::{AppState, LidService};
