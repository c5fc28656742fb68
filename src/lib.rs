pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::{AppConfig, CliArgs};
pub use crate::core::verify::{EngineSettings, VerificationEngine};
pub use crate::server::{build_router, AppState};
pub use crate::utils::error::{ClientInputError, FaceCheckError, Result};
