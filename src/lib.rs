pub mod commands;
pub mod config;
pub mod data;
pub mod download_path;
pub mod error;
pub mod logging;
pub mod models;
pub mod safety;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing::info;

pub use config::DriveConfig;
pub use error::AppError;
pub use state::AppState;

use data::http::HttpFileService;

/// Builds application state backed by the HTTP file service described by `config`.
pub fn connect(config: &DriveConfig) -> Result<AppState, AppError> {
    let service = HttpFileService::from_config(config)?;
    info!(api = config.base_url(), "connected to file service");
    Ok(AppState::new(Arc::new(service)))
}
