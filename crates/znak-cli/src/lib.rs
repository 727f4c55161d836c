pub mod commands;
pub mod trace_init;

use std::io;

use znak_core::catalogue::CatalogueError;
use znak_core::settings::SettingsError;
use znak_core::sign::QueryError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Catalogue(#[from] CatalogueError),
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("video directory: {0}")]
    Videos(io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
