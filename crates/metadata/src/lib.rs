pub mod detail;
pub mod discover;
pub mod format;
pub mod models;
pub mod provider;
pub mod tmdb;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
    #[error("decode error at {path}: {message}")]
    Decode { path: String, message: String },
}
