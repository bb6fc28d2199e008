//! Client side of MetaMoviex: the application shell that owns the logged-in
//! user, the listing pages' filter and pagination state, and the home feed.

pub mod bridge;
pub mod home;
pub mod listing;
pub mod search;
pub mod shell;
pub mod store;

use metamoviex_metadata::MetadataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("bridge returned {status}: {message}")]
    Bridge { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
