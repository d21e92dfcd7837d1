//! Crate error type.

use thiserror::Error;

use crate::model::LocationId;

#[derive(Debug, Error)]
pub enum Error {
    /// Two or more locations were given the same custom rank.
    #[error("custom rank {rank} is assigned to more than one location: {ids:?}")]
    DuplicateRank { rank: i64, ids: Vec<LocationId> },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
