use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{transformer} does not perform deserialization")]
    Unsupported { transformer: &'static str },

    #[error("aliases of {type_key} map {sources:?} onto the same key {target:?}")]
    AliasConflict {
        type_key: String,
        target: String,
        sources: Vec<String>,
    },

    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walking mapping directory: {0}")]
    Walk(#[from] walkdir::Error),
}
