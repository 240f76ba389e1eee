use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error while opening file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Json error: {0}")]
    Json(#[from] json::Error),
    #[error("Couldn't find {0}")]
    MissingKey(&'static str),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}
