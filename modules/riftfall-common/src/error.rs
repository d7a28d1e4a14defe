use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiftfallError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Game state source error: {0}")]
    Source(String),

    #[error("News store error: {0}")]
    Store(String),

    #[error("News store conflict on {path}: another run wrote it first")]
    StoreConflict { path: String },

    #[error("World reset error: {0}")]
    Reset(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
