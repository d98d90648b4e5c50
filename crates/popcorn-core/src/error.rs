use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No movie details are loaded")]
    NotReady,

    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    #[error("Rate the movie before adding it to the list")]
    NoRating,

    #[error("{0} is already in the watched list")]
    AlreadyWatched(String),

    #[error("Duplicate watched entry {0}")]
    Duplicate(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
