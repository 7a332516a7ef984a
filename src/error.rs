use thiserror::Error;

use crate::{
    database::StoreError,
    messaging::PublisherError,
    model::{error::RatingError, rating_tracker::TrackerError}
};

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Publisher(#[from] PublisherError),

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Contest {0} has not ended; pass --force to commit anyway")]
    ContestNotFinished(i32)
}
