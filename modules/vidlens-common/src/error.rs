use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidlensError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Malformed insight item: {0}")]
    MalformedInsight(String),

    #[error("Video processing failed for {video_id}: {reason}")]
    VideoProcessing { video_id: String, reason: String },

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
