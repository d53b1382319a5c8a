use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}", .0.display())]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Manifest is not valid JSON")]
    Parse(#[from] json::Error),

    #[error("Manifest has no \"videos\" object")]
    MissingVideos,

    #[error("Category {0} is not a list of video ids")]
    BadCategory(String),

    #[error("Category {0} contains an entry that is not a video id")]
    BadVideoId(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("Checkpoint file {} is missing", .0.display())]
    Missing(PathBuf),

    #[error("Checkpoint file holds {0:?}, expected a non-negative integer")]
    Corrupt(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to start {0}")]
    Spawn(String, #[source] std::io::Error),

    #[error("yt-dlp exited with {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("yt-dlp did not report an output file")]
    NoOutput,
}
