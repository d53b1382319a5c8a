pub mod ytdlp;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
pub use ytdlp::YtDlp;

const VIDEO_EXT: &str = "mp4";

#[async_trait]
pub trait Fetcher {
    /// Downloads one video into `staging_dir` and returns the path of the
    /// file it wrote.
    async fn fetch(&self, url: &str, staging_dir: &Path) -> anyhow::Result<PathBuf>;
}

/// How a fetched file is named inside the data folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameStrategy {
    #[default]
    Indexed,
    /// The reported file name with its trailing extension stripped, plus `.mp4`.
    #[allow(dead_code)]
    StripSuffix,
}

impl RenameStrategy {
    pub fn target(self, data_dir: &Path, idx: usize, reported: &Path) -> PathBuf {
        match self {
            RenameStrategy::Indexed => data_dir.join(format!("{idx}.{VIDEO_EXT}")),
            RenameStrategy::StripSuffix => {
                let stem = reported
                    .file_stem()
                    .map_or_else(|| idx.to_string(), |s| s.to_string_lossy().into_owned());
                data_dir.join(format!("{stem}.{VIDEO_EXT}"))
            }
        }
    }
}
