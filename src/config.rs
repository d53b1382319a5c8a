use std::path::PathBuf;

use anyhow::Context;

use crate::video::RenameStrategy;

const MANIFEST_FILE: &str = "./MUSIC_dataset/MUSIC_solo_videos.json";
const DATA_DIR: &str = "./data";
const CHECKPOINT_FILE: &str = "./idx.out";
const ERROR_FILE: &str = "./errors.txt";
const LOCAL_PROXY: &str = "http://127.0.0.1:7890";
const YTDLP_BIN: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct Config {
    pub manifest: PathBuf,
    pub data_dir: PathBuf,
    pub checkpoint_file: PathBuf,
    pub error_file: PathBuf,
    // yt-dlp writes here before the rename into data_dir
    pub staging_dir: PathBuf,
    pub use_proxy: bool,
    pub proxy: String,
    pub rename: RenameStrategy,
    pub ytdlp_bin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(MANIFEST_FILE),
            data_dir: PathBuf::from(DATA_DIR),
            checkpoint_file: PathBuf::from(CHECKPOINT_FILE),
            error_file: PathBuf::from(ERROR_FILE),
            staging_dir: PathBuf::from("."),
            use_proxy: false,
            proxy: LOCAL_PROXY.to_string(),
            rename: RenameStrategy::Indexed,
            ytdlp_bin: YTDLP_BIN.to_string(),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Default switches with every file laid out under `root`.
    pub fn rooted_at(root: &std::path::Path) -> Self {
        Self {
            manifest: root.join("manifest.json"),
            data_dir: root.join("data"),
            checkpoint_file: root.join("idx.out"),
            error_file: root.join("errors.txt"),
            staging_dir: root.to_path_buf(),
            ..Self::default()
        }
    }
}

impl Config {
    /// The proxy address yt-dlp should route through, if any.
    pub fn proxy(&self) -> Option<&str> {
        self.use_proxy.then_some(self.proxy.as_str())
    }
}

/// Creates the data folder, a zeroed checkpoint and an empty error list
/// when they are absent. Existing files are left alone.
pub fn prepare(config: &Config) -> anyhow::Result<()> {
    if !config.data_dir.exists() {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("creating {}", config.data_dir.display()))?;
        log::info!("Created data folder {}", config.data_dir.display());
    }
    if !config.checkpoint_file.exists() {
        std::fs::write(&config.checkpoint_file, "0")
            .with_context(|| format!("creating {}", config.checkpoint_file.display()))?;
        log::info!(
            "Created checkpoint file {}: used for restoring downloads",
            config.checkpoint_file.display()
        );
    }
    if !config.error_file.exists() {
        std::fs::File::create(&config.error_file)
            .with_context(|| format!("creating {}", config.error_file.display()))?;
        log::info!(
            "Created error list {}: used for finding unavailable videos",
            config.error_file.display()
        );
    }
    Ok(())
}
