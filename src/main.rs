mod batch;
mod checkpoint;
mod config;
mod errors;
mod manifest;
mod video;

use anyhow::Context;

use crate::{
    batch::Downloader,
    checkpoint::{CheckpointStore, ErrorLog},
    config::Config,
    video::{RenameStrategy, YtDlp},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config {
        use_proxy: false,
        rename: RenameStrategy::Indexed,
        ..Config::default()
    };
    config::prepare(&config)?;

    let manifest = manifest::load(&config.manifest)
        .with_context(|| format!("loading {}", config.manifest.display()))?;
    if manifest.is_empty() {
        log::warn!("Manifest lists no videos");
    }

    let fetcher = YtDlp::new(&config.ytdlp_bin, config.proxy())?;
    let downloader = Downloader::new(
        fetcher,
        config.rename,
        &config.data_dir,
        &config.staging_dir,
        CheckpointStore::new(&config.checkpoint_file),
        ErrorLog::new(&config.error_file),
    );
    let summary = downloader.run(&manifest.urls()).await?;
    if summary.failed > 0 {
        log::warn!(
            "{} videos failed, see {}",
            summary.failed,
            config.error_file.display()
        );
    }
    Ok(())
}
