use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    checkpoint::{CheckpointStore, ErrorLog},
    video::{Fetcher, RenameStrategy},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub checkpoint: usize,
    pub failures: Vec<String>,
}

#[derive(Debug)]
pub enum Outcome {
    Saved { path: PathBuf },
    Failed { url: String, reason: String },
}

/// Folds the outcome of item `idx` into `progress`. A saved item moves the
/// checkpoint to exactly `idx`; a failed one only extends the failure list.
pub fn apply(mut progress: Progress, idx: usize, outcome: &Outcome) -> Progress {
    match outcome {
        Outcome::Saved { .. } => progress.checkpoint = idx,
        Outcome::Failed { url, .. } => progress.failures.push(url.clone()),
    }
    progress
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub skipped: usize,
    pub saved: usize,
    pub failed: usize,
    pub checkpoint: usize,
}

pub struct Downloader<F> {
    fetcher: F,
    rename: RenameStrategy,
    data_dir: PathBuf,
    staging_dir: PathBuf,
    checkpoint: CheckpointStore,
    errors: ErrorLog,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(
        fetcher: F,
        rename: RenameStrategy,
        data_dir: impl Into<PathBuf>,
        staging_dir: impl Into<PathBuf>,
        checkpoint: CheckpointStore,
        errors: ErrorLog,
    ) -> Self {
        Self {
            fetcher,
            rename,
            data_dir: data_dir.into(),
            staging_dir: staging_dir.into(),
            checkpoint,
            errors,
        }
    }

    /// Downloads every url past the stored checkpoint, one at a time.
    pub async fn run(&self, urls: &[String]) -> anyhow::Result<RunSummary> {
        let start = self.checkpoint.read().with_context(|| {
            format!("loading checkpoint {}", self.checkpoint.path().display())
        })?;
        let total = urls.len();
        log::info!("Total video counts (include available and unavailable videos): {total}");
        if start > total {
            log::warn!("Checkpoint {start} is past the end of the {total} urls, nothing to do");
        } else {
            log::info!("Remaining counts: {}", total - start);
            log::info!("Start download from video with index: {}", start + 1);
        }

        let mut progress = Progress {
            checkpoint: start,
            failures: Vec::new(),
        };
        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };
        for (pos, url) in urls.iter().enumerate() {
            let idx = pos + 1;
            if idx <= start {
                summary.skipped += 1;
                continue;
            }

            log::info!("Try to download video with idx: {idx}, url: {url}");
            let outcome = self.download_one(idx, url).await;
            progress = apply(progress, idx, &outcome);
            match outcome {
                Outcome::Saved { path } => {
                    self.checkpoint.write(progress.checkpoint)?;
                    summary.saved += 1;
                    log::info!("Download finished, file name is: {}", path.display());
                }
                Outcome::Failed { reason, .. } => {
                    self.errors.rewrite(&progress.failures)?;
                    summary.failed += 1;
                    log::warn!("Failed video counts: {}", progress.failures.len());
                    log::error!("Download failed: {reason}");
                }
            }
        }

        summary.checkpoint = progress.checkpoint;
        log::info!(
            "Run finished: {} of {} saved, {} failed, {} skipped, checkpoint at {}",
            summary.saved,
            summary.total,
            summary.failed,
            summary.skipped,
            summary.checkpoint
        );
        Ok(summary)
    }

    async fn download_one(&self, idx: usize, url: &str) -> Outcome {
        match self.fetch_and_rename(idx, url).await {
            Ok(path) => Outcome::Saved { path },
            Err(e) => Outcome::Failed {
                url: url.to_string(),
                reason: format!("{e:#}"),
            },
        }
    }

    async fn fetch_and_rename(&self, idx: usize, url: &str) -> anyhow::Result<PathBuf> {
        let reported = self.fetcher.fetch(url, &self.staging_dir).await?;
        let target = self.rename.target(&self.data_dir, idx, &reported);
        // The staged file stays behind on failure, name it for the operator
        move_file(&reported, &target)
            .with_context(|| format!("staged file left at {}", reported.display()))?;
        Ok(target)
    }
}

fn move_file(from: &Path, to: &Path) -> anyhow::Result<()> {
    std::fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))
}
