use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::{errors::FetchError, video::Fetcher};

// Best single-file quality, the id as the temporary name.
const FORMAT: &str = "best";
const OUTPUT_TEMPLATE: &str = "%(id)s.%(ext)s";
const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {percent}% ({msg})";

/// Drives the `yt-dlp` program, one child process per video.
pub struct YtDlp {
    bin: String,
    proxy: Option<String>,
    progress: regex::Regex,
    style: ProgressStyle,
}

impl YtDlp {
    pub fn new(bin: &str, proxy: Option<&str>) -> anyhow::Result<YtDlp> {
        let progress = regex::Regex::new(r"^\[download\]\s+(\d+)(?:\.\d+)?%")?;
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)?
            .progress_chars("=> ");
        Ok(YtDlp {
            bin: bin.to_owned(),
            proxy: proxy.map(str::to_owned),
            progress,
            style,
        })
    }

    fn args(&self, url: &str, staging_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            FORMAT.into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--newline".into(),
            "--progress".into(),
            "-o".into(),
            staging_dir.join(OUTPUT_TEMPLATE).into_os_string(),
            // Printed once the file is in its final place
            "--print".into(),
            "after_move:filepath".into(),
        ];
        if let Some(proxy) = &self.proxy {
            args.push("--proxy".into());
            args.push(proxy.into());
        }
        args.push("--".into());
        args.push(url.into());
        args
    }

    /// Whole percentage of a `[download]  42.0% of ...` line.
    fn percent(&self, line: &str) -> Option<u64> {
        self.progress
            .captures(line)
            .and_then(|caps| caps[1].parse::<u64>().ok())
    }
}

#[async_trait]
impl Fetcher for YtDlp {
    async fn fetch(&self, url: &str, staging_dir: &Path) -> anyhow::Result<PathBuf> {
        let mut child = Command::new(&self.bin)
            .args(self.args(url, staging_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FetchError::Spawn(self.bin.clone(), e))?;

        // Drain stderr on the side so a chatty child can not block on it
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut text = String::new();
            if let Some(mut stderr) = stderr {
                if let Err(e) = stderr.read_to_string(&mut text).await {
                    log::warn!("Failed to read yt-dlp stderr: {e}");
                    text.push_str(&format!("<stderr unreadable: {e}>"));
                }
            }
            text
        });

        let pb = ProgressBar::new(100);
        pb.set_style(self.style.clone());
        pb.set_message(url.to_string());

        let mut reported = None;
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some(pct) = self.percent(line) {
                    pb.set_position(pct.min(100));
                } else if !line.starts_with('[') {
                    reported = Some(PathBuf::from(line));
                }
            }
        }

        pb.finish_and_clear();

        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            return Err(FetchError::Exit {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }
        let reported = reported.ok_or(FetchError::NoOutput)?;
        log::debug!("yt-dlp wrote {}", reported.display());
        Ok(reported)
    }
}
