//! Infrastructure implementation of the `Downloader` port.
//!
//! Downloads stream into a temporary file next to the destination and are
//! renamed into place only once the whole body has been written, so an
//! interrupted transfer never leaves a truncated file that a later run
//! would mistake for a finished one.

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::Downloader;

const BUFFER_SIZE: usize = 64 * 1024;

/// Blocking `ureq` client run on tokio's blocking pool.
pub struct UreqDownloader {
    agent: ureq::Agent,
    show_progress: bool,
}

impl UreqDownloader {
    /// `timeout` bounds connecting and each read; `None` waits indefinitely.
    #[must_use]
    pub fn new(timeout: Option<Duration>, show_progress: bool) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(t) = timeout {
            builder = builder.timeout_connect(t).timeout_read(t);
        }
        Self {
            agent: builder.build(),
            show_progress,
        }
    }
}

impl Downloader for UreqDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let agent = self.agent.clone();
        let url = url.to_owned();
        let dest = dest.to_path_buf();
        let show_progress = self.show_progress;
        tokio::task::spawn_blocking(move || download_blocking(&agent, &url, &dest, show_progress))
            .await
            .context("download task failed")?
    }
}

fn download_blocking(agent: &ureq::Agent, url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let response = match agent.get(url).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("HTTP {code}"),
        Err(e) => anyhow::bail!("request failed: {e}"),
    };

    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());

    let dir = dest
        .parent()
        .with_context(|| format!("{} has no parent directory", dest.display()))?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".comfy-lock-")
        .suffix(".partial")
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;

    let label = dest
        .file_name()
        .map_or_else(|| url.to_owned(), |n| n.to_string_lossy().into_owned());
    let pb = make_progress_bar(show_progress, total, &label);

    let mut reader = response.into_reader();
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut written: u64 = 0;
    loop {
        let n = reader.read(&mut buf).context("download interrupted")?;
        if n == 0 {
            break;
        }
        tmp.write_all(&buf[..n])
            .with_context(|| format!("writing {}", tmp.path().display()))?;
        written += n as u64;
        pb.inc(n as u64);
    }
    pb.finish_and_clear();

    if let Some(expected) = total {
        if written != expected {
            anyhow::bail!("truncated download: received {written} of {expected} bytes");
        }
    }

    tmp.as_file()
        .sync_all()
        .with_context(|| format!("flushing {}", tmp.path().display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))
            .with_context(|| format!("setting permissions on {}", tmp.path().display()))?;
    }

    tmp.persist(dest)
        .map_err(|e| e.error)
        .with_context(|| format!("moving download into place at {}", dest.display()))?;
    tracing::debug!(url, dest = %dest.display(), bytes = written, "download finished");
    Ok(())
}

fn make_progress_bar(show: bool, total: Option<u64>, label: &str) -> indicatif::ProgressBar {
    if !show {
        return indicatif::ProgressBar::hidden();
    }
    let pb = if let Some(t) = total {
        let pb = indicatif::ProgressBar::new(t);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("    {msg} {bar:40.cyan/dim} {percent}%  {bytes}/{total_bytes}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("━━─"),
        );
        pb
    } else {
        indicatif::ProgressBar::new_spinner()
    };
    pb.set_message(label.to_owned());
    pb
}
