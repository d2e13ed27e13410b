//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `std` and `anyhow`; never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` when they carry
    /// a default timeout, and wait indefinitely otherwise.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Version Control Port ──────────────────────────────────────────────────────

/// Repository operations used by the synchronizer.
///
/// Every method fails when the underlying client exits non-zero.
#[allow(async_fn_in_trait)]
pub trait VersionControl {
    /// Full clone of `url` into `dest` (which must not exist).
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
    /// Fetch updates from the `origin` remote.
    async fn fetch_origin(&self, repo: &Path) -> Result<()>;
    /// Check out `revision` in the working tree.
    async fn checkout(&self, repo: &Path, revision: &str) -> Result<()>;
    /// Resolve `revision` to a commit id using local objects only.
    ///
    /// Returns `Ok(None)` when the revision is unknown locally.
    async fn resolve_commit(&self, repo: &Path, revision: &str) -> Result<Option<String>>;
}

// ── Download Port ─────────────────────────────────────────────────────────────

/// Fetches remote content onto the local filesystem.
#[allow(async_fn_in_trait)]
pub trait Downloader {
    /// Download `url` to `dest`.
    ///
    /// On failure `dest` must not have been created or modified; content is
    /// only moved into place once fully received.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Filesystem queries and directory creation.
pub trait LocalFs {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Size of the regular file at `path`, or `None` if there is none.
    fn file_size(&self, path: &Path) -> Option<u64>;
    /// Create `path` and all missing parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Synchronous.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an informational message (skips and no-ops).
    fn info(&self, message: &str);
}
