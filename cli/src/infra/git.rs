//! Infrastructure implementation of the `VersionControl` port.
//!
//! `GitClient<R>` routes every git invocation through a `CommandRunner`, so
//! tests can inject a recording runner without spawning real processes.
//! Repository-local commands use `git -C <repo>` rather than a working
//! directory.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, VersionControl};
use crate::domain::config::DEFAULT_GIT_PROGRAM;
use crate::infra::command_runner::TokioCommandRunner;

/// Git CLI adapter.
pub struct GitClient<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> GitClient<R> {
    /// Create a client that invokes `program` through `runner`.
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<Output> {
        self.runner
            .run(&self.program, args)
            .await
            .with_context(|| format!("{} {}", self.program, args.join(" ")))
    }

    /// Run git and fail on a non-zero exit, including stderr in the error.
    async fn git_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.git(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                stderr.trim()
            );
        }
        Ok(output)
    }
}

impl GitClient<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn system(program: &str, timeout: Option<std::time::Duration>) -> Self {
        Self::new(TokioCommandRunner::new(timeout), program)
    }
}

impl Default for GitClient<TokioCommandRunner> {
    fn default() -> Self {
        Self::system(DEFAULT_GIT_PROGRAM, None)
    }
}

impl<R: CommandRunner> VersionControl for GitClient<R> {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.git_checked(&["clone", url, &dest]).await?;
        Ok(())
    }

    async fn fetch_origin(&self, repo: &Path) -> Result<()> {
        let repo = repo.to_string_lossy();
        self.git_checked(&["-C", &repo, "fetch", "origin"]).await?;
        Ok(())
    }

    async fn checkout(&self, repo: &Path, revision: &str) -> Result<()> {
        let repo = repo.to_string_lossy();
        self.git_checked(&["-C", &repo, "checkout", revision]).await?;
        Ok(())
    }

    async fn resolve_commit(&self, repo: &Path, revision: &str) -> Result<Option<String>> {
        let repo = repo.to_string_lossy();
        let peeled = format!("{revision}^{{commit}}");
        let output = self
            .git(&["-C", &repo, "rev-parse", "--verify", "--quiet", &peeled])
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let commit = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        Ok((!commit.is_empty()).then_some(commit))
    }
}
