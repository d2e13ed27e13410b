//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::ProvisionerConfig;
use crate::domain::config::{DEFAULT_GIT_PROGRAM, DEFAULT_INSTALL_ROOT};

/// Install ComfyUI core, custom nodes and models pinned by a comfy-lock.yaml
#[derive(Parser)]
#[command(name = "comfy-lock", version)]
pub struct Cli {
    /// Lock file to install from [default: ./comfy-lock.yaml]
    #[arg(value_name = "LOCK_FILE")]
    pub lock_file: Option<PathBuf>,

    /// Installation root holding the ComfyUI checkout
    #[arg(long, env = "COMFY_LOCK_ROOT", default_value = DEFAULT_INSTALL_ROOT)]
    pub root: PathBuf,

    /// Git executable used for clone, fetch and checkout
    #[arg(long, env = "COMFY_LOCK_GIT", default_value = DEFAULT_GIT_PROGRAM)]
    pub git: String,

    /// Kill git commands running longer than this (no limit by default)
    #[arg(
        long,
        env = "COMFY_LOCK_GIT_TIMEOUT",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub git_timeout: Option<u64>,

    /// Fail downloads that stall longer than this (no limit by default)
    #[arg(
        long,
        env = "COMFY_LOCK_DOWNLOAD_TIMEOUT",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub download_timeout: Option<u64>,

    /// Output the provisioning report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,
}

impl Cli {
    /// Settings for this run.
    #[must_use]
    pub fn config(&self) -> ProvisionerConfig {
        ProvisionerConfig {
            install_root: self.root.clone(),
            git_program: self.git.clone(),
            git_timeout: self.git_timeout.map(Duration::from_secs),
            download_timeout: self.download_timeout.map(Duration::from_secs),
        }
    }

    /// Execute the install.
    ///
    /// # Errors
    ///
    /// Returns the first fatal provisioning error.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            json: self.json,
            config: self.config(),
        });
        commands::install::run(&app, self.lock_file.as_deref()).await
    }
}
