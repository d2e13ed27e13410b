//! Shared fixtures: binary handle, loopback HTTP server and git helpers.

#![allow(clippy::expect_used, deprecated, dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command as StdCommand;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;

/// The `comfy-lock` binary with a clean environment.
pub fn comfy_lock() -> Command {
    let mut cmd = Command::cargo_bin("comfy-lock").expect("comfy-lock binary should exist");
    cmd.env_remove("COMFY_LOCK_ROOT")
        .env_remove("COMFY_LOCK_GIT")
        .env_remove("COMFY_LOCK_GIT_TIMEOUT")
        .env_remove("COMFY_LOCK_DOWNLOAD_TIMEOUT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

pub fn write_lock(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("comfy-lock.yaml");
    std::fs::write(&path, text).expect("write lock file");
    path
}

// ── Loopback HTTP server ─────────────────────────────────────────────────────

/// Serves fixed bodies by request path; unknown paths get 404.
pub struct FileServer {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FileServer {
    pub fn start(files: &[(&str, &[u8])]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let files: HashMap<String, Vec<u8>> = files
            .iter()
            .map(|(p, b)| ((*p).to_owned(), b.to_vec()))
            .collect();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&hits);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().expect("clone"));
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                let mut line = String::new();
                while reader.read_line(&mut line).is_ok_and(|n| n > 2) {
                    line.clear();
                }
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_owned();
                log.lock().expect("lock").push(path.clone());
                let response = match files.get(&path) {
                    Some(body) => {
                        let mut r = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        )
                        .into_bytes();
                        r.extend_from_slice(body);
                        r
                    }
                    None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_vec(),
                };
                let _ = stream.write_all(&response);
            }
        });
        Self { base, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn hits(&self) -> usize {
        self.hits.lock().expect("lock").len()
    }
}

// ── Git fixtures ─────────────────────────────────────────────────────────────

pub fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Run git in `dir` with a fixed identity, returning trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = StdCommand::new("git")
        .args(["-c", "user.name=comfy-lock", "-c", "user.email=test@example.com"])
        .args(["-c", "init.defaultBranch=main", "-c", "commit.gpgsign=false"])
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("spawn git");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).trim().to_owned()
}

/// Create a repository at `dir` with two commits; returns `(first, second)`.
pub fn origin_with_two_commits(dir: &Path) -> (String, String) {
    std::fs::create_dir_all(dir).expect("mkdir origin");
    git(dir, &["init", "--quiet"]);
    std::fs::write(dir.join("node.py"), "VERSION = 1\n").expect("write");
    git(dir, &["add", "."]);
    git(dir, &["commit", "--quiet", "-m", "first"]);
    let first = git(dir, &["rev-parse", "HEAD"]);
    std::fs::write(dir.join("node.py"), "VERSION = 2\n").expect("write");
    git(dir, &["commit", "--quiet", "-am", "second"]);
    let second = git(dir, &["rev-parse", "HEAD"]);
    (first, second)
}
