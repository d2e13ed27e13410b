//! End-to-end installs: downloads over loopback HTTP and real git checkouts.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::{FileServer, comfy_lock, git, git_available, origin_with_two_commits, write_lock};

// ── Models ───────────────────────────────────────────────────────────────────

#[test]
fn test_models_are_downloaded_then_skipped_on_rerun() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = FileServer::start(&[("/model.bin", b"weights")]);
    let lock = write_lock(
        dir.path(),
        &format!(
            "models:\n  - model: model.bin\n    url: {}\n    paths:\n      - path: models/a/model.bin\n      - path: models/b/model.bin\n",
            server.url("/model.bin")
        ),
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 changes)"));
    assert_eq!(
        std::fs::read(dir.path().join("models/a/model.bin")).expect("read"),
        b"weights"
    );
    assert_eq!(
        std::fs::read(dir.path().join("models/b/model.bin")).expect("read"),
        b"weights"
    );
    assert_eq!(server.hits(), 2);

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping download"))
        .stdout(predicate::str::contains("(0 changes)"));
    assert_eq!(server.hits(), 2, "second run must not download");
}

#[test]
fn test_zero_size_model_is_downloaded_again() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = FileServer::start(&[("/m.bin", b"fresh")]);
    let dest = dir.path().join("models/m.bin");
    std::fs::create_dir_all(dest.parent().expect("parent")).expect("mkdir");
    std::fs::File::create(&dest).expect("touch");
    let lock = write_lock(
        dir.path(),
        &format!(
            "models:\n  - model: m\n    url: {}\n    paths:\n      - path: models/m.bin\n",
            server.url("/m.bin")
        ),
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(std::fs::read(&dest).expect("read"), b"fresh");
}

#[test]
fn test_failed_download_aborts_and_leaves_later_models_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = FileServer::start(&[("/second.bin", b"second")]);
    let lock = write_lock(
        dir.path(),
        &format!(
            "models:\n  - model: first\n    url: {}\n    paths:\n      - path: models/first.bin\n  - model: second\n    url: {}\n    paths:\n      - path: models/second.bin\n",
            server.url("/missing.bin"),
            server.url("/second.bin")
        ),
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HTTP 404"));

    assert!(!dir.path().join("models/first.bin").exists());
    assert!(!dir.path().join("models/second.bin").exists());
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("models"))
        .expect("models dir")
        .collect();
    assert!(leftovers.is_empty(), "no partial files: {leftovers:?}");
}

#[test]
fn test_escaping_destination_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lock = write_lock(
        dir.path(),
        "models:\n  - model: m\n    url: http://127.0.0.1:9/m.bin\n    paths:\n      - path: ../escape.bin\n",
    );

    let output = comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["code"], "invalid_destination");
}

#[test]
fn test_json_report_shape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = FileServer::start(&[("/m.bin", b"x")]);
    let lock = write_lock(
        dir.path(),
        &format!(
            "models:\n  - model: m\n    url: {}\n    paths:\n      - path: models/m.bin\n  - model: no-url\n",
            server.url("/m.bin")
        ),
    );

    let output = comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .output()
        .expect("run");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is only the report");
    assert_eq!(value["error"], false);
    assert_eq!(value["changes"], 1);
    assert_eq!(value["report"]["core"], serde_json::Value::Null);
    let artifacts = value["report"]["artifacts"].as_array().expect("artifacts");
    assert_eq!(artifacts[0]["status"], "installed");
    assert_eq!(artifacts[0]["destinations"][0]["action"], "downloaded");
    assert_eq!(artifacts[1]["status"], "skipped_no_source");
}

// ── Git ──────────────────────────────────────────────────────────────────────

#[test]
fn test_plugin_is_cloned_and_pinned_then_left_alone() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let origin = dir.path().join("remotes/node-a");
    let (first, _second) = origin_with_two_commits(&origin);
    let root = dir.path().join("app");
    std::fs::create_dir_all(&root).expect("mkdir root");
    let lock = write_lock(
        dir.path(),
        &format!(
            "custom_nodes:\n  git_custom_nodes:\n    {}:\n      hash: \"{first}\"\n",
            origin.display()
        ),
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloning"));

    let checkout = root.join("custom_nodes/node-a");
    assert_eq!(git(&checkout, &["rev-parse", "HEAD"]), first);
    assert_eq!(
        std::fs::read_to_string(checkout.join("node.py")).expect("read"),
        "VERSION = 1\n"
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("already at"))
        .stdout(predicate::str::contains("fetching").not())
        .stdout(predicate::str::contains("(0 changes)"));
}

#[test]
fn test_plugin_moves_to_newly_pinned_revision() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let origin = dir.path().join("remotes/node-a.git");
    let (first, second) = origin_with_two_commits(&origin);
    let root = dir.path().join("app");
    std::fs::create_dir_all(&root).expect("mkdir root");
    let lock_for = |rev: &str| {
        write_lock(
            dir.path(),
            &format!(
                "custom_nodes:\n  git_custom_nodes:\n    {}:\n      hash: \"{rev}\"\n",
                origin.display()
            ),
        )
    };

    let lock = lock_for(&first);
    comfy_lock().arg(&lock).arg("--root").arg(&root).assert().success();
    let lock = lock_for(&second);
    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("fetching"));

    assert_eq!(git(&root.join("custom_nodes/node-a"), &["rev-parse", "HEAD"]), second);
}

#[test]
fn test_disabled_plugin_is_not_cloned() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let origin = dir.path().join("remotes/off");
    let (first, _) = origin_with_two_commits(&origin);
    let root = dir.path().join("app");
    std::fs::create_dir_all(&root).expect("mkdir root");
    let lock = write_lock(
        dir.path(),
        &format!(
            "custom_nodes:\n  git_custom_nodes:\n    {}:\n      hash: \"{first}\"\n      disabled: true\n",
            origin.display()
        ),
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping disabled node"));

    assert!(!root.join("custom_nodes/off").exists());
}

#[test]
fn test_unknown_revision_is_checkout_failure() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let origin = dir.path().join("remotes/node-b");
    origin_with_two_commits(&origin);
    let root = dir.path().join("app");
    std::fs::create_dir_all(&root).expect("mkdir root");
    let lock = write_lock(
        dir.path(),
        &format!(
            "custom_nodes:\n  git_custom_nodes:\n    {}:\n      hash: does-not-exist\n",
            origin.display()
        ),
    );

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(&root)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to check out does-not-exist"));
}

#[test]
fn test_core_checkout_in_git_root() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("app");
    let (first, _second) = origin_with_two_commits(&root);
    let lock = write_lock(dir.path(), &format!("custom_nodes:\n  comfyui: \"{first}\"\n"));

    comfy_lock()
        .arg(&lock)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("ComfyUI core checked out"));

    assert_eq!(git(&root, &["rev-parse", "HEAD"]), first);
}
