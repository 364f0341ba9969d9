#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Writes a `/bin/sh` script standing in for the external binary.
///
/// `body` sees the sub-command as `$1` and its operands as `$2..`.
#[cfg(unix)]
pub fn fake_age(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("age");
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .unwrap_or_else(|e| panic!("failed to chmod {}: {e}", path.display()));
    path
}

pub const MISSING_BINARY: &str = "age-gui-test-binary-that-does-not-exist";
