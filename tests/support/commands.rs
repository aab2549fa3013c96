//! Command helpers for Test, plus a scripted stand-in for `gh`.
//!
//! The fake `gh` answers `gh api --method M PATH` from files under
//! `responses/`, named after the method and path with `/?&=` turned into
//! `_`. Writes are appended to `writes.log` as `METHOD PATH BODY`.

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;

use super::Test;

const FAKE_GH: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$*" >> "$dir/calls.log"
[ "$1" = "api" ] || { echo "unsupported: $*" >&2; exit 2; }
method="$3"
path="$4"
key=$(printf '%s_%s' "$method" "$path" | tr '/?&=' '____')
body=""
if [ "$5" = "--input" ]; then
    body="$(cat)"
fi
if [ -f "$dir/responses/$key.fail" ]; then
    cat "$dir/responses/$key.fail" >&2
    exit 1
fi
if [ "$method" != "GET" ]; then
    printf '%s %s %s\n' "$method" "$path" "$body" >> "$dir/writes.log"
    echo '{}'
    exit 0
fi
if [ -f "$dir/responses/$key.json" ]; then
    cat "$dir/responses/$key.json"
    exit 0
fi
echo "gh: Not Found (HTTP 404)" >&2
exit 1
"#;

/// One write recorded by the fake `gh`.
#[derive(Debug, Clone)]
pub struct LoggedWrite {
    pub method: String,
    pub path: String,
    pub body: serde_json::Value,
}

/// Fixture key for a request, matching the fake script's naming.
pub fn response_key(method: &str, path: &str) -> String {
    let path: String = path
        .chars()
        .map(|c| if "/?&=".contains(c) { '_' } else { c })
        .collect();
    format!("{}_{}", method, path)
}

impl Test {
    /// Create an envcopy command running in the test directory.
    ///
    /// Logging and color are pinned so output is stable.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envcopy").expect("failed to find envcopy binary");
        cmd.current_dir(self.dir.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ENVCOPY_LOG");
        cmd.env_remove("ENVCOPY_JOBS");
        cmd.env_remove("ENVCOPY_GH");
        cmd
    }

    /// Run envcopy with `args`, stdin closed.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run envcopy")
    }

    /// Run envcopy against the fake `gh`.
    #[cfg(unix)]
    pub fn run_fake(&self, args: &[&str]) -> Output {
        let gh = self.fake_gh();
        self.cmd()
            .args(args)
            .arg("--gh")
            .arg(&gh)
            .output()
            .expect("failed to run envcopy")
    }

    /// Path of the fake `gh`, installed on first use.
    #[cfg(unix)]
    pub fn fake_gh(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path("gh");
        if !path.exists() {
            std::fs::write(&path, FAKE_GH).expect("failed to write fake gh");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("failed to chmod fake gh");
            std::fs::create_dir_all(self.path("responses")).expect("failed to create responses");
        }
        path
    }

    /// Serve `body` for `GET path`.
    #[cfg(unix)]
    pub fn respond(&self, path: &str, body: &serde_json::Value) {
        self.fake_gh();
        let file = self
            .path("responses")
            .join(format!("{}.json", response_key("GET", path)));
        std::fs::write(file, body.to_string()).expect("failed to write response");
    }

    /// Make `METHOD path` fail with `message` on stderr.
    #[cfg(unix)]
    pub fn fail(&self, method: &str, path: &str, message: &str) {
        self.fake_gh();
        let file = self
            .path("responses")
            .join(format!("{}.fail", response_key(method, path)));
        std::fs::write(file, message).expect("failed to write failure");
    }

    /// Writes the fake `gh` received, in order.
    pub fn logged_writes(&self) -> Vec<LoggedWrite> {
        let Ok(log) = std::fs::read_to_string(self.path("writes.log")) else {
            return Vec::new();
        };
        log.lines()
            .map(|line| {
                let mut parts = line.splitn(3, ' ');
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();
                let body = parts.next().filter(|b| !b.is_empty()).unwrap_or("null");
                let body = serde_json::from_str(body).expect("write body is not JSON");
                LoggedWrite { method, path, body }
            })
            .collect()
    }

    /// Every invocation of the fake `gh`, one argument string per call.
    pub fn gh_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
