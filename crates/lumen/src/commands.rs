// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dry-run command runner for the local machine.
//!
//! Nothing is opened or written; replies describe what would happen.
//! Reminders are real: a timer task logs the alert when it fires.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lumen_core::{Authorizer, CommandRequest, CommandRunner, LumenError};
use tracing::{debug, info};

pub struct LocalCommands {
    authorizer: Arc<dyn Authorizer>,
    data_dir: PathBuf,
}

impl LocalCommands {
    /// `data_dir` is the directory files may be created in without elevation.
    pub fn new(authorizer: Arc<dyn Authorizer>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            authorizer,
            data_dir: data_dir.into(),
        }
    }

    async fn create_file(&self, path: &str) -> String {
        let p = Path::new(path);
        let decision = self
            .authorizer
            .authorize("create_file", path, Some(p))
            .await;
        if !decision.is_approved() {
            return format!("[denied] create_file {path}");
        }
        if self.requires_elevation(p) {
            format!("[approved] Would create (elev needed) {path}")
        } else {
            format!("[approved] Would create {path}")
        }
    }

    fn requires_elevation(&self, path: &Path) -> bool {
        !path.starts_with(&self.data_dir)
    }
}

#[async_trait]
impl CommandRunner for LocalCommands {
    async fn run(&self, request: &CommandRequest) -> Result<String, LumenError> {
        debug!(action = request.action(), "running command");
        let reply = match request {
            CommandRequest::OpenUrl { url } => format!("[dry-run] Would open URL: {url}"),
            CommandRequest::OpenFile { path } => format!("[dry-run] Would open file: {path}"),
            CommandRequest::OpenApp { name } => {
                let found = std::env::var_os("PATH").and_then(|paths| find_in_path(name, &paths));
                match found {
                    Some(exe) => format!("[dry-run] Would open app: {name} ({})", exe.display()),
                    None => format!("[error] app not found: {name}"),
                }
            }
            CommandRequest::CreateFile { path } => self.create_file(path).await,
            CommandRequest::SetReminder { seconds, message } => {
                schedule_reminder(*seconds, message.clone());
                format!("[scheduled] in {seconds}s: {message}")
            }
        };
        Ok(reply)
    }
}

fn schedule_reminder(seconds: u64, message: String) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        info!(target: "lumen::reminder", message = message.as_str(), "reminder");
        eprintln!("\n[reminder] {message}");
    });
}

/// Locate an executable named `name` in a `PATH`-style list of directories.
pub fn find_in_path(name: &str, paths: &OsStr) -> Option<PathBuf> {
    if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) {
        return None;
    }
    std::env::split_paths(paths).find_map(|dir| {
        candidates(&dir, name)
            .into_iter()
            .find(|candidate| is_executable(candidate))
    })
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut out = vec![dir.join(name)];
    for ext in ["exe", "cmd", "bat"] {
        out.push(dir.join(format!("{name}.{ext}")));
    }
    out
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PromptAuthorizer;
    use lumen_core::Decision;

    fn runner(decision: Decision, data_dir: &str) -> LocalCommands {
        LocalCommands::new(Arc::new(PromptAuthorizer::fixed(decision)), data_dir)
    }

    #[tokio::test]
    async fn opens_are_dry_runs() {
        let cmds = runner(Decision::Denied, "/data");
        let reply = cmds
            .run(&CommandRequest::OpenUrl {
                url: "https://example.com".into(),
            })
            .await
            .unwrap();
        assert_eq!(reply, "[dry-run] Would open URL: https://example.com");

        let reply = cmds
            .run(&CommandRequest::OpenFile {
                path: "C:\\notes.txt".into(),
            })
            .await
            .unwrap();
        assert!(reply.starts_with("[dry-run]"));
    }

    #[tokio::test]
    async fn create_file_follows_authorizer() {
        let denied = runner(Decision::Denied, "/data")
            .run(&CommandRequest::CreateFile {
                path: "/data/a.txt".into(),
            })
            .await
            .unwrap();
        assert_eq!(denied, "[denied] create_file /data/a.txt");

        let approved = runner(Decision::Approved, "/data");
        let inside = approved
            .run(&CommandRequest::CreateFile {
                path: "/data/a.txt".into(),
            })
            .await
            .unwrap();
        assert_eq!(inside, "[approved] Would create /data/a.txt");
        let outside = approved
            .run(&CommandRequest::CreateFile {
                path: "/etc/a.txt".into(),
            })
            .await
            .unwrap();
        assert_eq!(outside, "[approved] Would create (elev needed) /etc/a.txt");
    }

    #[tokio::test]
    async fn unknown_app_is_an_error_reply() {
        let reply = runner(Decision::Denied, "/data")
            .run(&CommandRequest::OpenApp {
                name: "definitely-not-an-installed-app-x9".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            reply,
            "[error] app not found: definitely-not-an-installed-app-x9"
        );
    }

    #[cfg(unix)]
    #[test]
    fn finds_executables_on_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("gedit");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
        let plain = dir.path().join("notes");
        std::fs::write(&plain, "").unwrap();

        let paths = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_in_path("gedit", &paths), Some(exe));
        assert_eq!(find_in_path("notes", &paths), None);
        assert_eq!(find_in_path("", &paths), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reminder_is_scheduled() {
        let reply = runner(Decision::Denied, "/data")
            .run(&CommandRequest::SetReminder {
                seconds: 120,
                message: "stretch".into(),
            })
            .await
            .unwrap();
        assert_eq!(reply, "[scheduled] in 120s: stretch");
        tokio::time::sleep(Duration::from_secs(121)).await;
    }
}
