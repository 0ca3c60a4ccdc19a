use std::process::Command;

use crate::gerrit::{GerritError, Result};

pub const DEFAULT_PORT: u16 = 29418;

/// Connection parameters for the Gerrit ssh interface.
///
/// Constructed once per invocation, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// The `user@host` argument passed to ssh.
    pub host_and_user: String,
    pub port: u16,
    pub project: String,
}

/// Derive connection parameters from a git remote, applying explicit
/// overrides on top.
///
/// Missing host or project after overrides is a configuration error; no
/// network call is attempted in that case.
pub fn discover(
    remote: &str,
    host: Option<&str>,
    port: Option<u16>,
    project: Option<&str>,
) -> Result<ConnectionConfig> {
    let derived = remote_url(remote).as_deref().and_then(parse_remote_url);

    let host_and_user = host
        .map(str::to_string)
        .or_else(|| derived.as_ref().map(|c| c.host_and_user.clone()));
    let project_name = project
        .map(str::to_string)
        .or_else(|| derived.as_ref().map(|c| c.project.clone()));
    let port = port
        .or_else(|| derived.as_ref().map(|c| c.port))
        .unwrap_or(DEFAULT_PORT);

    match (host_and_user, project_name) {
        (Some(host_and_user), Some(project)) => Ok(ConnectionConfig {
            host_and_user,
            port,
            project,
        }),
        (None, _) => Err(GerritError::Configuration(format!(
            "no gerrit ssh url on remote '{}'; pass --host",
            remote
        ))),
        (_, None) => Err(GerritError::Configuration(format!(
            "no gerrit project on remote '{}'; pass --project",
            remote
        ))),
    }
}

/// Read the URL of a git remote (`git remote get-url <name>`).
pub fn remote_url(remote: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["remote", "get-url", remote])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if url.is_empty() { None } else { Some(url) }
}

/// Parse a Gerrit ssh remote URL into connection parameters.
///
/// Handles `ssh://user@host:29418/project` and the scp-like
/// `user@host:project` form. A trailing `.git` is stripped from the
/// project path.
pub fn parse_remote_url(url: &str) -> Option<ConnectionConfig> {
    if let Some(rest) = url.strip_prefix("ssh://") {
        let (authority, path) = rest.split_once('/')?;
        let (host_and_user, port) = match authority.rsplit_once(':') {
            Some((host_and_user, port)) => (host_and_user, port.parse().ok()?),
            None => (authority, DEFAULT_PORT),
        };
        return build(host_and_user, port, path);
    }

    // scp-like: user@review.example.com:platform/tools
    if url.contains('@') && !url.contains("://") {
        let (host_and_user, path) = url.split_once(':')?;
        return build(host_and_user, DEFAULT_PORT, path);
    }

    None
}

fn build(host_and_user: &str, port: u16, path: &str) -> Option<ConnectionConfig> {
    let project = path.trim_start_matches('/');
    let project = project.strip_suffix(".git").unwrap_or(project);
    if host_and_user.is_empty() || project.is_empty() {
        return None;
    }
    Some(ConnectionConfig {
        host_and_user: host_and_user.to_string(),
        port,
        project: project.to_string(),
    })
}
