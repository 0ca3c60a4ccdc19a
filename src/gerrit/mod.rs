use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::config::ConnectionConfig;

#[derive(Debug, Error)]
pub enum GerritError {
    #[error("gerrit connection is not configured: {0}")]
    Configuration(String),
    #[error("gerrit command failed: {0}")]
    CommandFailed(String),
    #[error("invalid ref: {0}")]
    InvalidRef(String),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GerritError>;

/// Run `gerrit query` over ssh and return the raw JSON-lines output.
///
/// `filter` falls back to `status:open`; `extra` is spliced into the query
/// verbatim (split on whitespace). One attempt, no retry.
pub fn query_reviews(
    config: &ConnectionConfig,
    filter: Option<&str>,
    extra: Option<&str>,
) -> Result<String> {
    run_ssh(config, &query_args(config, filter, extra))
}

fn query_args(config: &ConnectionConfig, filter: Option<&str>, extra: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "gerrit".to_string(),
        "query".to_string(),
        "--format=JSON".to_string(),
        "--current-patch-set".to_string(),
        format!("project:{}", config.project),
    ];
    if let Some(extra) = extra {
        args.extend(extra.split_whitespace().map(str::to_string));
    }
    args.push(filter.unwrap_or("status:open").to_string());
    args
}

/// Score the Code-Review label on a revision, with an optional cover message.
pub fn code_review(
    config: &ConnectionConfig,
    revision: &str,
    score: i32,
    message: Option<&str>,
) -> Result<()> {
    let mut flags = vec!["--code-review".to_string(), format_score(score)];
    if let Some(message) = message {
        flags.push("--message".to_string());
        flags.push(quote_message(message));
    }
    run_ssh(config, &review_args(config, revision, &flags)).map(drop)
}

/// Score the Verified label on a revision.
pub fn verify(config: &ConnectionConfig, revision: &str, score: i32) -> Result<()> {
    let flags = ["--verified".to_string(), format_score(score)];
    run_ssh(config, &review_args(config, revision, &flags)).map(drop)
}

/// Submit a change for merging.
pub fn submit(config: &ConnectionConfig, revision: &str) -> Result<()> {
    run_ssh(
        config,
        &review_args(config, revision, &["--submit".to_string()]),
    )
    .map(drop)
}

/// Abandon a change, with an optional reason.
pub fn abandon(config: &ConnectionConfig, revision: &str, message: Option<&str>) -> Result<()> {
    let mut flags = vec!["--abandon".to_string()];
    if let Some(message) = message {
        flags.push("--message".to_string());
        flags.push(quote_message(message));
    }
    run_ssh(config, &review_args(config, revision, &flags)).map(drop)
}

/// Publish a draft patchset.
pub fn publish(config: &ConnectionConfig, revision: &str) -> Result<()> {
    run_ssh(
        config,
        &review_args(config, revision, &["--publish".to_string()]),
    )
    .map(drop)
}

/// Delete a draft patchset.
pub fn delete_draft(config: &ConnectionConfig, revision: &str) -> Result<()> {
    run_ssh(
        config,
        &review_args(config, revision, &["--delete".to_string()]),
    )
    .map(drop)
}

/// Add reviewers to a change.
pub fn set_reviewers(config: &ConnectionConfig, change_id: &str, reviewers: &[String]) -> Result<()> {
    let mut args = vec![
        "gerrit".to_string(),
        "set-reviewers".to_string(),
        "--project".to_string(),
        config.project.clone(),
    ];
    for reviewer in reviewers {
        args.push("--add".to_string());
        args.push(reviewer.clone());
    }
    args.push(change_id.to_string());
    run_ssh(config, &args).map(drop)
}

/// Push HEAD for review on a target branch.
///
/// Drafts go to `refs/drafts/<branch>` instead of `refs/for/<branch>`.
pub fn push_for_review(remote: &str, branch: &str, draft: bool) -> Result<()> {
    validate_ref(branch)?;

    let refspec = if draft {
        format!("HEAD:refs/drafts/{}", branch)
    } else {
        format!("HEAD:refs/for/{}", branch)
    };
    debug!(remote, %refspec, "pushing for review");

    let output = Command::new("git").args(["push", remote, &refspec]).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GerritError::CommandFailed(format!(
            "git push failed: {}",
            stderr.trim()
        )));
    }

    Ok(())
}

/// Detect the remote's default branch (`origin/HEAD` symbolic ref).
pub fn default_branch(remote: &str) -> Result<String> {
    let output = Command::new("git")
        .arg("symbolic-ref")
        .arg(format!("refs/remotes/{}/HEAD", remote))
        .output()?;

    if output.status.success() {
        let symbolic = String::from_utf8(output.stdout)?;
        let prefix = format!("refs/remotes/{}/", remote);
        if let Some(branch) = symbolic.trim().strip_prefix(&prefix) {
            return Ok(branch.to_string());
        }
    }

    // Fall back to master, which old Gerrit installations default to
    Ok("master".to_string())
}

fn review_args(config: &ConnectionConfig, revision: &str, flags: &[String]) -> Vec<String> {
    let mut args = vec![
        "gerrit".to_string(),
        "review".to_string(),
        "--project".to_string(),
        config.project.clone(),
    ];
    args.extend(flags.iter().cloned());
    args.push(revision.to_string());
    args
}

/// Render a score with an explicit sign, the form `gerrit review` expects.
fn format_score(score: i32) -> String {
    if score > 0 {
        format!("+{}", score)
    } else {
        score.to_string()
    }
}

/// Wrap a free-text message for the remote shell gerrit invokes.
fn quote_message(message: &str) -> String {
    format!("\"{}\"", message.replace('"', "\\\""))
}

/// Validate a ref name to prevent shell injection (only for user-supplied refs).
fn validate_ref(ref_str: &str) -> Result<()> {
    if ref_str.is_empty() {
        return Err(GerritError::InvalidRef("empty ref".to_string()));
    }

    for ch in ref_str.chars() {
        if !ch.is_alphanumeric() && !matches!(ch, '-' | '_' | '/' | '.') {
            return Err(GerritError::InvalidRef(format!(
                "invalid character in ref: '{}'",
                ch
            )));
        }
    }

    Ok(())
}

fn run_ssh(config: &ConnectionConfig, args: &[String]) -> Result<String> {
    if config.host_and_user.is_empty() {
        return Err(GerritError::Configuration(
            "no ssh user/host set".to_string(),
        ));
    }

    let port = config.port.to_string();
    let mut ssh_args = vec!["-x", "-p", port.as_str(), config.host_and_user.as_str()];
    ssh_args.extend(args.iter().map(String::as_str));
    debug!(?ssh_args, "running ssh");

    let output = Command::new("ssh").args(&ssh_args).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GerritError::CommandFailed(stderr.trim().to_string()));
    }

    Ok(String::from_utf8(output.stdout)?)
}
