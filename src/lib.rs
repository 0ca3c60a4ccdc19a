pub mod cli;
pub mod config;
pub mod gerrit;
pub mod parser;
pub mod render;

use std::time::{SystemTime, UNIX_EPOCH};

use config::ConnectionConfig;
use render::LabelSet;

/// One reviewer's score on one label for the current patchset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub label: String,
    pub value: i32,
}

/// One Gerrit change paired with its current patchset.
#[derive(Debug, Clone)]
pub struct Review {
    pub number: u64,
    pub subject: String,
    pub branch: String,
    pub owner_name: String,
    pub patchset_number: u64,
    /// Seconds since epoch.
    pub last_updated: i64,
    pub size_insertions: i64,
    pub size_deletions: i64,
    pub is_draft: bool,
    pub approvals: Vec<Approval>,
    pub url: String,
    pub id: String,
}

/// Query reviews for the configured project and render them as a table.
///
/// Runs one `gerrit query` over ssh, parses the JSON-lines output, and lays
/// the results out for a terminal `width` columns wide. `filter` defaults to
/// `status:open`.
pub fn generate_report(
    config: &ConnectionConfig,
    filter: Option<&str>,
    width: usize,
) -> gerrit::Result<String> {
    let raw = gerrit::query_reviews(config, filter, None)?;
    let reviews = parser::parse_reviews(&raw);
    Ok(render::render_report(
        &reviews,
        &LabelSet::default(),
        width,
        unix_now(),
    ))
}

/// Current time as seconds since epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
