use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::{Approval, Review};

/// Parse raw `gerrit query --format=JSON` output into `Review` records.
///
/// Gerrit emits one JSON object per matched change, one per line, followed
/// by a stats-only object (`{"type":"stats","rowCount":N,...}`). Objects
/// that fail to decode or lack the required change fields are skipped, which
/// is also what excludes the stats trailer. Source order is preserved.
pub fn parse_reviews(input: &str) -> Vec<Review> {
    input.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Review> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let record: ChangeRecord = match serde_json::from_str(line) {
        Ok(record) => record,
        Err(err) => {
            debug!(%err, "skipping undecodable query line");
            return None;
        }
    };
    record.into_review()
}

/// One line of query output, decoded leniently.
///
/// Every field is optional on the wire; validation happens in
/// `into_review`, not in serde.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeRecord {
    number: Option<u64>,
    subject: Option<String>,
    branch: Option<String>,
    owner: Option<OwnerRecord>,
    url: Option<String>,
    id: Option<String>,
    last_updated: Option<i64>,
    current_patch_set: Option<PatchSetRecord>,
}

#[derive(Debug, Deserialize)]
struct OwnerRecord {
    name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatchSetRecord {
    number: Option<u64>,
    #[serde(default)]
    approvals: Vec<ApprovalRecord>,
    size_insertions: Option<i64>,
    size_deletions: Option<i64>,
    #[serde(default, deserialize_with = "literal_true")]
    is_draft: bool,
}

#[derive(Debug, Deserialize)]
struct ApprovalRecord {
    /// Label name; the wire calls it `type`.
    #[serde(rename = "type")]
    label: Option<String>,
    /// Signed score as a string, e.g. `"2"` or `"-1"`.
    value: Option<String>,
}

impl ChangeRecord {
    /// A record without a number, subject, and owner name is not a change.
    fn into_review(self) -> Option<Review> {
        let number = self.number?;
        let subject = self.subject?;
        let owner_name = self.owner.and_then(|o| o.name.or(o.username))?;

        let (patchset_number, approvals, size_insertions, size_deletions, is_draft) =
            match self.current_patch_set {
                Some(ps) => (
                    ps.number.unwrap_or(0),
                    ps.approvals
                        .into_iter()
                        .filter_map(ApprovalRecord::into_approval)
                        .collect(),
                    ps.size_insertions.unwrap_or(0),
                    ps.size_deletions.unwrap_or(0),
                    ps.is_draft,
                ),
                None => (0, Vec::new(), 0, 0, false),
            };

        Some(Review {
            number,
            subject,
            branch: self.branch.unwrap_or_default(),
            owner_name,
            patchset_number,
            last_updated: self.last_updated.unwrap_or(0),
            size_insertions,
            size_deletions,
            is_draft,
            approvals,
            url: self.url.unwrap_or_default(),
            id: self.id.unwrap_or_default(),
        })
    }
}

impl ApprovalRecord {
    fn into_approval(self) -> Option<Approval> {
        let label = self.label?;
        let value = self.value?.trim().parse().unwrap_or(0);
        Some(Approval { label, value })
    }
}

/// Only the JSON literal `true` counts as a draft; any other value,
/// including absence, does not.
fn literal_true<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(value == serde_json::Value::Bool(true))
}
