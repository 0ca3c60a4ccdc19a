use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{Approval, Review};

const APPROVED_GLYPH: &str = "✔";
const REJECTED_GLYPH: &str = "✖";

const NUMBER_WIDTH: usize = 8;
const PATCHSET_WIDTH: usize = 5;
const OWNER_WIDTH: usize = 10;
const SIZE_WIDTH: usize = 7;
const UPDATED_WIDTH: usize = 12;
const BRANCH_WIDTH: usize = 20;

/// A configured review dimension and its scoring thresholds.
#[derive(Debug, Clone)]
pub struct Label {
    pub name: String,
    /// Two-character column heading.
    pub code: String,
    pub approved: i32,
    pub rejected: i32,
}

impl Label {
    pub fn new(name: &str, code: &str, approved: i32, rejected: i32) -> Self {
        Label {
            name: name.to_string(),
            code: code.to_string(),
            approved,
            rejected,
        }
    }
}

/// Ordered label set; the order fixes the score-column order.
#[derive(Debug, Clone)]
pub struct LabelSet {
    pub labels: Vec<Label>,
}

impl Default for LabelSet {
    fn default() -> Self {
        LabelSet {
            labels: vec![
                Label::new("Code-Review", "CR", 2, -2),
                Label::new("Verified", "Ve", 1, -1),
            ],
        }
    }
}

/// Which optional columns fit at a given terminal width.
///
/// Columns drop out as the viewport narrows: branch first, then the
/// updated age, then the size pair, then the score cells. Stated column
/// widths are inclusive of their separation from the neighbouring column.
#[derive(Debug, Clone, Copy)]
struct Layout {
    show_scores: bool,
    show_sizes: bool,
    show_updated: bool,
    show_branch: bool,
    subject_width: usize,
}

impl Layout {
    fn for_width(width: usize, label_count: usize) -> Self {
        let show_scores = width > 80;
        let show_sizes = width > 94;
        let show_updated = width > 108;
        let show_branch = width > 128;

        let mut fixed = NUMBER_WIDTH + PATCHSET_WIDTH + OWNER_WIDTH;
        if show_scores {
            fixed += 3 * label_count;
        }
        if show_sizes {
            fixed += 2 * SIZE_WIDTH;
        }
        if show_updated {
            fixed += UPDATED_WIDTH;
        }
        if show_branch {
            fixed += BRANCH_WIDTH;
        }

        Layout {
            show_scores,
            show_sizes,
            show_updated,
            show_branch,
            subject_width: width.saturating_sub(fixed + 1),
        }
    }
}

/// Render reviews as an aligned table: one header row, one row per review.
///
/// Pure function of its inputs; `now` (seconds since epoch) anchors the
/// relative-age column.
pub fn render_report(reviews: &[Review], labels: &LabelSet, width: usize, now: i64) -> String {
    let layout = Layout::for_width(width, labels.labels.len());

    let mut out = String::new();
    out.push_str(&header_row(labels, layout));
    out.push('\n');
    for review in reviews {
        out.push_str(&review_row(review, labels, layout, now));
        out.push('\n');
    }
    out
}

/// Render a table framed as a titled section with a trailing blank line.
pub fn render_section(
    title: &str,
    reviews: &[Review],
    labels: &LabelSet,
    width: usize,
    now: i64,
) -> String {
    format!("{}\n{}\n", title, render_report(reviews, labels, width, now))
}

fn header_row(labels: &LabelSet, layout: Layout) -> String {
    let mut row = String::new();
    row.push_str(&pad_right("Number", NUMBER_WIDTH));
    row.push_str(&pad_right("PS", PATCHSET_WIDTH));
    row.push_str(&pad_right(
        &truncate("Subject", layout.subject_width),
        layout.subject_width,
    ));
    row.push(' ');
    row.push_str(&pad_right("Owner", OWNER_WIDTH));
    if layout.show_branch {
        row.push_str(&pad_right("Branch", BRANCH_WIDTH));
    }
    if layout.show_sizes {
        row.push_str(&pad_left("Ins", SIZE_WIDTH));
        row.push_str(&pad_left("Del", SIZE_WIDTH));
    }
    if layout.show_updated {
        row.push_str(&pad_left("Updated", UPDATED_WIDTH));
    }
    if layout.show_scores {
        for label in &labels.labels {
            row.push(' ');
            row.push_str(&pad_left(&label.code, 2));
        }
    }
    row
}

fn review_row(review: &Review, labels: &LabelSet, layout: Layout, now: i64) -> String {
    let mut row = String::new();
    row.push_str(&pad_right(&review.number.to_string(), NUMBER_WIDTH));
    row.push_str(&pad_right(&patchset_tag(review), PATCHSET_WIDTH));
    row.push_str(&pad_right(
        &truncate(&review.subject, layout.subject_width),
        layout.subject_width,
    ));
    row.push(' ');
    row.push_str(&pad_right(
        &truncate(&review.owner_name, OWNER_WIDTH - 1),
        OWNER_WIDTH,
    ));
    if layout.show_branch {
        row.push_str(&pad_right(
            &truncate(&review.branch, BRANCH_WIDTH - 1),
            BRANCH_WIDTH,
        ));
    }
    if layout.show_sizes {
        row.push_str(&pad_left(
            &format!("+{}", review.size_insertions.abs()),
            SIZE_WIDTH,
        ));
        row.push_str(&pad_left(
            &format!("-{}", review.size_deletions.abs()),
            SIZE_WIDTH,
        ));
    }
    if layout.show_updated {
        let age = (now - review.last_updated).max(0) as u64;
        row.push_str(&pad_left(&relative_age(age), UPDATED_WIDTH));
    }
    if layout.show_scores {
        for label in &labels.labels {
            row.push(' ');
            row.push_str(&pad_left(&score_cell(label, &review.approvals), 2));
        }
    }
    row
}

/// Patchset bracket tag; drafts carry a star (`[3*]`).
fn patchset_tag(review: &Review) -> String {
    if review.is_draft {
        format!("[{}*]", review.patchset_number)
    } else {
        format!("[{}]", review.patchset_number)
    }
}

/// Collapse all approvals for one label into its display cell.
///
/// A score at or past the rejection threshold always wins, so a single
/// veto overrides any approval. Otherwise a score at or past the approval
/// threshold shows the approved glyph; otherwise the minimum value shows,
/// signed.
pub fn score_cell(label: &Label, approvals: &[Approval]) -> String {
    let values: Vec<i32> = approvals
        .iter()
        .filter(|a| a.label == label.name)
        .map(|a| a.value)
        .collect();

    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return " ".to_string();
    };

    if min <= label.rejected {
        REJECTED_GLYPH.to_string()
    } else if max >= label.approved {
        APPROVED_GLYPH.to_string()
    } else if min > 0 {
        format!("+{}", min)
    } else {
        min.to_string()
    }
}

const MINUTE: u64 = 60;
const HOUR: u64 = 3_600;
const DAY: u64 = 86_400;
const MONTH: u64 = 2_592_000;
const YEAR: u64 = 31_536_000;

/// Render an age in seconds using its largest applicable unit.
///
/// The year unit only applies past ~371 days; ages just over twelve months
/// still read as "12 months". Counts of 1 and 2 stay singular.
pub fn relative_age(age: u64) -> String {
    let (count, unit) = if age as f64 > YEAR as f64 * 1.018 {
        (age / YEAR, "year")
    } else if age >= MONTH {
        (age / MONTH, "month")
    } else if age >= DAY {
        (age / DAY, "day")
    } else if age >= HOUR {
        (age / HOUR, "hour")
    } else if age >= MINUTE {
        (age / MINUTE, "minute")
    } else {
        return "just now".to_string();
    };

    if count > 2 {
        format!("{} {}s", count, unit)
    } else {
        format!("{} {}", count, unit)
    }
}

/// Truncate to at most `max_width` terminal columns, marking any cut with
/// `…`. Wide glyphs (CJK, emoji) count by their rendered column width.
pub fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > target {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

fn pad_right(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(text_width)))
}

fn pad_left(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    format!("{}{}", " ".repeat(width.saturating_sub(text_width)), text)
}
