use gerrit_review::parser::parse_reviews;
use gerrit_review::render::{LabelSet, render_report};

const SCORED: &str = r#"{"project":"demo","branch":"master","id":"Iaaa","number":101,"subject":"Add retry to the uploader","owner":{"name":"Jane Doe"},"url":"https://review.example.com/101","lastUpdated":1736208000,"currentPatchSet":{"number":2,"approvals":[{"type":"Code-Review","value":"2","by":{"name":"Rex"}},{"type":"Code-Review","value":"-1","by":{"name":"Kim"}}],"sizeInsertions":40,"sizeDeletions":-3}}"#;
const UNSCORED: &str = r#"{"project":"demo","branch":"master","id":"Ibbb","number":102,"subject":"Fix flag parsing","owner":{"name":"Sam Lee"},"url":"https://review.example.com/102","lastUpdated":1736208000,"currentPatchSet":{"number":1,"sizeInsertions":5,"sizeDeletions":0}}"#;
const STATS: &str = r#"{"type":"stats","rowCount":3,"runTimeMilliseconds":9,"moreChanges":false}"#;

fn query_output() -> String {
    format!("{}\n{}\n{}\n", SCORED, UNSCORED, STATS)
}

#[test]
fn row_count_matches_well_formed_objects_only() {
    let reviews = parse_reviews(&query_output());
    assert_eq!(reviews.len(), 2);

    let report = render_report(&reviews, &LabelSet::default(), 100, 1736208030);
    // One header row plus one row per review
    assert_eq!(report.lines().count(), 3);
}

#[test]
fn approved_glyph_shows_when_max_clears_the_bar_without_a_veto() {
    let reviews = parse_reviews(&query_output());
    let report = render_report(&reviews, &LabelSet::default(), 100, 1736208030);
    let lines: Vec<&str> = report.lines().collect();

    // min = -1 does not reach -2, max = 2 reaches +2: approved glyph
    let scored_row = lines[1];
    assert!(scored_row.starts_with("101"));
    assert_eq!(scored_row.trim_end().chars().last(), Some('✔'));

    // No approvals at all: blank score cells
    let unscored_row = lines[2];
    assert!(unscored_row.starts_with("102"));
    assert!(!unscored_row.contains('✔'));
    assert!(!unscored_row.contains('✖'));
}

#[test]
fn a_single_veto_blocks_the_approved_glyph() {
    let vetoed = r#"{"number":103,"subject":"s","owner":{"name":"o"},"currentPatchSet":{"number":1,"approvals":[{"type":"Code-Review","value":"2"},{"type":"Code-Review","value":"-2"}]}}"#;
    let reviews = parse_reviews(vetoed);
    let report = render_report(&reviews, &LabelSet::default(), 100, 0);
    assert!(report.contains('✖'));
    assert!(!report.contains('✔'));
}

#[test]
fn columns_follow_the_width_tiers() {
    let reviews = parse_reviews(&query_output());
    let labels = LabelSet::default();

    let narrow = render_report(&reviews, &labels, 80, 1736208030);
    assert!(!narrow.contains("CR"));
    assert!(!narrow.contains("+40"));

    let scores = render_report(&reviews, &labels, 90, 1736208030);
    assert!(scores.contains("CR"));
    assert!(!scores.contains("+40"));

    let sizes = render_report(&reviews, &labels, 100, 1736208030);
    assert!(sizes.contains("+40"));
    assert!(sizes.contains("-3"));
    assert!(!sizes.contains("just now"));

    let updated = render_report(&reviews, &labels, 120, 1736208030);
    assert!(updated.contains("just now"));
    assert!(!updated.contains("master"));

    let full = render_report(&reviews, &labels, 140, 1736208030);
    assert!(full.contains("master"));
    assert!(full.contains("Branch"));
}

#[test]
fn parsed_fields_match_the_source_values() {
    let reviews = parse_reviews(SCORED);
    assert_eq!(reviews.len(), 1);

    let review = &reviews[0];
    assert_eq!(review.number, 101);
    assert_eq!(review.subject, "Add retry to the uploader");
    assert_eq!(review.owner_name, "Jane Doe");
    assert_eq!(review.branch, "master");
    assert_eq!(review.patchset_number, 2);
    assert_eq!(review.size_insertions, 40);
    assert_eq!(review.size_deletions, -3);
    assert_eq!(review.id, "Iaaa");
}

#[test]
fn empty_result_still_renders_a_header() {
    let report = render_report(&parse_reviews(STATS), &LabelSet::default(), 100, 0);
    assert_eq!(report.lines().count(), 1);
    assert!(report.starts_with("Number"));
}
