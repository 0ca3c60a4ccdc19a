use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gerrit-review", about = "Gerrit code review listings and actions over ssh")]
pub struct Cli {
    /// Free-text Gerrit search filter (defaults to "status:open").
    /// Shorthand for `list <filter>`.
    pub filter: Option<String>,

    /// Git remote carrying the Gerrit ssh URL.
    #[arg(short, long, default_value = "origin")]
    pub remote: String,

    /// Override the ssh user@host derived from the remote.
    #[arg(long)]
    pub host: Option<String>,

    /// Override the Gerrit ssh port (default 29418).
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the project name derived from the remote.
    #[arg(short, long)]
    pub project: Option<String>,

    /// Report width in columns (defaults to the terminal width).
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Extra options spliced into the query command line.
    #[arg(long)]
    pub options: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List reviews matching a filter (default).
    List(ListArgs),
    /// Score the Code-Review label on a revision.
    Review(ScoreArgs),
    /// Score the Verified label on a revision.
    Verify(ScoreArgs),
    /// Submit a change for merging.
    Submit(RevisionArgs),
    /// Abandon a change.
    Abandon(AbandonArgs),
    /// Publish a draft patchset.
    Publish(RevisionArgs),
    /// Delete a draft patchset.
    DeleteDraft(RevisionArgs),
    /// Add reviewers to a change.
    SetReviewers(SetReviewersArgs),
    /// Push HEAD for review on a target branch.
    Push(PushArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Gerrit search filter, e.g. "status:open" or "owner:self".
    pub filter: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Revision (commit sha) or change-id to score.
    pub revision: String,

    /// Score value, e.g. +2 or -1.
    #[arg(allow_hyphen_values = true)]
    pub score: i32,

    /// Cover message posted with the score.
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args, Debug)]
pub struct RevisionArgs {
    /// Revision (commit sha) or change-id to act on.
    pub revision: String,
}

#[derive(Args, Debug)]
pub struct AbandonArgs {
    /// Revision (commit sha) or change-id to abandon.
    pub revision: String,

    /// Reason posted with the abandon.
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetReviewersArgs {
    /// Change-id to add reviewers to.
    pub change_id: String,

    /// Reviewers to add (username or email).
    #[arg(required = true)]
    pub reviewers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Target branch (defaults to the remote's default branch).
    pub branch: Option<String>,

    /// Push as a draft (refs/drafts/ instead of refs/for/).
    #[arg(short, long)]
    pub draft: bool,
}

/// Parse CLI arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
