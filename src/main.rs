use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use gerrit_review::cli::{self, Cli, Commands};
use gerrit_review::config::{self, ConnectionConfig};
use gerrit_review::render::LabelSet;
use gerrit_review::{gerrit, parser, render, unix_now};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    match &args.command {
        None => {
            // Top-level usage: gerrit-review [filter]
            handle_list(&args, args.filter.as_deref())?;
        }
        Some(Commands::List(list)) => {
            handle_list(&args, list.filter.as_deref().or(args.filter.as_deref()))?;
        }
        Some(Commands::Review(score)) => {
            let config = connect(&args)?;
            gerrit::code_review(&config, &score.revision, score.score, score.message.as_deref())?;
            println!("✓ Code-Review {:+} on {}", score.score, score.revision);
        }
        Some(Commands::Verify(score)) => {
            let config = connect(&args)?;
            gerrit::verify(&config, &score.revision, score.score)?;
            println!("✓ Verified {:+} on {}", score.score, score.revision);
        }
        Some(Commands::Submit(rev)) => {
            let config = connect(&args)?;
            gerrit::submit(&config, &rev.revision)?;
            println!("✓ Submitted {}", rev.revision);
        }
        Some(Commands::Abandon(abandon)) => {
            let config = connect(&args)?;
            gerrit::abandon(&config, &abandon.revision, abandon.message.as_deref())?;
            println!("✓ Abandoned {}", abandon.revision);
        }
        Some(Commands::Publish(rev)) => {
            let config = connect(&args)?;
            gerrit::publish(&config, &rev.revision)?;
            println!("✓ Published {}", rev.revision);
        }
        Some(Commands::DeleteDraft(rev)) => {
            let config = connect(&args)?;
            gerrit::delete_draft(&config, &rev.revision)?;
            println!("✓ Deleted draft {}", rev.revision);
        }
        Some(Commands::SetReviewers(set)) => {
            let config = connect(&args)?;
            gerrit::set_reviewers(&config, &set.change_id, &set.reviewers)?;
            println!("✓ Added {} reviewer(s) to {}", set.reviewers.len(), set.change_id);
        }
        Some(Commands::Push(push)) => {
            let branch = match &push.branch {
                Some(branch) => branch.clone(),
                None => gerrit::default_branch(&args.remote)?,
            };
            gerrit::push_for_review(&args.remote, &branch, push.draft)?;
            println!("✓ Pushed HEAD for review on {}", branch);
        }
    }

    Ok(())
}

/// Query matching reviews and print the rendered section.
fn handle_list(args: &Cli, filter: Option<&str>) -> Result<()> {
    let config = connect(args)?;
    let width = args.width.or_else(terminal_width).unwrap_or(80);

    let raw = gerrit::query_reviews(&config, filter, args.options.as_deref())
        .context("gerrit query failed")?;
    let reviews = parser::parse_reviews(&raw);

    print!(
        "{}",
        render::render_section("Reviews", &reviews, &LabelSet::default(), width, unix_now())
    );
    Ok(())
}

/// Resolve the connection from the git remote plus CLI overrides.
fn connect(args: &Cli) -> Result<ConnectionConfig> {
    config::discover(
        &args.remote,
        args.host.as_deref(),
        args.port,
        args.project.as_deref(),
    )
    .map_err(Into::into)
}

fn terminal_width() -> Option<usize> {
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
}
