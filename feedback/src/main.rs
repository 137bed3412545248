//! Feedback CLI.
//!
//! Submits and lists feedback against the configured store, using the same
//! validation and lifecycle as the web form.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use feedback::core::types::FeedbackInput;
use feedback::exit_codes;
use feedback::form::{FeedbackForm, SubmitOutcome};
use feedback::io::config::{DEFAULT_CONFIG_FILE, FeedbackConfig, load_config, write_config};
use feedback::io::store::{OrderSpec, open_store};
use feedback::listing::ListingView;
use feedback::logging;

#[derive(Parser)]
#[command(name = "feedback", version, about = "Collect and review event feedback")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate and store one submission.
    Submit {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        /// 1 to 5. Required, but left to validation so the message matches the form.
        #[arg(long, allow_negative_numbers = true)]
        rating: Option<i64>,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Print every submission, newest first.
    List {
        /// Print in submission order instead (for exports).
        #[arg(long)]
        oldest_first: bool,
    },
}

#[tokio::main]
async fn main() {
    logging::init("warn");
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Submit {
            name,
            email,
            rating,
            comments,
        } => {
            let cfg = load_config(&cli.config)?;
            let input = FeedbackInput {
                name,
                email,
                rating,
                comments,
            };
            cmd_submit(&cfg, input).await
        }
        Command::List { oldest_first } => {
            let cfg = load_config(&cli.config)?;
            let order = if oldest_first {
                OrderSpec::oldest_first()
            } else {
                OrderSpec::newest_first()
            };
            cmd_list(&cfg, order).await
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        println!("init: config exists at {}", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &FeedbackConfig::default())?;
    println!("init: wrote {}", path.display());
    Ok(exit_codes::OK)
}

async fn cmd_submit(cfg: &FeedbackConfig, input: FeedbackInput) -> Result<i32> {
    let store = open_store(&cfg.store)?;
    let form = FeedbackForm::new(store, Duration::from_secs(cfg.form.success_display_secs));
    let mut notices = form.subscribe();
    form.fill(input);

    let code = match form.submit().await {
        SubmitOutcome::Created(record) => {
            println!(
                "submitted: id={} created_at={}",
                record.id,
                record.created_at.to_rfc3339()
            );
            exit_codes::OK
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            exit_codes::REJECTED
        }
        SubmitOutcome::StoreFailed => exit_codes::STORE_FAILED,
        SubmitOutcome::Busy => bail!("form is busy"),
    };

    while let Ok(notice) = notices.try_recv() {
        eprintln!("{}: {}", notice.title, notice.description);
    }
    Ok(code)
}

async fn cmd_list(cfg: &FeedbackConfig, order: OrderSpec) -> Result<i32> {
    let store = open_store(&cfg.store)?;
    let records = store.list_all(order).await?;
    let view = ListingView::from_records(&records);

    println!("{}", view.summary());
    if view.rows().is_empty() {
        println!("No feedback submitted yet");
    }
    for row in view.rows() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.date, row.name, row.email, row.rating, row.comments
        );
    }
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_submit_without_rating() {
        let cli = Cli::parse_from(["feedback", "submit", "--name", "Ada", "--email", "a@b.co"]);
        match cli.command {
            Command::Submit { name, rating, .. } => {
                assert_eq!(name, "Ada");
                assert_eq!(rating, None);
            }
            _ => panic!("expected submit"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::parse_from(["feedback", "list", "--config", "other.toml"]);
        assert!(matches!(cli.command, Command::List { oldest_first: false }));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn parse_list_oldest_first() {
        let cli = Cli::parse_from(["feedback", "list", "--oldest-first"]);
        assert!(matches!(cli.command, Command::List { oldest_first: true }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["feedback", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }
}
