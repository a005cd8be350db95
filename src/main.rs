mod config;
mod db;
mod error;
mod logging;
mod models;
mod repl;
mod session;

use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use config::Settings;
use db::{Database, QuestionStore};
use error::Result;
use models::{JsonOutput, ResultBreakdown};
use repl::{render, Repl};

#[derive(Parser)]
#[command(name = "interview")]
#[command(about = "Run technical interviews and keep track of the answers")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Database file (overrides INTERVIEW_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Manage topics
    #[command(subcommand)]
    Topic(TopicCommands),

    /// List topics that have questions
    Topics,

    /// List interviewed candidates
    Candidates,

    /// Show the answers recorded for a candidate
    Answers {
        /// Candidate ID
        candidate: i64,
    },

    /// Show the outcome breakdown for a candidate
    Stats {
        /// Candidate ID
        candidate: i64,
    },

    /// Start the interactive interview shell (default)
    Interview,
}

#[derive(Subcommand)]
enum TopicCommands {
    /// Add a new topic
    Add {
        /// Topic name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(e) = run(cli) {
        tracing::error!(error = ?e, "run failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(output: &JsonOutput<T>) -> Result<()> {
    println!("{}", serde_json::to_string(output)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.db);
    settings.apply_color();
    debug!(db = %settings.db_path.display(), "opening database");

    let db = Database::open(&settings.db_path)?;
    db.init()?;

    let mut stdout = std::io::stdout().lock();

    match cli.command.unwrap_or(Commands::Interview) {
        Commands::Init => {
            if cli.json {
                print_json(&JsonOutput::<()>::ok(()))?;
            } else {
                println!("Database initialized at: {}", settings.db_path.display());
            }
        }

        Commands::Topic(TopicCommands::Add { name }) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(error::Error::InvalidInput(
                    "Topic name cannot be empty.".to_string(),
                ));
            }
            let id = db.add_topic(name)?;
            if cli.json {
                print_json(&JsonOutput::ok(serde_json::json!({
                    "id": id,
                    "name": name
                })))?;
            } else {
                println!("Added topic '{}' with ID: {}", name, id);
            }
        }

        Commands::Topics => {
            let topics = db.list_topics_with_questions()?;
            if cli.json {
                print_json(&JsonOutput::ok(&topics))?;
            } else {
                render::topics(&mut stdout, &topics)?;
            }
        }

        Commands::Candidates => {
            let candidates = db.list_candidates()?;
            if cli.json {
                print_json(&JsonOutput::ok(&candidates))?;
            } else {
                render::candidates(&mut stdout, &candidates)?;
            }
        }

        Commands::Answers { candidate } => {
            if db.get_candidate(candidate)?.is_none() {
                return candidate_not_found(cli.json);
            }
            let answers = db.answers_for_candidate(candidate)?;
            if cli.json {
                print_json(&JsonOutput::ok(&answers))?;
            } else {
                render::answers(&mut stdout, &answers)?;
            }
        }

        Commands::Stats { candidate } => {
            let Some(found) = db.get_candidate(candidate)? else {
                return candidate_not_found(cli.json);
            };
            let breakdown = ResultBreakdown::from_counts(&db.result_counts(candidate)?);
            if cli.json {
                print_json(&JsonOutput::ok(serde_json::json!({
                    "candidate": found,
                    "stats": breakdown
                })))?;
            } else {
                println!("Candidate: {} ({})", found.name, found.date);
                render::stats(&mut stdout, &breakdown)?;
            }
        }

        Commands::Interview => {
            let editor = DefaultEditor::new()?;
            let mut shell = Repl::new(&db, editor, &mut stdout, settings.ps1.as_str());
            shell.run()?;
        }
    }

    stdout.flush()?;
    Ok(())
}

fn candidate_not_found(json: bool) -> Result<()> {
    if json {
        print_json(&JsonOutput::<()>::err("Candidate not found"))
    } else {
        println!("Candidate not found.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn no_subcommand_means_interview() {
            let cli = Cli::try_parse_from(["interview"]).unwrap();
            assert!(!cli.json);
            assert!(cli.db.is_none());
            assert!(cli.command.is_none());
        }

        #[test]
        fn parse_init_with_json() {
            let cli = Cli::try_parse_from(["interview", "--json", "init"]).unwrap();
            assert!(cli.json);
            assert!(matches!(cli.command, Some(Commands::Init)));
        }

        #[test]
        fn parse_db_flag_after_subcommand() {
            let cli =
                Cli::try_parse_from(["interview", "topics", "--db", "/tmp/x.db"]).unwrap();
            assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
            assert!(matches!(cli.command, Some(Commands::Topics)));
        }

        #[test]
        fn parse_topic_add() {
            let cli = Cli::try_parse_from(["interview", "topic", "add", "data structures"])
                .unwrap();
            match cli.command {
                Some(Commands::Topic(TopicCommands::Add { name })) => {
                    assert_eq!(name, "data structures");
                }
                _ => panic!("Expected Topic Add command"),
            }
        }

        #[test]
        fn parse_answers_and_stats() {
            let cli = Cli::try_parse_from(["interview", "answers", "7"]).unwrap();
            assert!(matches!(
                cli.command,
                Some(Commands::Answers { candidate: 7 })
            ));

            let cli = Cli::try_parse_from(["interview", "stats", "3"]).unwrap();
            assert!(matches!(cli.command, Some(Commands::Stats { candidate: 3 })));
        }

        #[test]
        fn parse_answers_requires_numeric_id() {
            assert!(Cli::try_parse_from(["interview", "answers", "jane"]).is_err());
            assert!(Cli::try_parse_from(["interview", "stats"]).is_err());
        }

        #[test]
        fn parse_explicit_interview() {
            let cli = Cli::try_parse_from(["interview", "interview"]).unwrap();
            assert!(matches!(cli.command, Some(Commands::Interview)));
        }
    }
}
