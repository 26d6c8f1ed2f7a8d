use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dottie_core::{chat_seed, pattern_info, Pattern, RawAnswers};
use dottie_observability::{init_tracing, AppMetrics};
use dottie_service::{answers_from_session, AssessmentService};
use dottie_storage::Store;

#[derive(Debug, Parser)]
#[command(name = "dottie")]
#[command(about = "Menstrual health assessment CLI")]
struct Cli {
    /// SQLite URL; without it records only live for the current command.
    #[arg(long, env = "DOTTIE_DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify answers without saving them.
    Classify {
        #[command(flatten)]
        answers: AnswerArgs,
        /// Include the evaluated rules in the output.
        #[arg(long)]
        trace: bool,
    },
    /// Show one pattern's catalog entry, or all of them.
    Patterns { pattern: Option<String> },
    /// Classify and persist answers for a user.
    Save {
        #[arg(long)]
        user: String,
        #[command(flatten)]
        answers: AnswerArgs,
    },
    History {
        #[arg(long)]
        user: String,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Print the chat opener for a pattern.
    Seed {
        pattern: String,
    },
}

#[derive(Debug, Args)]
struct AnswerArgs {
    /// JSON object dumped from session storage (string values only).
    #[arg(long, conflicts_with_all = ["age", "cycle_length", "period_duration", "flow", "pain", "predictable", "symptom"])]
    session_file: Option<PathBuf>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    cycle_length: Option<String>,
    #[arg(long)]
    period_duration: Option<String>,
    #[arg(long)]
    flow: Option<String>,
    #[arg(long)]
    pain: Option<String>,
    #[arg(long)]
    predictable: Option<String>,
    #[arg(long = "symptom")]
    symptom: Vec<String>,
}

impl AnswerArgs {
    fn into_answers(self) -> Result<RawAnswers> {
        if let Some(path) = self.session_file {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            let entries: HashMap<String, String> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a flat JSON object", path.display()))?;
            return Ok(answers_from_session(&entries));
        }

        Ok(RawAnswers {
            age: self.age,
            cycle_length: self.cycle_length,
            period_duration: self.period_duration,
            flow_heaviness: self.flow,
            pain_level: self.pain,
            symptoms: self.symptom,
            cycle_predictable: self.predictable,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("dottie_cli");
    let cli = Cli::parse();

    let service = build_service(cli.database_url.as_deref()).await?;

    match cli.command {
        Command::Classify { answers, trace } => {
            let assessment = service.assess(&answers.into_answers()?);
            if trace {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&assessment.result)?);
            }
        }
        Command::Patterns { pattern } => match pattern {
            Some(pattern) => {
                let pattern = parse_pattern(&pattern)?;
                println!("{}", serde_json::to_string_pretty(pattern_info(pattern))?);
            }
            None => {
                let all = Pattern::ALL.into_iter().map(pattern_info).collect::<Vec<_>>();
                println!("{}", serde_json::to_string_pretty(&all)?);
            }
        },
        Command::Save { user, answers } => {
            let stored = service.save(&user, &answers.into_answers()?).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Command::History { user } => {
            let records = service.history(&user).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Show { id } => {
            let stored = service.get(&id).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Command::Delete { id } => {
            service.delete(&id).await?;
            println!("deleted {id}");
        }
        Command::Seed { pattern } => {
            println!("{}", chat_seed(parse_pattern(&pattern)?));
        }
    }

    Ok(())
}

fn parse_pattern(value: &str) -> Result<Pattern> {
    value.parse::<Pattern>().context("invalid pattern")
}

async fn build_service(database_url: Option<&str>) -> Result<AssessmentService<Store>> {
    let store = Store::from_optional_url(database_url).await?;
    AssessmentService::new(Arc::new(store), AppMetrics::shared())
}
