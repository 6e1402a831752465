use std::fmt;
use std::sync::Arc;

use study_core::model::{StudentId, SubjectId};
use study_remote::{CardStore, HttpStore, RemoteConfig, SubjectStore};
use study_services::{Severity, StudySessionController};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidStudentId { raw: String },
    InvalidSubjectId { raw: String },
    InvalidApiUrl { raw: String },
    MissingSubjectId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidStudentId { raw } => write!(f, "invalid --student-id value: {raw}"),
            ArgsError::InvalidSubjectId { raw } => write!(f, "invalid --subject-id value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
            ArgsError::MissingSubjectId => write!(f, "cards requires --subject-id"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p study-app -- subjects [--api-url <url>] [--student-id <id>]");
    eprintln!("  cargo run -p study-app -- cards --subject-id <id> [--api-url <url>]");
    eprintln!("  cargo run -p study-app -- check  [--api-url <url>] [--student-id <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8002/api/");
    eprintln!("  --student-id 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_API_URL, STUDY_STUDENT_ID, STUDY_AUTH_TOKEN, STUDY_CSRF_TOKEN");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Subjects,
    Cards,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "subjects" => Some(Self::Subjects),
            "cards" => Some(Self::Cards),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

struct Args {
    config: RemoteConfig,
    student_id: StudentId,
    subject_id: Option<SubjectId>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = RemoteConfig::from_env().map_err(|_| ArgsError::InvalidApiUrl {
            raw: std::env::var("STUDY_API_URL").unwrap_or_default(),
        })?;
        let mut student_id = std::env::var("STUDY_STUDENT_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| StudentId::new(1), StudentId::new);
        let mut subject_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    config.base_url = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidApiUrl { raw: value.clone() })?;
                }
                "--student-id" => {
                    let value = require_value(args, "--student-id")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidStudentId { raw: value.clone() })?;
                    student_id = StudentId::new(parsed);
                }
                "--subject-id" => {
                    let value = require_value(args, "--subject-id")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSubjectId { raw: value.clone() })?;
                    subject_id = Some(SubjectId::new(parsed));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            config,
            student_id,
            subject_id,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Check,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Check,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let store = Arc::new(HttpStore::new(args.config));

    match cmd {
        Command::Subjects => {
            let subjects = store.list_subjects(args.student_id).await?;
            if subjects.is_empty() {
                println!("no subjects for student {}", args.student_id);
                return Ok(());
            }
            for subject in subjects {
                match subject.description() {
                    Some(description) => {
                        println!("{}  {}  {description}", subject.id(), subject.name());
                    }
                    None => println!("{}  {}", subject.id(), subject.name()),
                }
            }
            Ok(())
        }
        Command::Cards => {
            let subject_id = args.subject_id.ok_or(ArgsError::MissingSubjectId)?;
            let cards = store.list_cards(subject_id).await?;
            if cards.is_empty() {
                println!("no cards in subject {subject_id}");
                return Ok(());
            }
            for card in cards {
                println!(
                    "{}  [{}] {}  ({})",
                    card.id, card.difficulty, card.question, card.topic
                );
            }
            Ok(())
        }
        Command::Check => {
            // Drive the whole controller once, the way a UI shell would on
            // startup, and report what a first render would show.
            let subjects: Arc<dyn SubjectStore> = store.clone();
            let cards: Arc<dyn CardStore> = store;
            let mut controller = StudySessionController::new(subjects, cards, args.student_id);
            controller.load().await;

            for notice in controller.drain_notices() {
                match notice.severity() {
                    Severity::Banner => eprintln!("warning: {}", notice.message()),
                    Severity::Blocking => eprintln!("error: {}", notice.message()),
                }
            }

            println!("subjects: {}", controller.subjects().len());
            match controller.selected_subject() {
                Some(subject) => println!("selected: {} ({})", subject.name(), subject.id()),
                None => println!("selected: none (demonstration cards only)"),
            }
            println!(
                "cards: {} total, {} at difficulty {}",
                controller.cards().len(),
                controller.filtered().len(),
                controller.difficulty()
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_remote=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
