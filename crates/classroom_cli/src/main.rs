//! Command-line front end for the classroom core.
//!
//! # Responsibility
//! - Parse configuration from flags and `CLASSROOM_*` environment variables.
//! - Normalize email arguments before they reach the core.
//! - Print successful results as JSON on stdout and failures as a JSON
//!   status body on stderr.

use clap::{Parser, Subcommand};
use classroom_core::db::{open_db, DbError};
use classroom_core::{
    core_version, default_log_level, init_logging, logging_status, normalize_email,
    normalize_emails, ping, seed_demo_data, sqlite_teacher_service, RepoError, ServiceError,
};
use log::info;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "classroom", version, about = "Teacher and student roster administration")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "CLASSROOM_DB", default_value = "classroom.sqlite3")]
    db: PathBuf,
    /// Log level: trace, debug, info, warn or error.
    #[arg(long, env = "CLASSROOM_LOG_LEVEL")]
    log_level: Option<String>,
    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "CLASSROOM_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// Insert demo teachers, students and links.
    Seed,
    /// Register students under a teacher.
    Register {
        #[arg(long)]
        teacher: String,
        #[arg(long = "student", required = true)]
        students: Vec<String>,
    },
    /// List students registered to all given teachers.
    CommonStudents {
        #[arg(long = "teacher", required = true)]
        teachers: Vec<String>,
    },
    /// Suspend a student.
    Suspend {
        #[arg(long)]
        student: String,
    },
    /// List recipients of a notification.
    Notify {
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        notification: String,
    },
}

#[derive(Debug)]
enum CliError {
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Service(ServiceError),
    Output(serde_json::Error),
}

impl CliError {
    fn status_code(&self) -> u16 {
        match self {
            Self::Service(err) => err.kind().status_code(),
            _ => 500,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

#[derive(Serialize)]
struct StudentsBody {
    students: Vec<String>,
}

#[derive(Serialize)]
struct RecipientsBody {
    recipients: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = ErrorBody {
                status: err.status_code(),
                message: err.to_string(),
            };
            match serde_json::to_string(&body) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}", body.message),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_ref() {
        let log_dir = std::path::absolute(log_dir)
            .map_err(|err| CliError::Logging(format!("invalid log directory: {err}")))?;
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(CliError::Logging)?;
    }

    match cli.command {
        Command::Ping => {
            for line in ping_report() {
                println!("{line}");
            }
        }
        Command::Seed => {
            let report = seed_demo_data(&open_db(&cli.db)?)?;
            println!(
                "seeded teachers={} students={} links={}",
                report.teachers, report.students, report.links
            );
        }
        Command::Register { teacher, students } => {
            let conn = open_db(&cli.db)?;
            let outcome = sqlite_teacher_service(&conn)
                .register_students(&normalize_email(&teacher), &normalize_emails(&students))?;
            info!("event=cli_register module=cli status=ok linked={}", outcome.linked);
        }
        Command::CommonStudents { teachers } => {
            let conn = open_db(&cli.db)?;
            let students =
                sqlite_teacher_service(&conn).common_students(&normalize_emails(&teachers))?;
            println!("{}", serde_json::to_string(&StudentsBody { students })?);
        }
        Command::Suspend { student } => {
            let conn = open_db(&cli.db)?;
            sqlite_teacher_service(&conn).suspend_student(&normalize_email(&student))?;
        }
        Command::Notify {
            teacher,
            notification,
        } => {
            let conn = open_db(&cli.db)?;
            let recipients = sqlite_teacher_service(&conn)
                .retrieve_notification_recipients(&normalize_email(&teacher), &notification)?;
            println!("{}", serde_json::to_string(&RecipientsBody { recipients })?);
        }
    }

    Ok(())
}

/// Core health lines; touches no store.
fn ping_report() -> Vec<String> {
    let logging = match logging_status() {
        Some((level, log_dir)) => format!("{level}@{}", log_dir.display()),
        None => "off".to_string(),
    };
    vec![
        format!("classroom_core ping={}", ping()),
        format!("classroom_core version={}", core_version()),
        format!("classroom_core logging={logging}"),
    ]
}
