//! CLI Module
//!
//! Command-line interface for coursewise using Clap v4.

mod commands;

pub use commands::load_config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::{Grade, QuestionId};
use crate::config::Config;
use crate::wizard::RequirementField;

/// coursewise - course recommendations and GPA calculator in the terminal
#[derive(Parser, Debug)]
#[command(name = "coursewise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (creates log files in .coursewise/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive wizard (default)
    Tui,

    /// Run the whole wizard non-interactively and print recommendations
    Run {
        /// Transcript PDF to upload (sample data when omitted)
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Answer a question, e.g. `--answer 0=yes` (at least one)
        #[arg(short, long = "answer", value_parser = parse_answer)]
        answers: Vec<AnswerArg>,

        /// Set a requirement, e.g. `--require total_credits=128 --require math=6`
        #[arg(short, long = "require", value_parser = parse_requirement)]
        requirements: Vec<RequirementArg>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Calculate a GPA, e.g. `--grade A:3 --grade B+:4`
    Gpa {
        /// Grade and credits for one course
        #[arg(short, long = "grade", value_parser = parse_grade, required = true)]
        grades: Vec<GradeArg>,

        /// GPA before these courses
        #[arg(long)]
        current_gpa: Option<String>,

        /// Credits earned before these courses
        #[arg(long)]
        current_credits: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that the backend is reachable
    Health,

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show effective configuration
    Config,

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// View recent log entries (requires debug mode)
    View {
        /// Number of lines to show (default: 50)
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerArg {
    pub question_id: QuestionId,
    pub option: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementArg {
    pub field: RequirementField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeArg {
    pub grade: Grade,
    pub credits: String,
}

fn parse_answer(s: &str) -> Result<AnswerArg, String> {
    let (id, option) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=OPTION, got '{}'", s))?;
    let question_id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid question id '{}'", id))?;
    Ok(AnswerArg {
        question_id,
        option: option.trim().to_lowercase(),
    })
}

fn parse_requirement(s: &str) -> Result<RequirementArg, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=CREDITS, got '{}'", s))?;
    let field = RequirementField::from_key(name).ok_or_else(|| {
        let known: Vec<&str> = RequirementField::ALL.iter().map(|f| f.key()).collect();
        format!("unknown requirement '{}' (one of: {})", name, known.join(", "))
    })?;
    Ok(RequirementArg {
        field,
        value: value.trim().to_string(),
    })
}

fn parse_grade(s: &str) -> Result<GradeArg, String> {
    let (grade, credits) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected GRADE:CREDITS, got '{}'", s))?;
    Ok(GradeArg {
        grade: grade.parse()?,
        credits: credits.trim().to_string(),
    })
}

/// Main CLI entry point
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    match cli.command {
        None | Some(Commands::Tui) => commands::cmd_tui(&config).await,
        Some(Commands::Run {
            pdf,
            answers,
            requirements,
            format,
        }) => commands::cmd_run(&config, pdf, answers, requirements, format).await,
        Some(Commands::Gpa {
            grades,
            current_gpa,
            current_credits,
            format,
        }) => commands::cmd_gpa(&config, grades, current_gpa, current_credits, format).await,
        Some(Commands::Health) => commands::cmd_health(&config).await,
        Some(Commands::Init { force }) => commands::cmd_init(force).await,
        Some(Commands::Config) => commands::cmd_config(&config).await,
        Some(Commands::Logs { operation }) => commands::cmd_logs(operation).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_interactive() {
        let cli = Cli::parse_from(["coursewise"]);
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());

        let cli = Cli::parse_from(["coursewise", "-d", "health"]);
        assert!(cli.debug);
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from([
            "coursewise",
            "run",
            "--pdf",
            "transcript.pdf",
            "--answer",
            "0=Yes",
            "-a",
            "3=practical",
            "--require",
            "math=6",
            "--format",
            "json",
        ]);

        let Some(Commands::Run {
            pdf,
            answers,
            requirements,
            format,
        }) = cli.command
        else {
            panic!("expected run command");
        };
        assert_eq!(pdf, Some(PathBuf::from("transcript.pdf")));
        assert_eq!(
            answers,
            vec![
                AnswerArg {
                    question_id: 0,
                    option: "yes".to_string()
                },
                AnswerArg {
                    question_id: 3,
                    option: "practical".to_string()
                },
            ]
        );
        assert_eq!(requirements[0].field, RequirementField::Mathematics);
        assert_eq!(requirements[0].value, "6");
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_gpa_args() {
        let cli = Cli::parse_from([
            "coursewise",
            "gpa",
            "--grade",
            "A:3",
            "-g",
            "b+:4",
            "--current-gpa",
            "3.2",
        ]);

        let Some(Commands::Gpa {
            grades,
            current_gpa,
            current_credits,
            ..
        }) = cli.command
        else {
            panic!("expected gpa command");
        };
        assert_eq!(grades[0].grade, Grade::A);
        assert_eq!(grades[1].grade, Grade::BPlus);
        assert_eq!(grades[1].credits, "4");
        assert_eq!(current_gpa.as_deref(), Some("3.2"));
        assert!(current_credits.is_none());
    }

    #[test]
    fn test_gpa_requires_a_grade() {
        assert!(Cli::try_parse_from(["coursewise", "gpa"]).is_err());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(parse_answer("yes").is_err());
        assert!(parse_answer("x=yes").is_err());
        assert!(parse_requirement("chemistry=4").is_err());
        assert!(parse_grade("E:3").is_err());
        assert!(parse_grade("A3").is_err());
    }

    #[test]
    fn test_logs_view_lines() {
        let cli = Cli::parse_from(["coursewise", "logs", "view", "-n", "20"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Logs {
                operation: LogCommands::View { lines: 20 }
            })
        ));
    }
}
