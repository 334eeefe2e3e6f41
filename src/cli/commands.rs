//! CLI subcommands: tui, run, gpa, health, init, config, logs, and config loading.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{AnswerArg, GradeArg, LogCommands, OutputFormat, RequirementArg};
use crate::api::{Backend, HttpBackend};
use crate::config::{Config, UiConfig};
use crate::wizard::{
    format_credits, format_gpa, format_score, Action, Controller, Edit, InputTarget,
};

/// Load configuration from file or defaults
pub async fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)?
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()?
    };

    // Validate configuration
    config.validate()?;

    Ok(config)
}

fn connect(config: &Config) -> Result<Arc<dyn Backend>> {
    let backend = HttpBackend::new(&config.backend).context("Failed to build HTTP client")?;
    tracing::debug!("Using backend at {}", backend.base_url());
    Ok(Arc::new(backend))
}

/// Nobody watches the status line in one-shot commands, so skip the pause
fn headless_ui(config: &Config) -> UiConfig {
    UiConfig {
        transition_delay_ms: 0,
        ..config.ui.clone()
    }
}

/// Start the interactive wizard
pub(crate) async fn cmd_tui(config: &Config) -> Result<()> {
    let backend = connect(config)?;
    crate::tui::run(config, backend).await
}

/// Drive the whole wizard from command-line arguments
pub(crate) async fn cmd_run(
    config: &Config,
    pdf: Option<PathBuf>,
    answers: Vec<AnswerArg>,
    requirements: Vec<RequirementArg>,
    format: OutputFormat,
) -> Result<()> {
    let mut controller = Controller::new(connect(config)?, headless_ui(config));

    let acquire = match pdf {
        Some(path) => Action::UploadFile(path),
        None => Action::UseSampleData,
    };
    controller.dispatch(acquire).await?;
    let loaded = controller.status().map(|s| s.text.clone());

    for answer in answers {
        controller
            .dispatch(Action::SelectOption {
                question_id: answer.question_id,
                option: answer.option,
            })
            .await?;
    }
    controller.dispatch(Action::SubmitAnswers).await?;

    for requirement in requirements {
        controller
            .dispatch(Action::Edit {
                target: InputTarget::Requirement(requirement.field),
                edit: Edit::Replace(requirement.value),
            })
            .await?;
    }
    controller.dispatch(Action::SubmitRequirements).await?;

    let wizard = controller.wizard();
    match format {
        OutputFormat::Json => {
            let recommendations: Vec<serde_json::Value> = wizard
                .ranked_recommendations()
                .map(|(rank, rec)| {
                    serde_json::json!({
                        "rank": rank,
                        "code": rec.code,
                        "name": rec.name,
                        "score": rec.score,
                        "description": rec.description(),
                        "reasons": rec.reasons,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "courses_loaded": wizard.courses.len(),
                "interest_scores": wizard.interest_scores,
                "requirements": wizard.requirements,
                "recommendations": recommendations,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if let Some(loaded) = loaded {
                println!("✅ {}\n", loaded);
            }
            if wizard.recommendations.is_empty() {
                println!("No recommendations for these requirements.");
            }
            for (rank, rec) in wizard.ranked_recommendations() {
                println!(
                    "#{} {} ({})  Score: {}",
                    rank,
                    rec.name,
                    rec.code,
                    format_score(rec.score)
                );
                if let Some(description) = rec.description() {
                    println!("   {}", description);
                }
                for (n, reason) in rec.reasons.iter().enumerate() {
                    println!("   {}. {}", n + 1, reason);
                }
                println!();
            }
        }
    }

    Ok(())
}

/// One-shot GPA calculation
pub(crate) async fn cmd_gpa(
    config: &Config,
    grades: Vec<GradeArg>,
    current_gpa: Option<String>,
    current_credits: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut controller = Controller::new(connect(config)?, headless_ui(config));

    for (row, entry) in grades.into_iter().enumerate() {
        if row > 0 {
            controller.dispatch(Action::AddGradeRow).await?;
        }
        controller
            .dispatch(Action::SetGrade {
                row,
                grade: entry.grade,
            })
            .await?;
        controller
            .dispatch(Action::Edit {
                target: InputTarget::Credits(row),
                edit: Edit::Replace(entry.credits),
            })
            .await?;
    }

    for (target, value) in [
        (InputTarget::CurrentGpa, current_gpa),
        (InputTarget::CurrentCredits, current_credits),
    ] {
        if let Some(value) = value {
            controller
                .dispatch(Action::Edit {
                    target,
                    edit: Edit::Replace(value),
                })
                .await?;
        }
    }

    controller.dispatch(Action::CalculateGpa).await?;

    let result = controller
        .gpa()
        .result
        .clone()
        .context("Backend returned no GPA result")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "semester_gpa": result.semester(),
                "cumulative_gpa": result.cumulative(),
                "total_credits": result.total_credits,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("Semester GPA:   {}", format_gpa(result.semester()));
            println!("Cumulative GPA: {}", format_gpa(result.cumulative()));
            println!("Total credits:  {}", format_credits(result.total_credits));
        }
    }

    Ok(())
}

/// Query `/health`
pub(crate) async fn cmd_health(config: &Config) -> Result<()> {
    let backend = connect(config)?;
    let health = backend
        .health()
        .await
        .with_context(|| format!("Backend unreachable at {}", config.backend.base_url))?;

    println!("Backend: {}", config.backend.base_url);
    println!("Status:  {}", health.status);
    if let Some(model) = health.model {
        println!("Model:   {}", model);
    }

    Ok(())
}

/// Initialize configuration file
pub(crate) async fn cmd_init(force: bool) -> Result<()> {
    println!("🎓 coursewise Configuration Initialization\n");

    let config_path = Config::system_config_path();

    // Check if config already exists
    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    // Save default configuration
    Config::default().save(&config_path)?;

    println!("✅ Configuration initialized at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Point backend.base_url at your advisor backend");
    println!("   2. Or set COURSEWISE_BACKEND_URL");
    println!("   3. Run 'coursewise' to start");

    Ok(())
}

/// Show configuration
pub(crate) async fn cmd_config(config: &Config) -> Result<()> {
    println!("🎓 coursewise Configuration\n");
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize config")?
    );
    println!("💡 System config: {}", Config::system_config_path().display());

    Ok(())
}

/// Log management
pub(crate) async fn cmd_logs(operation: LogCommands) -> Result<()> {
    use crate::logging;

    let log_dir = logging::default_log_dir();

    match operation {
        LogCommands::Status => {
            println!("📊 coursewise Logging Status\n");
            println!("Log directory: {}", log_dir.display());

            match logging::log_stats_in(&log_dir)? {
                Some(stats) => {
                    println!("Log files: {}", stats.files);
                    println!("Total size: {:.2} MB", stats.megabytes());
                    if let Some(newest) = logging::get_log_path() {
                        println!("Latest log: {}", newest.display());
                    }
                }
                None => {
                    println!("Status: ❌ No logs found");
                    println!("\n💡 Run with -d to write logs to {}", log_dir.display());
                }
            }
        }

        LogCommands::View { lines } => match logging::get_log_path() {
            Some(log_path) => {
                println!("📜 Last {} lines of {}\n", lines, log_path.display());
                let tail = logging::tail_lines(&log_path, lines)?;
                if tail.is_empty() {
                    println!("(empty log file)");
                }
                for line in tail {
                    println!("{}", line);
                }
            }
            None => println!("❌ No log files found. Run with -d to enable logging."),
        },

        LogCommands::Clean { days } => {
            let removed = logging::cleanup_old_logs(days)?;
            println!("🧹 Removed {} log file(s) older than {} days", removed, days);
        }
    }

    Ok(())
}
