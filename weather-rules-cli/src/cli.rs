use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, CustomUserError, Text, validator::Validation};
use weather_rules_core::{
    Config, FileForecastSource, ForecastSource, Pipeline, Thresholds,
    source::{nws::DEFAULT_USER_AGENT, source_from_config},
};

use crate::output::{self, OutputFormat};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-rules",
    version,
    about = "Evaluate weather rules against an NWS forecast"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the forecast and evaluate every rule.
    Evaluate {
        /// Forecast endpoint; defaults to the configured one.
        #[arg(long)]
        url: Option<String>,

        /// Read a saved forecast document instead of fetching one.
        #[arg(long, conflicts_with = "url")]
        input: Option<PathBuf>,

        /// Number of leading periods the rules look at.
        #[arg(long)]
        periods: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// List the rules and what each one checks.
    Rules,

    /// Interactively edit and save the configuration.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Evaluate {
                url,
                input,
                periods,
                format,
            } => {
                let mut config = Config::load()?;
                if let Some(url) = url {
                    config.endpoint = url;
                }
                if let Some(periods) = periods {
                    config.periods_kept = periods;
                }
                config.validate()?;
                tracing::debug!(
                    endpoint = %config.endpoint,
                    periods = config.periods_kept,
                    "resolved configuration"
                );

                let source: Box<dyn ForecastSource> = match input {
                    Some(path) => Box::new(FileForecastSource::new(path)),
                    None => source_from_config(&config)?,
                };

                let pipeline = Pipeline::new(config.rule_set(), config.periods_kept);
                let report = pipeline.run(source.as_ref()).await.with_context(|| {
                    format!("Failed to evaluate rules against {}", source.describe())
                })?;

                println!("{}", output::render_report(&report, format)?);
            }
            Command::Rules => {
                let config = Config::load()?;
                print!("{}", output::render_rules(&config.rule_set()));
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let endpoint = Text::new("Forecast endpoint URL:")
        .with_default(&config.endpoint)
        .with_help_message("An api.weather.gov gridpoint forecast URL")
        .prompt()?;

    let user_agent = Text::new("User-Agent:")
        .with_default(config.user_agent())
        .with_help_message("NWS asks for contact details, e.g. `my-app (me@example.com)`")
        .prompt()?;

    let periods_kept = CustomType::<usize>::new("Periods to evaluate:")
        .with_default(config.periods_kept)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let hot = CustomType::<f64>::new("Hot above:")
        .with_default(config.thresholds.hot())
        .with_error_message("Please enter a number")
        .prompt()?;

    let cold = CustomType::<f64>::new("Cold below:")
        .with_default(config.thresholds.cold())
        .with_error_message("Please enter a number")
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number")
        .with_validator(|secs: &u64| -> Result<Validation, CustomUserError> {
            Ok(if *secs == 0 {
                Validation::Invalid("Timeout must be at least 1 second".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()?;

    config.endpoint = endpoint;
    config.user_agent = (user_agent != DEFAULT_USER_AGENT).then_some(user_agent);
    config.periods_kept = periods_kept;
    config.thresholds = Thresholds::new(hot, cold)?;
    config.timeout_secs = timeout_secs;

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
