use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use weather_rules_core::{Period, Report, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rule name → result as a JSON object.
    Json,
    /// Aligned table with the periods evaluated.
    Text,
}

pub fn render_report(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report.results)
            .context("Failed to serialize rule results to JSON"),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &Report) -> String {
    let periods: Vec<String> = report.forecast.periods().iter().map(describe_period).collect();

    let width = report.results.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let rows: String = report
        .results
        .iter()
        .map(|(name, result)| {
            format!("{name:<width$}  {}\n", if result { "yes" } else { "no" })
        })
        .collect();

    format!("Periods: {}\n\n{rows}", periods.join(", "))
}

fn describe_period(period: &Period) -> String {
    let temperature = period.temperature.map(|temp| {
        let unit = period.temperature_unit.as_deref().unwrap_or("");
        format!(" {temp}°{unit}")
    });
    let start = period
        .start_time
        .as_ref()
        .map(|start| format!(" ({})", format_start(start)));

    format!(
        "{}{}{}",
        period.label(),
        temperature.unwrap_or_default(),
        start.unwrap_or_default()
    )
}

fn format_start(start: &DateTime<FixedOffset>) -> String {
    start.format("%a %-d %b %H:%M").to_string()
}

pub fn render_rules(rules: &RuleSet) -> String {
    let width = rules.iter().map(|r| r.name().len()).max().unwrap_or(0);

    rules
        .iter()
        .map(|rule| {
            format!(
                "{:<width$}  {}\n",
                rule.name(),
                rule.predicate().description()
            )
        })
        .collect()
}
