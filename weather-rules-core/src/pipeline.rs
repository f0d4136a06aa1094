use serde::Serialize;
use tracing::info;

use crate::{
    error::{EvaluationError, PipelineError},
    evaluator::{Evaluation, evaluate},
    model::Forecast,
    reduce::{DEFAULT_PERIODS_KEPT, reduce},
    rules::RuleSet,
    source::ForecastSource,
};

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// The reduced forecast the rules were evaluated against.
    pub forecast: Forecast,
    pub results: Evaluation,
}

/// fetch → reduce → evaluate.
#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: RuleSet,
    periods_kept: usize,
}

impl Pipeline {
    pub fn new(rules: RuleSet, periods_kept: usize) -> Self {
        Self {
            rules,
            periods_kept,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn periods_kept(&self) -> usize {
        self.periods_kept
    }

    pub async fn run(&self, source: &dyn ForecastSource) -> Result<Report, PipelineError> {
        let forecast = source.fetch().await?;
        info!(
            source = %source.describe(),
            periods = forecast.periods().len(),
            "forecast received"
        );

        Ok(self.evaluate_forecast(forecast)?)
    }

    /// The synchronous half of [`Pipeline::run`].
    pub fn evaluate_forecast(&self, forecast: Forecast) -> Result<Report, EvaluationError> {
        let forecast = reduce(forecast, self.periods_kept);
        let results = evaluate(&self.rules, &forecast)?;

        Ok(Report { forecast, results })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(RuleSet::standard(), DEFAULT_PERIODS_KEPT)
    }
}
