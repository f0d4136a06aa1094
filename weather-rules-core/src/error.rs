use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain a usable forecast document.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast unavailable: could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("forecast unavailable: request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("forecast unavailable: {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("forecast unavailable: malformed forecast document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("forecast unavailable: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("path `{path}` did not resolve to a number")]
    Unresolved { path: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule {rule} could not be evaluated: {source}")]
pub struct EvaluationError {
    pub rule: String,
    #[source]
    pub source: PredicateError,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Temperature bounds that would let a day be both hot and cold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("thresholds must be finite numbers (hot = {hot}, cold = {cold})")]
    NotFinite { hot: f64, cold: f64 },

    #[error("cold threshold ({cold}) is above hot threshold ({hot})")]
    Inverted { hot: f64, cold: f64 },
}
