//! Core library for the `weather-rules` CLI.
//!
//! This crate defines:
//! - Forecast document models
//! - Typed predicate combinators and the standard rule set
//! - Forecast sources (NWS over HTTP, saved documents on disk)
//! - The fetch → reduce → evaluate pipeline
//! - Configuration handling
//!
//! It is used by `weather-rules-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod pipeline;
pub mod predicate;
pub mod reduce;
pub mod rules;
pub mod source;

pub use config::Config;
pub use error::{EvaluationError, ForecastError, PipelineError, PredicateError, ThresholdError};
pub use evaluator::{Evaluation, evaluate};
pub use model::{Forecast, ForecastProperties, Period};
pub use pipeline::{Pipeline, Report};
pub use reduce::{DEFAULT_PERIODS_KEPT, reduce};
pub use rules::{RuleSet, Thresholds};
pub use source::{FileForecastSource, ForecastSource, NwsForecastSource};
