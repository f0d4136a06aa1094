use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, error::ForecastError, model::Forecast};

pub mod file;
pub mod nws;

pub use file::FileForecastSource;
pub use nws::NwsForecastSource;

/// Where the pipeline gets its forecast document from.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<Forecast, ForecastError>;

    /// Short human-readable origin, e.g. the endpoint URL.
    fn describe(&self) -> String;
}

/// Construct the HTTP source described by config.
pub fn source_from_config(config: &Config) -> Result<Box<dyn ForecastSource>, ForecastError> {
    let source = NwsForecastSource::builder(config.endpoint.clone())
        .user_agent(config.user_agent())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(source))
}
