use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::{error::ForecastError, model::Forecast};

use super::ForecastSource;

/// A forecast document saved on disk, e.g. with `curl > forecast.json`.
#[derive(Debug, Clone)]
pub struct FileForecastSource {
    path: PathBuf,
}

impl FileForecastSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ForecastSource for FileForecastSource {
    async fn fetch(&self) -> Result<Forecast, ForecastError> {
        info!(path = %self.path.display(), "reading forecast");

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ForecastError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(serde_json::from_str(&body)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
