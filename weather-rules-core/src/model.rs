use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A gridpoint forecast document as served by `api.weather.gov`.
///
/// Only the fields the rules look at are typed; everything else is kept in
/// `extra` so a reduced forecast still carries the rest of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub properties: ForecastProperties,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastProperties {
    /// Time-ordered forecast slots, earliest first.
    #[serde(default)]
    pub periods: Vec<Period>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<FixedOffset>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One forecast time slot ("Today", "Tonight", "Tuesday", ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_daytime: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_forecast: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Forecast {
    /// Build a bare forecast from a list of temperatures.
    pub fn from_temperatures(temperatures: impl IntoIterator<Item = f64>) -> Self {
        let periods = temperatures
            .into_iter()
            .enumerate()
            .map(|(i, t)| Period {
                number: u32::try_from(i + 1).ok(),
                temperature: Some(t),
                ..Period::default()
            })
            .collect();

        Self {
            properties: ForecastProperties {
                periods,
                ..ForecastProperties::default()
            },
            extra: Map::new(),
        }
    }

    pub fn periods(&self) -> &[Period] {
        &self.properties.periods
    }

    /// The first period, i.e. "today".
    pub fn today(&self) -> Option<&Period> {
        self.properties.periods.first()
    }
}

impl Period {
    /// Display label, falling back to the period number.
    pub fn label(&self) -> String {
        match (&self.name, self.number) {
            (Some(name), _) => name.clone(),
            (None, Some(n)) => format!("Period {n}"),
            (None, None) => "Period".to_string(),
        }
    }
}
