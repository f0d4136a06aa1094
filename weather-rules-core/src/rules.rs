use serde::{Deserialize, Serialize};

use crate::{
    error::ThresholdError,
    model::{Forecast, Period},
    predicate::{
        Comparison, ElementPredicate, Path, Predicate, ScopedOperand, Sequence, every,
        greater_than, less_than, not, or,
    },
};

pub const HOT_TODAY: &str = "HOT_TODAY";
pub const COLD_TODAY: &str = "COLD_TODAY";
pub const MODERATE_TODAY: &str = "MODERATE_TODAY";
pub const GETTING_COLDER: &str = "GETTING_COLDER";

/// Temperature of period 0.
pub const TODAY_TEMPERATURE: Path<Forecast> =
    Path::new("properties.periods[0].temperature", today_temperature);

pub const PERIOD_TEMPERATURE: Path<Period> = Path::new("temperature", period_temperature);

pub const PERIODS: Sequence<Forecast, Period> = Sequence::new("properties.periods", periods);

fn today_temperature(forecast: &Forecast) -> Option<f64> {
    forecast.today()?.temperature
}

fn period_temperature(period: &Period) -> Option<f64> {
    period.temperature
}

fn periods(forecast: &Forecast) -> &[Period] {
    forecast.periods()
}

/// Temperature bounds for the "today" rules, in the forecast's unit.
///
/// Always satisfies `cold <= hot`, so HOT_TODAY and COLD_TODAY can never
/// both hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdsRepr", into = "ThresholdsRepr")]
pub struct Thresholds {
    hot: f64,
    cold: f64,
}

impl Thresholds {
    /// `hot`: strictly above is hot. `cold`: strictly below is cold.
    pub fn new(hot: f64, cold: f64) -> Result<Self, ThresholdError> {
        if !hot.is_finite() || !cold.is_finite() {
            return Err(ThresholdError::NotFinite { hot, cold });
        }
        if cold > hot {
            return Err(ThresholdError::Inverted { hot, cold });
        }
        Ok(Self { hot, cold })
    }

    pub fn hot(&self) -> f64 {
        self.hot
    }

    pub fn cold(&self) -> f64 {
        self.cold
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hot: 75.0,
            cold: 50.0,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ThresholdsRepr {
    hot: f64,
    cold: f64,
}

impl Default for ThresholdsRepr {
    fn default() -> Self {
        Thresholds::default().into()
    }
}

impl From<Thresholds> for ThresholdsRepr {
    fn from(t: Thresholds) -> Self {
        Self {
            hot: t.hot,
            cold: t.cold,
        }
    }
}

impl TryFrom<ThresholdsRepr> for Thresholds {
    type Error = ThresholdError;

    fn try_from(repr: ThresholdsRepr) -> Result<Self, Self::Error> {
        Thresholds::new(repr.hot, repr.cold)
    }
}

/// A named predicate over a forecast.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    predicate: Predicate<Forecast>,
}

impl Rule {
    pub fn new(name: &'static str, predicate: Predicate<Forecast>) -> Self {
        Self { name, predicate }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn predicate(&self) -> &Predicate<Forecast> {
        &self.predicate
    }
}

/// Immutable registry of the rules evaluated against every forecast.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(thresholds: Thresholds) -> Self {
        let hot_today = greater_than(TODAY_TEMPERATURE, thresholds.hot());
        let cold_today = less_than(TODAY_TEMPERATURE, thresholds.cold());
        let moderate_today = not(or(hot_today.clone(), cold_today.clone()));
        let getting_colder = every(PERIODS, colder_than_today());

        Self {
            rules: vec![
                Rule::new(HOT_TODAY, hot_today),
                Rule::new(COLD_TODAY, cold_today),
                Rule::new(MODERATE_TODAY, moderate_today),
                Rule::new(GETTING_COLDER, getting_colder),
            ],
        }
    }

    pub fn standard() -> Self {
        Self::new(Thresholds::default())
    }

    /// Add a rule while building the set, replacing any rule of the same name.
    #[cfg(test)]
    pub(crate) fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.retain(|r| r.name != rule.name);
        self.rules.push(rule);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// A period is no warmer than today.
///
/// Only meaningful inside a quantifier over [`PERIODS`], so it is not
/// registered as a rule of its own.
pub fn colder_than_today() -> ElementPredicate<Period, Forecast> {
    ElementPredicate::compare(
        Comparison::LessThanOrEquals,
        ScopedOperand::Current(PERIOD_TEMPERATURE),
        ScopedOperand::Document(TODAY_TEMPERATURE),
    )
}
