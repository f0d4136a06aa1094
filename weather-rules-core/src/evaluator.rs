use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::EvaluationError,
    model::Forecast,
    rules::RuleSet,
};

/// Rule name → result, one entry per rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evaluation(BTreeMap<String, bool>);

impl Evaluation {
    pub fn get(&self, rule: &str) -> Option<bool> {
        self.0.get(rule).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, result)| (name.as_str(), *result))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, bool> {
        self.0
    }
}

/// Run every rule once against `data`.
///
/// All rules are evaluated even after a failure; if any failed, the first
/// failure is returned and no partial mapping is produced.
pub fn evaluate(rules: &RuleSet, data: &Forecast) -> Result<Evaluation, EvaluationError> {
    let mut results = BTreeMap::new();
    let mut failure = None;

    for rule in rules.iter() {
        match rule.predicate().test(data) {
            Ok(result) => {
                debug!(rule = rule.name(), result, "rule evaluated");
                results.insert(rule.name().to_string(), result);
            }
            Err(source) => {
                warn!(rule = rule.name(), error = %source, "rule failed");
                if failure.is_none() {
                    failure = Some(EvaluationError {
                        rule: rule.name().to_string(),
                        source,
                    });
                }
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(Evaluation(results)),
    }
}
