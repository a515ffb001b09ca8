use super::rules::RuleTable;
use crate::error::AnalysisError;
use crate::pipeline::types::{ClassificationResult, FeatureVector, MonumentClass, ScoreMap};
use tracing::debug;

/// Applies a [`RuleTable`] to feature vectors. The default engine uses the
/// built-in table.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    table: RuleTable,
}

impl ScoringEngine {
    pub fn new(table: RuleTable) -> Result<Self, AnalysisError> {
        Ok(Self {
            table: table.validated()?,
        })
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn score(&self, features: &FeatureVector) -> ScoreMap {
        ScoreMap::from_fn(|class| {
            self.table
                .rules_for(class)
                .map(|rules| rules.score(features))
                .unwrap_or(0.0)
        })
    }

    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let scores = self.score(features);
        for (class, score) in scores.iter() {
            debug!(
                "{}: {:.2} from [{}]",
                class,
                score,
                self.fired_rule_names(class, features).join(", ")
            );
        }
        ClassificationResult::from_scores(scores)
    }

    /// Names of the rules of `class` that hold for `features`.
    pub fn fired_rule_names(&self, class: MonumentClass, features: &FeatureVector) -> Vec<&str> {
        self.table
            .rules_for(class)
            .map(|rules| {
                rules
                    .rules
                    .iter()
                    .filter(|rule| rule.condition.holds(features))
                    .map(|rule| rule.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
