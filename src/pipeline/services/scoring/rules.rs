use crate::error::AnalysisError;
use crate::pipeline::types::{Feature, FeatureVector, MonumentClass};
use serde::{Deserialize, Serialize};

/// Slack allowed when checking that a class's weights sum to at most one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A boolean test over a [`FeatureVector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// `feature > value`
    Above { feature: Feature, value: f64 },
    /// `feature < value`
    Below { feature: Feature, value: f64 },
    /// `min <= feature <= max`
    Within { feature: Feature, min: f64, max: f64 },
    /// `feature > other`
    Exceeds { feature: Feature, other: Feature },
    All { conditions: Vec<Condition> },
}

impl Condition {
    pub fn holds(&self, features: &FeatureVector) -> bool {
        match self {
            Condition::Above { feature, value } => features.get(*feature) > *value,
            Condition::Below { feature, value } => features.get(*feature) < *value,
            Condition::Within { feature, min, max } => {
                let v = features.get(*feature);
                v >= *min && v <= *max
            }
            Condition::Exceeds { feature, other } => {
                features.get(*feature) > features.get(*other)
            }
            Condition::All { conditions } => conditions.iter().all(|c| c.holds(features)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRule {
    pub name: String,
    pub weight: f64,
    pub condition: Condition,
}

impl WeightedRule {
    pub fn new(name: &str, weight: f64, condition: Condition) -> Self {
        Self {
            name: name.to_string(),
            weight,
            condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRules {
    pub class: MonumentClass,
    #[serde(default)]
    pub rules: Vec<WeightedRule>,
}

impl ClassRules {
    /// Sum of the weights of every rule that holds, clamped to `[0, 1]`.
    pub fn score(&self, features: &FeatureVector) -> f64 {
        self.fired(features)
            .map(|rule| rule.weight)
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    pub fn fired<'a>(
        &'a self,
        features: &'a FeatureVector,
    ) -> impl Iterator<Item = &'a WeightedRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.condition.holds(features))
    }

    pub fn total_weight(&self) -> f64 {
        self.rules.iter().map(|rule| rule.weight).sum()
    }
}

/// Per-class weighted predicates, one entry per [`MonumentClass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    pub classes: Vec<ClassRules>,
}

impl RuleTable {
    pub fn rules_for(&self, class: MonumentClass) -> Option<&ClassRules> {
        self.classes.iter().find(|rules| rules.class == class)
    }

    pub fn validate(&self) -> Result<(), String> {
        for class in MonumentClass::ALL {
            let count = self.classes.iter().filter(|r| r.class == class).count();
            if count == 0 {
                return Err(format!("no rules for {}", class));
            }
            if count > 1 {
                return Err(format!("{} is listed {} times", class, count));
            }
        }

        for class_rules in &self.classes {
            for rule in &class_rules.rules {
                if !rule.weight.is_finite() || rule.weight < 0.0 {
                    return Err(format!(
                        "rule '{}' of {} has invalid weight {}",
                        rule.name, class_rules.class, rule.weight
                    ));
                }
            }

            let total = class_rules.total_weight();
            if total > 1.0 + WEIGHT_SUM_TOLERANCE {
                return Err(format!(
                    "weights of {} sum to {} which exceeds 1.0",
                    class_rules.class, total
                ));
            }
        }

        Ok(())
    }

    pub fn validated(self) -> Result<Self, AnalysisError> {
        self.validate().map_err(AnalysisError::InvalidRuleTable)?;
        Ok(self)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        builtin_table()
    }
}

fn above(feature: Feature, value: f64) -> Condition {
    Condition::Above { feature, value }
}

fn below(feature: Feature, value: f64) -> Condition {
    Condition::Below { feature, value }
}

fn within(feature: Feature, min: f64, max: f64) -> Condition {
    Condition::Within { feature, min, max }
}

fn exceeds(feature: Feature, other: Feature) -> Condition {
    Condition::Exceeds { feature, other }
}

fn all(conditions: Vec<Condition>) -> Condition {
    Condition::All { conditions }
}

/// The canonical thresholds and weights.
pub fn builtin_table() -> RuleTable {
    use Feature::*;

    RuleTable {
        classes: vec![
            ClassRules {
                class: MonumentClass::Gateway,
                rules: vec![
                    WeightedRule::new("mid brightness", 0.30, within(Brightness, 90.0, 180.0)),
                    WeightedRule::new(
                        "warm tones",
                        0.25,
                        all(vec![exceeds(AvgR, AvgB), above(AvgR, 100.0)]),
                    ),
                    WeightedRule::new("moderate edges", 0.25, within(EdgeDensity, 8.0, 30.0)),
                    WeightedRule::new("structured contrast", 0.20, within(Contrast, 30.0, 70.0)),
                ],
            },
            ClassRules {
                class: MonumentClass::TajMahal,
                rules: vec![
                    WeightedRule::new("very bright", 0.35, above(Brightness, 180.0)),
                    WeightedRule::new(
                        "near white",
                        0.25,
                        all(vec![
                            above(AvgR, 170.0),
                            above(AvgG, 170.0),
                            above(AvgB, 170.0),
                        ]),
                    ),
                    WeightedRule::new(
                        "balanced channels",
                        0.20,
                        all(vec![
                            within(RDominance, 0.9, 1.1),
                            within(GDominance, 0.9, 1.1),
                            within(BDominance, 0.9, 1.1),
                        ]),
                    ),
                    WeightedRule::new("low contrast", 0.20, below(Contrast, 40.0)),
                ],
            },
            ClassRules {
                class: MonumentClass::HawaMahal,
                rules: vec![
                    WeightedRule::new("red dominance", 0.35, above(RDominance, 1.15)),
                    WeightedRule::new(
                        "red leads",
                        0.15,
                        all(vec![exceeds(AvgR, AvgG), exceeds(AvgR, AvgB)]),
                    ),
                    WeightedRule::new(
                        "moderate-high brightness",
                        0.25,
                        within(Brightness, 110.0, 200.0),
                    ),
                    WeightedRule::new("ornate texture", 0.25, above(TextureVariance, 1500.0)),
                ],
            },
            ClassRules {
                class: MonumentClass::SardarPatelStatue,
                rules: vec![
                    WeightedRule::new("dark", 0.35, below(Brightness, 100.0)),
                    WeightedRule::new("tall frame", 0.35, above(AspectRatio, 1.2)),
                    WeightedRule::new("little blue", 0.30, below(BDominance, 0.95)),
                ],
            },
            ClassRules {
                class: MonumentClass::MysorePalace,
                rules: vec![
                    WeightedRule::new("green dominance", 0.30, above(GDominance, 1.05)),
                    WeightedRule::new(
                        "gold tones",
                        0.20,
                        all(vec![
                            above(AvgR, 120.0),
                            above(AvgG, 110.0),
                            exceeds(AvgG, AvgB),
                        ]),
                    ),
                    WeightedRule::new(
                        "moderate-high brightness",
                        0.25,
                        within(Brightness, 120.0, 210.0),
                    ),
                    WeightedRule::new("ornate texture", 0.25, above(TextureVariance, 1200.0)),
                ],
            },
        ],
    }
}
