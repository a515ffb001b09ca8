use super::MonumentClass;
use crate::error::AnalysisError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One score in `[0, 1]` per monument, iterated in declaration order.
///
/// Deserialization requires exactly one in-range score per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<MonumentClass, f64>",
    into = "IndexMap<MonumentClass, f64>"
)]
pub struct ScoreMap {
    scores: IndexMap<MonumentClass, f64>,
}

impl ScoreMap {
    /// Build a map by asking `score` for every class. Values are clamped to
    /// `[0, 1]`; NaN is treated as zero.
    pub fn from_fn(mut score: impl FnMut(MonumentClass) -> f64) -> Self {
        let scores = MonumentClass::ALL
            .iter()
            .map(|&class| {
                let value = score(class);
                let value = if value.is_nan() { 0.0 } else { value };
                (class, value.clamp(0.0, 1.0))
            })
            .collect();
        Self { scores }
    }

    pub fn get(&self, class: MonumentClass) -> f64 {
        self.scores.get(&class).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonumentClass, f64)> + '_ {
        self.scores.iter().map(|(class, score)| (*class, *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest scoring class. Equal scores resolve to the class declared
    /// first.
    pub fn best(&self) -> (MonumentClass, f64) {
        let mut best = (MonumentClass::ALL[0], self.get(MonumentClass::ALL[0]));
        for (class, score) in self.iter() {
            if score > best.1 {
                best = (class, score);
            }
        }
        best
    }

    /// Classes scoring at least `threshold`, highest first. Equal scores keep
    /// declaration order.
    pub fn at_or_above(&self, threshold: f64) -> Vec<(MonumentClass, f64)> {
        let mut reported: Vec<_> = self.iter().filter(|(_, score)| *score >= threshold).collect();
        reported.sort_by(|a, b| b.1.total_cmp(&a.1));
        reported
    }
}

impl From<ScoreMap> for IndexMap<MonumentClass, f64> {
    fn from(map: ScoreMap) -> Self {
        map.scores
    }
}

impl TryFrom<IndexMap<MonumentClass, f64>> for ScoreMap {
    type Error = AnalysisError;

    fn try_from(scores: IndexMap<MonumentClass, f64>) -> Result<Self, Self::Error> {
        for class in MonumentClass::ALL {
            match scores.get(&class) {
                None => {
                    return Err(AnalysisError::InvalidScores(format!("no score for {}", class)))
                }
                Some(score) if !(0.0..=1.0).contains(score) => {
                    return Err(AnalysisError::InvalidScores(format!(
                        "score {} for {} is outside [0, 1]",
                        score, class
                    )))
                }
                Some(_) => {}
            }
        }

        // Keys are a closed enum, so presence of every class means no extras.
        Ok(Self::from_fn(|class| scores.get(&class).copied().unwrap_or(0.0)))
    }
}

/// Outcome of classifying one photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClassificationRecord")]
pub struct ClassificationResult {
    pub predicted: MonumentClass,
    /// Always equal to `scores.get(predicted)`.
    pub confidence: f64,
    pub scores: ScoreMap,
}

impl ClassificationResult {
    pub fn from_scores(scores: ScoreMap) -> Self {
        let (predicted, confidence) = scores.best();
        Self {
            predicted,
            confidence,
            scores,
        }
    }
}

#[derive(Deserialize)]
struct ClassificationRecord {
    predicted: MonumentClass,
    confidence: f64,
    scores: ScoreMap,
}

impl TryFrom<ClassificationRecord> for ClassificationResult {
    type Error = AnalysisError;

    fn try_from(record: ClassificationRecord) -> Result<Self, Self::Error> {
        let result = Self::from_scores(record.scores);
        if result.predicted != record.predicted || result.confidence != record.confidence {
            return Err(AnalysisError::InvalidScores(format!(
                "{} at {} is not the best score ({} at {})",
                record.predicted, record.confidence, result.predicted, result.confidence
            )));
        }
        Ok(result)
    }
}
