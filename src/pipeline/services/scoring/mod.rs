pub mod engine;
pub mod rules;

pub use engine::ScoringEngine;
pub use rules::{builtin_table, ClassRules, Condition, RuleTable, WeightedRule};
