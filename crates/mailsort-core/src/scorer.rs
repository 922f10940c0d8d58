//! Per-category scoring.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::trace;

use crate::category::Category;
use crate::record::RawRecord;
use crate::rules::{MatchInput, RuleSet};

/// Score for every category, in registry order.
///
/// Always holds exactly one entry per category, zero scores included.
/// Scores are `u64` sums of `u32` weights and are never capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoreBreakdown {
    scores: [u64; Category::COUNT],
}

impl ScoreBreakdown {
    /// Score of one category.
    #[must_use]
    pub const fn score(&self, category: Category) -> u64 {
        self.scores[category.display_order()]
    }

    /// `(category, score)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().zip(self.scores.iter().copied())
    }

    /// Highest score and the earliest category holding it.
    ///
    /// Ties resolve to the category that comes first in the registry.
    #[must_use]
    pub fn top(&self) -> (Category, u64) {
        let mut best = (Category::ALL[0], self.scores[0]);
        for (category, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }

    /// Sum of all category scores.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.scores.iter().copied().fold(0, u64::saturating_add)
    }

    /// Whether every category scored zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.scores.iter().all(|&s| s == 0)
    }

    /// Score relative to the top score, in `0.0..=1.0`.
    ///
    /// The divisor is never below one, so an all-zero breakdown yields zero
    /// everywhere.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn relative(&self, category: Category) -> f64 {
        let max = self.scores.iter().copied().max().unwrap_or(0).max(1);
        self.score(category) as f64 / max as f64
    }

    fn add(&mut self, category: Category, weight: u32) {
        self.scores[category.display_order()] += u64::from(weight);
    }
}

/// Serialized as `[{"category": "...", "score": n}, ...]`.
impl Serialize for ScoreBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Entry {
            category: Category,
            score: u64,
        }

        let mut seq = serializer.serialize_seq(Some(Category::COUNT))?;
        for (category, score) in self.iter() {
            seq.serialize_element(&Entry { category, score })?;
        }
        seq.end()
    }
}

/// Raw scorer output: the breakdown plus every matched explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreSheet {
    /// Per-category totals.
    pub breakdown: ScoreBreakdown,
    reasons: [Vec<String>; Category::COUNT],
}

impl ScoreSheet {
    /// Explanations of the rules that fired for a category, in firing order.
    #[must_use]
    pub fn reasons_for(&self, category: Category) -> &[String] {
        &self.reasons[category.display_order()]
    }

    /// Takes the explanations for one category, consuming the sheet.
    #[must_use]
    pub fn into_reasons(self, category: Category) -> Vec<String> {
        let mut reasons = self.reasons;
        std::mem::take(&mut reasons[category.display_order()])
    }
}

/// Evaluates every rule against a record.
///
/// Categories are visited in registry order and rules in definition order.
/// Every fired rule adds its weight and appends its explanation; scores are
/// not capped and several categories may score at once.
#[must_use]
pub fn score(rules: &RuleSet, record: &RawRecord) -> ScoreSheet {
    let input = MatchInput::new(record);
    let mut sheet = ScoreSheet::default();

    for category in Category::ALL {
        for rule in rules.rules_for(category) {
            if let Some(reason) = rule.evaluate(&input) {
                trace!(record = %record.id, rule = rule.id(), weight = rule.weight(), "Rule fired");
                sheet.breakdown.add(category, rule.weight());
                sheet.reasons[category.display_order()].push(reason);
            }
        }
    }

    sheet
}
