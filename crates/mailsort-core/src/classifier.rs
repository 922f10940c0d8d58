//! Category selection and result assembly.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::category::Category;
use crate::record::RawRecord;
use crate::rules::{RuleSet, default_rules};
use crate::scorer::{ScoreBreakdown, score};

/// Reason given when nothing matched and the record fell back.
pub const FALLBACK_REASON: &str = "No strong signals matched; defaulted to General";

/// Batches at least this large are split across threads when the `parallel`
/// feature is on.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 64;

/// A classified record.
///
/// Immutable once built; re-classifying a record produces a new result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// The record that was classified.
    #[serde(flatten)]
    pub record: RawRecord,
    /// The winning category.
    pub category: Category,
    /// Score of every category, in registry order.
    pub score_breakdown: ScoreBreakdown,
    /// Why the winner was chosen, in the order its rules fired.
    pub reasons: Vec<String>,
}

impl ClassificationResult {
    /// Score of the winning category.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score_breakdown.score(self.category)
    }

    /// Whether the category came from the zero-signal fallback.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.score_breakdown.is_zero()
    }

    /// Default display ordering: category priority, then newest first.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.category
            .display_order()
            .cmp(&other.category.display_order())
            .then_with(|| other.record.received_at.cmp(&self.record.received_at))
    }
}

/// Classifies records against a rule set.
///
/// Holds only a shared borrow of the rules, so it is cheap to copy and can be
/// used from any number of threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    rules: &'r RuleSet,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl<'r> Classifier<'r> {
    /// Creates a classifier over the given rules.
    #[must_use]
    pub const fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// The rules in use.
    #[must_use]
    pub const fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    /// Classifies one record.
    ///
    /// The winner is the category with the strictly highest score; ties go to
    /// the category earliest in the registry. If nothing scored, the record
    /// falls back to [`Category::FALLBACK`] with a single generic reason.
    #[must_use]
    pub fn classify(&self, record: &RawRecord) -> ClassificationResult {
        let sheet = score(self.rules, record);
        let breakdown = sheet.breakdown;

        let (category, reasons) = if breakdown.is_zero() {
            (Category::FALLBACK, vec![FALLBACK_REASON.to_string()])
        } else {
            let (winner, _) = breakdown.top();
            (winner, sheet.into_reasons(winner))
        };

        debug!(
            record = %record.id,
            category = %category,
            score = breakdown.score(category),
            reasons = reasons.len(),
            "Classified record"
        );

        ClassificationResult {
            record: record.clone(),
            category,
            score_breakdown: breakdown,
            reasons,
        }
    }

    /// Classifies many records, preserving input order.
    ///
    /// Each record is classified independently; the output is the same as
    /// calling [`Classifier::classify`] on each record in turn.
    #[must_use]
    pub fn classify_batch(&self, records: &[RawRecord]) -> Vec<ClassificationResult> {
        #[cfg(feature = "parallel")]
        if records.len() >= PARALLEL_THRESHOLD {
            use rayon::prelude::*;

            debug!(records = records.len(), "Classifying batch in parallel");
            return records.par_iter().map(|r| self.classify(r)).collect();
        }

        debug!(records = records.len(), "Classifying batch");
        records.iter().map(|r| self.classify(r)).collect()
    }
}

/// Classifies one record with the built-in rules.
#[must_use]
pub fn classify(record: &RawRecord) -> ClassificationResult {
    Classifier::default().classify(record)
}

/// Classifies many records with the built-in rules, preserving order.
#[must_use]
pub fn classify_batch(records: &[RawRecord]) -> Vec<ClassificationResult> {
    Classifier::default().classify_batch(records)
}
