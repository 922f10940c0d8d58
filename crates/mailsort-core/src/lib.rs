//! # mailsort-core
//!
//! Explainable, rule-based classification of short message records.
//!
//! This crate provides:
//! - **Category Registry** - the fixed, ordered taxonomy and its display metadata
//! - **Signal Rules** - declarative, weighted matchers over sender, subject and preview
//! - **Scorer** - per-category score accumulation with matched-rule explanations
//! - **Classifier** - deterministic winner selection, rationale and batch entry points
//!
//! Every decision comes with a full score breakdown and the reasons behind
//! it. The engine is a pure function of the record and the rule set: no I/O,
//! no shared mutable state.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use mailsort_core::{Category, RawRecord, classify};
//!
//! let record = RawRecord::new(
//!     "msg-1",
//!     "billing@vendor.com",
//!     "Invoice #4821 due",
//!     "Please arrange payment within 30 days.",
//!     Utc::now(),
//! );
//!
//! let result = classify(&record);
//! assert_eq!(result.category, Category::Finance);
//! assert!(!result.reasons.is_empty());
//! ```
//!
//! # Features
//!
//! - `parallel` - classify large batches across a rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod category;
pub mod classifier;
mod error;
pub mod record;
pub mod rules;
pub mod scorer;
pub mod validation;

pub use category::{Category, categories};
pub use classifier::{
    ClassificationResult, Classifier, FALLBACK_REASON, classify, classify_batch,
};
pub use error::{Error, Result};
pub use record::RawRecord;
pub use rules::{ConfigError, Rule, RuleSet, default_rules};
pub use scorer::{ScoreBreakdown, ScoreSheet, score};
pub use validation::{RecordIssue, RecordValidation, validate_record};
