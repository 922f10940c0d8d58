//! Signal rules.
//!
//! Each rule is data: a matcher over the record's sender, subject and
//! preview, a positive weight, and an explanation template. Rules are grouped
//! by category and evaluated independently; the scorer only iterates them.
//!
//! # Example
//!
//! ```
//! use mailsort_core::Category;
//! use mailsort_core::rules::{RuleSet, default_rules};
//!
//! let finance = default_rules().rules_for(Category::Finance);
//! assert!(!finance.is_empty());
//!
//! let custom = RuleSet::from_json_str(r#"{"rules": [{
//!     "id": "standup",
//!     "category": "important",
//!     "weight": 2,
//!     "explanation": "Mentions the {match}",
//!     "matcher": {"kind": "keywords", "keywords": ["standup"]}
//! }]}"#)?;
//! assert_eq!(custom.len(), 1);
//! # Ok::<(), mailsort_core::Error>(())
//! ```

mod config;
mod model;
mod set;

pub use config::{ConfigError, MatcherConfig, RuleConfig, RuleSetConfig, compile};
pub use model::{Field, MATCH_PLACEHOLDER, MatchInput, Matcher, Rule};
pub use set::{RuleSet, default_config, default_rules};
