//! Compiled, immutable rule sets.

use std::path::Path;
use std::sync::LazyLock;

use tracing::{info, warn};

use super::config::{RuleSetConfig, compile};
use super::model::Rule;
use crate::category::Category;
use crate::{Error, Result};

/// Built-in starter rules, shipped with the crate.
const DEFAULT_RULES_JSON: &str = include_str!("default_rules.json");

/// Process-wide default rule set, built on first use.
#[allow(clippy::expect_used)] // shipped JSON is covered by tests
static DEFAULT_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::from_json_str(DEFAULT_RULES_JSON).expect("built-in rule set must be valid")
});

/// The built-in rule set.
#[must_use]
pub fn default_rules() -> &'static RuleSet {
    &DEFAULT_RULES
}

/// The built-in rule set as configuration, for inspection or extension.
///
/// # Errors
///
/// Returns an error only if the shipped JSON is malformed.
pub fn default_config() -> Result<RuleSetConfig> {
    Ok(serde_json::from_str(DEFAULT_RULES_JSON)?)
}

/// Rules grouped by category, in registry order.
///
/// Read-only after construction and safe to share between threads. The
/// default value is an empty set, under which everything falls back to
/// [`Category::FALLBACK`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    by_category: [Vec<Rule>; Category::COUNT],
}

impl RuleSet {
    /// Builds a rule set from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with every problem found if any rule is
    /// invalid. No partial rule set is ever returned.
    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        let rules = compile(config).map_err(|errors| {
            for error in &errors {
                warn!(rule = %error.rule(), "Rejected rule: {error}");
            }
            Error::Config(errors)
        })?;

        let mut by_category: [Vec<Rule>; Category::COUNT] = Default::default();
        for rule in rules {
            by_category[rule.category().display_order()].push(rule);
        }

        let set = Self { by_category };
        info!(rules = set.len(), "Built rule set");
        Ok(set)
    }

    /// Parses and builds a rule set from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any rule is invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RuleSetConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    /// Reads and builds a rule set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the JSON is malformed,
    /// or any rule is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rules for one category, in definition order.
    #[must_use]
    pub fn rules_for(&self, category: Category) -> &[Rule] {
        &self.by_category[category.display_order()]
    }

    /// Every rule, in registry order then definition order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.by_category.iter().flatten()
    }

    /// Looks up a rule by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules().find(|rule| rule.id() == id)
    }

    /// Total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.iter().map(Vec::len).sum()
    }

    /// Whether the set has no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.iter().all(Vec::is_empty)
    }
}
