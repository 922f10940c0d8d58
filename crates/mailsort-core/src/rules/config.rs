//! Declarative rule configuration and its validation.
//!
//! Rule sets are described as plain data (JSON on disk) and compiled into
//! [`Rule`]s. Compilation is all-or-nothing: every problem in every rule is
//! collected and reported together.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use super::model::{Field, Matcher, Rule};
use crate::category::Category;

/// Upper bound on compiled regex size, in bytes.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A rule set as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Rules, in evaluation order within each category.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One rule as written in configuration.
///
/// Category and weight are kept loose here so that bad values surface as
/// [`ConfigError`]s rather than opaque parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Unique rule identifier.
    #[serde(default)]
    pub id: String,
    /// Category name, see [`Category::as_str`].
    pub category: String,
    /// Score contribution. Must be positive.
    #[serde(default)]
    pub weight: i64,
    /// Explanation template. `{match}` is replaced with the matched text.
    #[serde(default)]
    pub explanation: String,
    /// How the rule matches.
    #[serde(default)]
    pub matcher: Option<MatcherConfig>,
}

/// Matcher as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatcherConfig {
    /// Substring keywords.
    Keywords {
        /// Fields to search. Defaults to subject and preview.
        #[serde(default = "default_text_fields")]
        fields: Vec<Field>,
        /// Keywords to look for.
        keywords: Vec<String>,
    },
    /// Regular expression.
    Pattern {
        /// Fields to search. Defaults to subject and preview.
        #[serde(default = "default_text_fields")]
        fields: Vec<Field>,
        /// Expression, compiled case-insensitively.
        pattern: String,
    },
    /// Sender domain (or any subdomain of it).
    SenderDomain {
        /// Domains to look for.
        domains: Vec<String>,
    },
    /// Sender local-part prefix.
    SenderLocal {
        /// Prefixes to look for.
        prefixes: Vec<String>,
    },
}

fn default_text_fields() -> Vec<Field> {
    vec![Field::Subject, Field::Preview]
}

/// A problem found while compiling a rule set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Rule has no identifier.
    #[error("rule #{index} has no id")]
    MissingId {
        /// Position of the rule in the configuration.
        index: usize,
    },
    /// Two rules share an identifier.
    #[error("duplicate rule id '{rule}'")]
    DuplicateId {
        /// Offending rule.
        rule: String,
    },
    /// Category name is not in the registry.
    #[error("rule '{rule}' references unknown category '{category}'")]
    UnknownCategory {
        /// Offending rule.
        rule: String,
        /// The name that failed to resolve.
        category: String,
    },
    /// Weight is zero or negative.
    #[error("rule '{rule}' has non-positive weight {weight}")]
    NonPositiveWeight {
        /// Offending rule.
        rule: String,
        /// The configured weight.
        weight: i64,
    },
    /// Weight does not fit the score type.
    #[error("rule '{rule}' weight {weight} is too large")]
    WeightOutOfRange {
        /// Offending rule.
        rule: String,
        /// The configured weight.
        weight: i64,
    },
    /// Rule has no matcher.
    #[error("rule '{rule}' has no matcher")]
    MissingMatcher {
        /// Offending rule.
        rule: String,
    },
    /// Matcher has nothing to look for, or nowhere to look.
    #[error("rule '{rule}' matcher is empty")]
    EmptyMatcher {
        /// Offending rule.
        rule: String,
    },
    /// A keyword, domain or prefix is blank.
    #[error("rule '{rule}' contains a blank term")]
    BlankTerm {
        /// Offending rule.
        rule: String,
    },
    /// Regular expression failed to compile.
    #[error("rule '{rule}' has an invalid pattern: {message}")]
    InvalidPattern {
        /// Offending rule.
        rule: String,
        /// Compiler message.
        message: String,
    },
    /// Explanation is blank.
    #[error("rule '{rule}' has no explanation")]
    EmptyExplanation {
        /// Offending rule.
        rule: String,
    },
}

impl ConfigError {
    /// Identifier of the offending rule, or `#index` if it had none.
    #[must_use]
    pub fn rule(&self) -> String {
        match self {
            Self::MissingId { index } => format!("#{index}"),
            Self::DuplicateId { rule }
            | Self::UnknownCategory { rule, .. }
            | Self::NonPositiveWeight { rule, .. }
            | Self::WeightOutOfRange { rule, .. }
            | Self::MissingMatcher { rule }
            | Self::EmptyMatcher { rule }
            | Self::BlankTerm { rule }
            | Self::InvalidPattern { rule, .. }
            | Self::EmptyExplanation { rule } => rule.clone(),
        }
    }
}

/// Compiles a whole configuration.
///
/// Returns every compiled rule, or every problem found.
///
/// # Errors
///
/// Returns all [`ConfigError`]s if any rule is invalid.
pub fn compile(config: &RuleSetConfig) -> Result<Vec<Rule>, Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut rules = Vec::with_capacity(config.rules.len());
    let mut seen = std::collections::HashSet::new();

    for (index, rule) in config.rules.iter().enumerate() {
        let id = rule.id.trim();
        if !id.is_empty() && !seen.insert(id) {
            errors.push(ConfigError::DuplicateId { rule: id.to_string() });
        }
        match compile_rule(index, rule) {
            Ok(compiled) => rules.push(compiled),
            Err(mut problems) => errors.append(&mut problems),
        }
    }

    if errors.is_empty() {
        Ok(rules)
    } else {
        Err(errors)
    }
}

/// Compiles one rule, collecting every problem with it.
fn compile_rule(index: usize, config: &RuleConfig) -> Result<Rule, Vec<ConfigError>> {
    let mut errors = Vec::new();

    let id = config.id.trim();
    let name = if id.is_empty() {
        errors.push(ConfigError::MissingId { index });
        format!("#{index}")
    } else {
        id.to_string()
    };

    let category = Category::parse(&config.category);
    if category.is_none() {
        errors.push(ConfigError::UnknownCategory {
            rule: name.clone(),
            category: config.category.clone(),
        });
    }

    let weight = if config.weight <= 0 {
        errors.push(ConfigError::NonPositiveWeight {
            rule: name.clone(),
            weight: config.weight,
        });
        None
    } else if let Ok(weight) = u32::try_from(config.weight) {
        Some(weight)
    } else {
        errors.push(ConfigError::WeightOutOfRange {
            rule: name.clone(),
            weight: config.weight,
        });
        None
    };

    if config.explanation.trim().is_empty() {
        errors.push(ConfigError::EmptyExplanation { rule: name.clone() });
    }

    let matcher = match &config.matcher {
        Some(matcher) => compile_matcher(&name, matcher).map_err(|e| errors.push(e)).ok(),
        None => {
            errors.push(ConfigError::MissingMatcher { rule: name.clone() });
            None
        }
    };

    match (category, weight, matcher) {
        (Some(category), Some(weight), Some(matcher)) if errors.is_empty() => Ok(Rule {
            id: name,
            category,
            weight,
            explanation: config.explanation.clone(),
            matcher,
        }),
        _ => Err(errors),
    }
}

fn compile_matcher(rule: &str, config: &MatcherConfig) -> Result<Matcher, ConfigError> {
    match config {
        MatcherConfig::Keywords { fields, keywords } => {
            if fields.is_empty() {
                return Err(ConfigError::EmptyMatcher { rule: rule.into() });
            }
            Ok(Matcher::Keywords {
                fields: dedup_fields(fields),
                keywords: normalize_terms(rule, keywords)?,
            })
        }
        MatcherConfig::Pattern { fields, pattern } => {
            if fields.is_empty() || pattern.trim().is_empty() {
                return Err(ConfigError::EmptyMatcher { rule: rule.into() });
            }
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
                .map_err(|e| ConfigError::InvalidPattern {
                    rule: rule.into(),
                    message: e.to_string(),
                })?;
            Ok(Matcher::Pattern {
                fields: dedup_fields(fields),
                regex,
            })
        }
        MatcherConfig::SenderDomain { domains } => {
            let domains = normalize_terms(rule, domains)?
                .into_iter()
                .map(|d| d.trim_start_matches(['@', '.']).to_string())
                .collect::<Vec<_>>();
            if domains.iter().any(String::is_empty) {
                return Err(ConfigError::BlankTerm { rule: rule.into() });
            }
            Ok(Matcher::SenderDomain { domains })
        }
        MatcherConfig::SenderLocal { prefixes } => Ok(Matcher::SenderLocal {
            prefixes: normalize_terms(rule, prefixes)?,
        }),
    }
}

/// Lowercases and trims terms, rejecting empty lists and blank entries.
fn normalize_terms(rule: &str, terms: &[String]) -> Result<Vec<String>, ConfigError> {
    if terms.is_empty() {
        return Err(ConfigError::EmptyMatcher { rule: rule.into() });
    }
    terms
        .iter()
        .map(|term| {
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                Err(ConfigError::BlankTerm { rule: rule.into() })
            } else {
                Ok(term)
            }
        })
        .collect()
}

fn dedup_fields(fields: &[Field]) -> Vec<Field> {
    let mut out = Vec::with_capacity(fields.len());
    for &field in fields {
        if !out.contains(&field) {
            out.push(field);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keyword_rule(id: &str, category: &str, weight: i64) -> RuleConfig {
        RuleConfig {
            id: id.into(),
            category: category.into(),
            weight,
            explanation: "Mentions {match}".into(),
            matcher: Some(MatcherConfig::Keywords {
                fields: default_text_fields(),
                keywords: vec!["Invoice".into()],
            }),
        }
    }

    fn config(rules: Vec<RuleConfig>) -> RuleSetConfig {
        RuleSetConfig { rules }
    }

    #[test]
    fn test_compile_valid_rule() {
        let rules = compile(&config(vec![keyword_rule("fin", "finance", 3)])).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].category(), Category::Finance);
        assert_eq!(rules[0].weight(), 3);
        match rules[0].matcher() {
            Matcher::Keywords { keywords, .. } => assert_eq!(keywords, &["invoice"]),
            other => panic!("unexpected matcher {}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_category() {
        let errors = compile(&config(vec![keyword_rule("x", "newsletters", 1)])).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigError::UnknownCategory {
                rule: "x".into(),
                category: "newsletters".into()
            }]
        );
    }

    #[test]
    fn test_non_positive_weight() {
        for weight in [0, -2] {
            let errors = compile(&config(vec![keyword_rule("x", "spam", weight)])).unwrap_err();
            assert_eq!(
                errors,
                vec![ConfigError::NonPositiveWeight {
                    rule: "x".into(),
                    weight
                }]
            );
        }
    }

    #[test]
    fn test_weight_out_of_range() {
        let errors =
            compile(&config(vec![keyword_rule("x", "spam", i64::from(u32::MAX) + 1)])).unwrap_err();
        assert!(matches!(errors[0], ConfigError::WeightOutOfRange { .. }));
    }

    #[test]
    fn test_missing_matcher() {
        let mut rule = keyword_rule("x", "spam", 1);
        rule.matcher = None;
        let errors = compile(&config(vec![rule])).unwrap_err();
        assert_eq!(errors, vec![ConfigError::MissingMatcher { rule: "x".into() }]);
    }

    #[test]
    fn test_blank_keyword() {
        let mut rule = keyword_rule("x", "spam", 1);
        rule.matcher = Some(MatcherConfig::Keywords {
            fields: default_text_fields(),
            keywords: vec!["ok".into(), "  ".into()],
        });
        let errors = compile(&config(vec![rule])).unwrap_err();
        assert_eq!(errors, vec![ConfigError::BlankTerm { rule: "x".into() }]);
    }

    #[test]
    fn test_empty_fields() {
        let mut rule = keyword_rule("x", "spam", 1);
        rule.matcher = Some(MatcherConfig::Keywords {
            fields: vec![],
            keywords: vec!["ok".into()],
        });
        let errors = compile(&config(vec![rule])).unwrap_err();
        assert_eq!(errors, vec![ConfigError::EmptyMatcher { rule: "x".into() }]);
    }

    #[test]
    fn test_invalid_pattern() {
        let mut rule = keyword_rule("x", "spam", 1);
        rule.matcher = Some(MatcherConfig::Pattern {
            fields: default_text_fields(),
            pattern: "(unclosed".into(),
        });
        let errors = compile(&config(vec![rule])).unwrap_err();
        assert!(matches!(&errors[0], ConfigError::InvalidPattern { rule, .. } if rule == "x"));
    }

    #[test]
    fn test_collects_every_problem() {
        let mut bad = keyword_rule("", "nope", 0);
        bad.explanation = String::new();
        bad.matcher = None;
        let errors = compile(&config(vec![
            keyword_rule("dup", "finance", 1),
            keyword_rule("dup", "finance", 1),
            bad,
        ]))
        .unwrap_err();

        assert!(errors.contains(&ConfigError::DuplicateId { rule: "dup".into() }));
        assert!(errors.contains(&ConfigError::MissingId { index: 2 }));
        assert!(errors.contains(&ConfigError::UnknownCategory {
            rule: "#2".into(),
            category: "nope".into()
        }));
        assert!(errors.contains(&ConfigError::NonPositiveWeight {
            rule: "#2".into(),
            weight: 0
        }));
        assert!(errors.contains(&ConfigError::EmptyExplanation { rule: "#2".into() }));
        assert!(errors.contains(&ConfigError::MissingMatcher { rule: "#2".into() }));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_sender_domain_normalized() {
        let mut rule = keyword_rule("x", "social", 1);
        rule.matcher = Some(MatcherConfig::SenderDomain {
            domains: vec!["@LinkedIn.com".into()],
        });
        let rules = compile(&config(vec![rule])).unwrap();
        match rules[0].matcher() {
            Matcher::SenderDomain { domains } => assert_eq!(domains, &["linkedin.com"]),
            other => panic!("unexpected matcher {}", other.kind()),
        }
    }

    #[test]
    fn test_matcher_json_shape() {
        let json = r#"{
            "id": "travel-gate",
            "category": "travel",
            "weight": 2,
            "explanation": "Gate {match}",
            "matcher": { "kind": "pattern", "pattern": "gate \\d+" }
        }"#;
        let rule: RuleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            rule.matcher,
            Some(MatcherConfig::Pattern {
                fields: vec![Field::Subject, Field::Preview],
                pattern: "gate \\d+".into()
            })
        );
    }

    #[test]
    fn test_rule_accessor_on_error() {
        assert_eq!(ConfigError::MissingId { index: 4 }.rule(), "#4");
        assert_eq!(
            ConfigError::EmptyExplanation { rule: "a".into() }.rule(),
            "a"
        );
    }
}
