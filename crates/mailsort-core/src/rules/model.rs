//! Rule and matcher models.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::record::RawRecord;

/// Placeholder in explanation templates replaced by the matched text.
pub const MATCH_PLACEHOLDER: &str = "{match}";

/// A text field of a record that a matcher can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// The raw sender text, display name included.
    Sender,
    /// The subject line.
    Subject,
    /// The body preview.
    Preview,
}

impl Field {
    /// Lowercase configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Subject => "subject",
            Self::Preview => "preview",
        }
    }
}

/// A record prepared for matching.
///
/// Lowercases each field and parses the sender address once so that every
/// rule can share the work.
#[derive(Debug)]
pub struct MatchInput<'a> {
    record: &'a RawRecord,
    sender: String,
    subject: String,
    preview: String,
    domain: Option<String>,
    local: Option<String>,
}

impl<'a> MatchInput<'a> {
    /// Prepares a record for matching.
    #[must_use]
    pub fn new(record: &'a RawRecord) -> Self {
        Self {
            record,
            sender: record.sender.to_lowercase(),
            subject: record.subject.to_lowercase(),
            preview: record.preview.to_lowercase(),
            domain: record.sender_domain(),
            local: record.sender_local(),
        }
    }

    fn lowered(&self, field: Field) -> &str {
        match field {
            Field::Sender => &self.sender,
            Field::Subject => &self.subject,
            Field::Preview => &self.preview,
        }
    }

    fn original(&self, field: Field) -> &'a str {
        match field {
            Field::Sender => &self.record.sender,
            Field::Subject => &self.record.subject,
            Field::Preview => &self.record.preview,
        }
    }
}

/// How a rule decides whether a record matches.
///
/// All matching is case-insensitive. Empty fields never match.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Any keyword appears as a substring of any listed field.
    Keywords {
        /// Fields to search.
        fields: Vec<Field>,
        /// Lowercased keywords, in priority order.
        keywords: Vec<String>,
    },
    /// A case-insensitive regular expression matches any listed field.
    Pattern {
        /// Fields to search.
        fields: Vec<Field>,
        /// Compiled expression.
        regex: Regex,
    },
    /// The sender domain equals, or is a subdomain of, a listed domain.
    SenderDomain {
        /// Lowercased domains.
        domains: Vec<String>,
    },
    /// The sender's local part starts with a listed prefix.
    SenderLocal {
        /// Lowercased prefixes.
        prefixes: Vec<String>,
    },
}

impl Matcher {
    /// Returns the matched text, or `None` if the record does not match.
    #[must_use]
    pub fn find(&self, input: &MatchInput<'_>) -> Option<String> {
        match self {
            Self::Keywords { fields, keywords } => keywords
                .iter()
                .find(|keyword| {
                    fields.iter().any(|&field| {
                        let text = input.lowered(field);
                        !text.is_empty() && text.contains(keyword.as_str())
                    })
                })
                .cloned(),
            Self::Pattern { fields, regex } => fields.iter().find_map(|&field| {
                let text = input.original(field);
                if text.is_empty() {
                    return None;
                }
                regex
                    .find_iter(text)
                    .find(|m| !m.as_str().is_empty())
                    .map(|m| m.as_str().to_string())
            }),
            Self::SenderDomain { domains } => {
                let domain = input.domain.as_deref()?;
                domains
                    .iter()
                    .find(|d| {
                        domain == d.as_str()
                            || domain
                                .strip_suffix(d.as_str())
                                .is_some_and(|rest| rest.ends_with('.'))
                    })
                    .cloned()
            }
            Self::SenderLocal { prefixes } => {
                let local = input.local.as_deref()?;
                prefixes
                    .iter()
                    .find(|p| local.starts_with(p.as_str()))
                    .cloned()
            }
        }
    }

    /// Short name of the matcher kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Keywords { .. } => "keywords",
            Self::Pattern { .. } => "pattern",
            Self::SenderDomain { .. } => "sender_domain",
            Self::SenderLocal { .. } => "sender_local",
        }
    }
}

/// A weighted, explainable signal for one category.
///
/// Rules are only built through validated configuration, so every rule has a
/// matcher, a positive weight and a non-empty explanation.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) id: String,
    pub(crate) category: Category,
    pub(crate) weight: u32,
    pub(crate) explanation: String,
    pub(crate) matcher: Matcher,
}

impl Rule {
    /// Unique identifier within the rule set.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Category this rule votes for.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Contribution to the category score when the rule fires.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Explanation template, possibly containing `{match}`.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// The matcher.
    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Evaluates the rule, returning the rendered explanation on a match.
    #[must_use]
    pub fn evaluate(&self, input: &MatchInput<'_>) -> Option<String> {
        self.matcher
            .find(input)
            .map(|matched| self.explanation.replace(MATCH_PLACEHOLDER, &matched))
    }
}
