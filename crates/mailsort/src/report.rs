//! Human-readable rendering of results, rules and categories.

use std::fmt::Write as _;

use mailsort_core::rules::{Matcher, Rule};
use mailsort_core::{Category, ClassificationResult, RuleSet};

/// Widest score bar, in characters.
const BAR_WIDTH: usize = 10;

/// Renders one result: headline, reasons and score breakdown.
pub fn render_result(result: &ClassificationResult) -> String {
    let mut out = String::new();
    let record = &result.record;

    let _ = writeln!(
        out,
        "[{}] {}",
        result.category.label(),
        if record.subject.is_empty() {
            "(no subject)"
        } else {
            record.subject.as_str()
        }
    );
    let _ = writeln!(
        out,
        "  from {}  id {}  received {}",
        record.sender,
        record.id,
        record.received_at.format("%Y-%m-%d %H:%M")
    );

    out.push_str("  why:\n");
    for reason in &result.reasons {
        let _ = writeln!(out, "    - {reason}");
    }

    out.push_str("  scores:\n");
    for (category, score) in result.score_breakdown.iter() {
        let marker = if category == result.category { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "   {marker} {:<11} {score:>3} {}",
            category.label(),
            bar(score)
        );
    }
    out
}

/// Renders a batch, followed by per-category counts.
pub fn render_batch(results: &[ClassificationResult]) -> String {
    let mut sorted: Vec<&ClassificationResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.display_cmp(b));

    let mut out = String::new();
    for result in sorted {
        out.push_str(&render_result(result));
        out.push('\n');
    }

    let _ = writeln!(out, "{} message(s)", results.len());
    for category in Category::ALL {
        let count = results.iter().filter(|r| r.category == category).count();
        if count > 0 {
            let _ = writeln!(out, "  {:<11} {count:>3}", category.label());
        }
    }
    out
}

/// Renders the rule set grouped by category.
pub fn render_rules(rules: &RuleSet) -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let _ = writeln!(out, "{}:", category.label());
        let group = rules.rules_for(category);
        if group.is_empty() {
            out.push_str("  (no rules)\n");
        }
        for rule in group {
            let _ = writeln!(
                out,
                "  {:<28} +{:<2} {}",
                rule.id(),
                rule.weight(),
                describe_matcher(rule)
            );
        }
    }
    out
}

/// Renders the category registry.
pub fn render_categories() -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "{:>2}  {:<11} {}",
            category.display_order() + 1,
            category.label(),
            category.description()
        );
    }
    out
}

fn describe_matcher(rule: &Rule) -> String {
    match rule.matcher() {
        Matcher::Keywords { fields, keywords } => format!(
            "{} contains {}",
            join_fields(fields),
            keywords.join(" | ")
        ),
        Matcher::Pattern { fields, regex } => {
            format!("{} matches /{}/", join_fields(fields), regex.as_str())
        }
        Matcher::SenderDomain { domains } => format!("sender domain in {}", domains.join(" | ")),
        Matcher::SenderLocal { prefixes } => {
            format!("sender starts with {}", prefixes.join(" | "))
        }
    }
}

fn join_fields(fields: &[mailsort_core::rules::Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn bar(score: u64) -> String {
    let width = usize::try_from(score).unwrap_or(BAR_WIDTH).min(BAR_WIDTH);
    "#".repeat(width)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mailsort_core::{FALLBACK_REASON, RawRecord, classify};

    use super::*;

    #[test]
    fn test_bar_is_capped() {
        assert_eq!(bar(0), "");
        assert_eq!(bar(3), "###");
        assert_eq!(bar(250), "#".repeat(BAR_WIDTH));
    }

    #[test]
    fn test_render_fallback() {
        let record = RawRecord::new("r1", "a@b.c", "", "", Utc::now());
        let text = render_result(&classify(&record));
        assert!(text.starts_with("[General] (no subject)"));
        assert!(text.contains(FALLBACK_REASON));
        assert!(text.contains("   > General"));
        let zero_lines = text
            .lines()
            .filter(|l| l.trim_end().ends_with(" 0"))
            .count();
        assert_eq!(zero_lines, Category::COUNT);
    }

    #[test]
    fn test_render_batch_counts() {
        let records = [
            RawRecord::new("1", "billing@vendor.com", "Invoice 1001", "payment", Utc::now()),
            RawRecord::new("2", "a@b.c", "", "", Utc::now()),
        ];
        let results: Vec<_> = records.iter().map(classify).collect();
        let text = render_batch(&results);
        assert!(text.contains("2 message(s)"));
        assert!(text.find("[Finance]") < text.find("[General]"));
    }

    #[test]
    fn test_render_rules_lists_every_category() {
        let text = render_rules(mailsort_core::default_rules());
        for category in Category::ALL {
            assert!(text.contains(&format!("{}:", category.label())));
        }
        assert!(text.contains("finance-documents"));
    }

    #[test]
    fn test_render_categories_in_order() {
        let text = render_categories();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), Category::COUNT);
        assert!(lines[0].contains("Important"));
        assert!(lines[7].contains("General"));
    }
}
