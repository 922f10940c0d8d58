//! `MailSort` - classify messages into triage categories, with reasons.
//!
//! A thin command-line front end over `mailsort-core`. Reports go to stdout;
//! logs go to stderr so `--json` output can be piped.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod input;
mod report;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailsort_core::{
    Category, Classifier, RawRecord, RuleSet, default_rules, validate_record,
};

use cli::{Cli, ClassifyArgs, Command};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsort=info,mailsort_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let custom = match &cli.rules {
        Some(path) => {
            let rules = RuleSet::from_path(path)
                .with_context(|| format!("Failed to load rules from {}", path.display()))?;
            info!(path = %path.display(), rules = rules.len(), "Using custom rule set");
            Some(rules)
        }
        None => None,
    };
    let rules: &RuleSet = custom.as_ref().unwrap_or_else(|| default_rules());

    run(cli.command, rules, cli.json)
}

fn run(command: Command, rules: &RuleSet, json: bool) -> Result<()> {
    let classifier = Classifier::new(rules);

    match command {
        Command::Classify(args) => {
            let record = manual_record(args);
            if let Err(issues) = validate_record(&record) {
                let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
                bail!("Incomplete message: {}", messages.join(", "));
            }
            let result = classifier.classify(&record);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_result(&result));
            }
        }
        Command::Batch { input: file } => {
            let records = input::read_records(file.as_deref())?;
            for record in &records {
                if let Err(issues) = validate_record(record) {
                    for issue in issues {
                        warn!(record = %record.id, field = issue.field(), "{issue}");
                    }
                }
            }
            info!(records = records.len(), "Classifying batch");
            let results = classifier.classify_batch(&records);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print!("{}", report::render_batch(&results));
            }
        }
        Command::Rules => {
            if json {
                let rules: Vec<serde_json::Value> = rules
                    .rules()
                    .map(|rule| {
                        serde_json::json!({
                            "id": rule.id(),
                            "category": rule.category(),
                            "weight": rule.weight(),
                            "explanation": rule.explanation(),
                            "matcher": rule.matcher().kind(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rules)?);
            } else {
                print!("{}", report::render_rules(rules));
            }
        }
        Command::Categories => {
            if json {
                let categories: Vec<serde_json::Value> = Category::ALL
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "category": c,
                            "order": c.display_order(),
                            "label": c.label(),
                            "description": c.description(),
                            "icon": c.icon(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                print!("{}", report::render_categories());
            }
        }
    }

    Ok(())
}

/// Builds a record from command-line fields.
///
/// A missing preview stays empty so validation can reject it.
fn manual_record(args: ClassifyArgs) -> RawRecord {
    RawRecord::new(
        args.id.unwrap_or_else(input::new_id),
        args.sender.trim(),
        args.subject.trim(),
        args.preview.as_deref().unwrap_or_default().trim(),
        Utc::now(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_record_trims_fields() {
        let record = manual_record(ClassifyArgs {
            sender: " a@b.c ".into(),
            subject: "Invoice 1002".into(),
            preview: Some("  payment due  ".into()),
            id: Some("m".into()),
        });
        assert_eq!(record.id, "m");
        assert_eq!(record.sender, "a@b.c");
        assert_eq!(record.preview, "payment due");
    }

    #[test]
    fn test_missing_preview_is_not_filled_from_subject() {
        let record = manual_record(ClassifyArgs {
            sender: "ops@company.com".into(),
            subject: "Can you sign off".into(),
            preview: None,
            id: None,
        });
        assert_eq!(record.preview, "");

        let args = ClassifyArgs {
            sender: "ops@company.com".into(),
            subject: "Can you sign off".into(),
            preview: None,
            id: None,
        };
        let err = run(Command::Classify(args), default_rules(), true).unwrap_err();
        assert!(err.to_string().contains("Preview is required"));
    }

    #[test]
    fn test_run_accepts_custom_rule_set() {
        let custom = RuleSet::default();
        let args = ClassifyArgs {
            sender: "a@b.c".into(),
            subject: "Hi".into(),
            preview: Some("there".into()),
            id: None,
        };
        assert!(run(Command::Classify(args), &custom, true).is_ok());
    }

    #[test]
    fn test_run_rejects_incomplete_message() {
        let args = ClassifyArgs {
            sender: String::new(),
            subject: "Hi".into(),
            preview: None,
            id: None,
        };
        let err = run(Command::Classify(args), default_rules(), true).unwrap_err();
        assert!(err.to_string().contains("Sender is required"));
    }
}
