//! Raw message records fed to the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message to classify.
///
/// Identifiers and timestamps are supplied by the caller; the engine never
/// generates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Caller-assigned unique identifier.
    pub id: String,
    /// Sender, usually `Name <address>` or a bare address.
    pub sender: String,
    /// Subject line.
    pub subject: String,
    /// First lines of the body.
    pub preview: String,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}

impl RawRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        preview: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            subject: subject.into(),
            preview: preview.into(),
            received_at,
        }
    }

    /// The sender's email address, lowercased.
    ///
    /// Accepts `Name <user@example.com>` as well as a bare address. Returns
    /// `None` when the sender has no `@`.
    #[must_use]
    pub fn sender_address(&self) -> Option<String> {
        parse_address(&self.sender)
    }

    /// Domain part of the sender address, lowercased.
    #[must_use]
    pub fn sender_domain(&self) -> Option<String> {
        self.sender_address()
            .and_then(|addr| addr.split_once('@').map(|(_, domain)| domain.to_string()))
            .filter(|domain| !domain.is_empty())
    }

    /// Local part of the sender address, lowercased.
    #[must_use]
    pub fn sender_local(&self) -> Option<String> {
        self.sender_address()
            .and_then(|addr| addr.split_once('@').map(|(local, _)| local.to_string()))
            .filter(|local| !local.is_empty())
    }
}

/// Extracts the address from a `from` style field.
fn parse_address(from: &str) -> Option<String> {
    let from = from.trim();
    // "Name <email@example.com>"
    let candidate = if let Some(start) = from.rfind('<')
        && let Some(end) = from.rfind('>')
        && start < end
    {
        &from[start + 1..end]
    } else {
        from
    };

    let candidate = candidate.trim().trim_matches(|c| c == '"' || c == '\'');
    if candidate.contains('@') && !candidate.contains(char::is_whitespace) {
        Some(candidate.to_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sender: &str) -> RawRecord {
        RawRecord::new("r1", sender, "", "", Utc::now())
    }

    #[test]
    fn test_bare_address() {
        let r = record("Billing@Vendor.com");
        assert_eq!(r.sender_address().as_deref(), Some("billing@vendor.com"));
        assert_eq!(r.sender_domain().as_deref(), Some("vendor.com"));
        assert_eq!(r.sender_local().as_deref(), Some("billing"));
    }

    #[test]
    fn test_named_address() {
        let r = record("Acme Support <support@mail.acme.io>");
        assert_eq!(r.sender_address().as_deref(), Some("support@mail.acme.io"));
        assert_eq!(r.sender_domain().as_deref(), Some("mail.acme.io"));
    }

    #[test]
    fn test_missing_address() {
        let r = record("Just A Name");
        assert_eq!(r.sender_address(), None);
        assert_eq!(r.sender_domain(), None);

        let r = record("");
        assert_eq!(r.sender_address(), None);
    }

    #[test]
    fn test_half_address() {
        assert_eq!(record("user@").sender_domain(), None);
        assert_eq!(record("@example.com").sender_local(), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_serde_camel_case() {
        let r = RawRecord::new("x", "a@b.c", "Hi", "There", Utc::now());
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("receivedAt").is_some());
        let back: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
