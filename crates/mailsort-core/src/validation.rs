//! Caller-side record validation.
//!
//! The engine accepts any record; a record with empty fields simply scores
//! zero and falls back. Front ends that want to refuse incomplete input
//! before classifying can use [`validate_record`].

use crate::record::RawRecord;

/// Problem with a record submitted for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordIssue {
    /// Record identifier is empty.
    EmptyId,
    /// Sender is empty.
    EmptySender,
    /// Sender has no recognizable email address.
    InvalidSender,
    /// Subject is empty.
    EmptySubject,
    /// Preview is empty.
    EmptyPreview,
}

impl RecordIssue {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyId => "Record id is required",
            Self::EmptySender => "Sender is required",
            Self::InvalidSender => "Sender must contain an email address",
            Self::EmptySubject => "Subject is required",
            Self::EmptyPreview => "Preview is required",
        }
    }

    /// Get the field name this issue relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => "id",
            Self::EmptySender | Self::InvalidSender => "sender",
            Self::EmptySubject => "subject",
            Self::EmptyPreview => "preview",
        }
    }
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RecordIssue {}

/// Result of validating a record.
pub type RecordValidation = Result<(), Vec<RecordIssue>>;

/// Validate a record before classification.
///
/// Returns `Ok(())` if complete, or every issue found.
///
/// # Errors
///
/// Returns a vector of `RecordIssue` if any field is missing or malformed.
pub fn validate_record(record: &RawRecord) -> RecordValidation {
    let mut issues = Vec::new();

    if record.id.trim().is_empty() {
        issues.push(RecordIssue::EmptyId);
    }

    if record.sender.trim().is_empty() {
        issues.push(RecordIssue::EmptySender);
    } else if !is_valid_address(record) {
        issues.push(RecordIssue::InvalidSender);
    }

    if record.subject.trim().is_empty() {
        issues.push(RecordIssue::EmptySubject);
    }
    if record.preview.trim().is_empty() {
        issues.push(RecordIssue::EmptyPreview);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Basic address validation: one `@`, non-empty local part, dotted domain.
fn is_valid_address(record: &RawRecord) -> bool {
    let Some(address) = record.sender_address() else {
        return false;
    };

    let parts: Vec<&str> = address.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return false;
    }

    !domain.split('.').any(str::is_empty)
}
