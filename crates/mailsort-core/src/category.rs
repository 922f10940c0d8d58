//! Category registry.
//!
//! The taxonomy is closed and ordered. The order is the tie-break priority
//! and the default display priority: `Important` first, `Spam` and `General`
//! last.

use serde::{Deserialize, Serialize};

/// A classification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Time-sensitive mail that needs a human response.
    Important,
    /// Invoices, payments, statements and receipts.
    Finance,
    /// Notifications, account alerts and service updates.
    Updates,
    /// Marketing, sales and offers.
    Promotions,
    /// Social network activity and community mail.
    Social,
    /// Bookings, itineraries and boarding passes.
    Travel,
    /// Unsolicited or suspicious mail.
    Spam,
    /// Everything else. Also the fallback when nothing matched.
    General,
}

impl Category {
    /// Every category, in registry order.
    pub const ALL: [Self; 8] = [
        Self::Important,
        Self::Finance,
        Self::Updates,
        Self::Promotions,
        Self::Social,
        Self::Travel,
        Self::Spam,
        Self::General,
    ];

    /// Number of categories in the registry.
    pub const COUNT: usize = Self::ALL.len();

    /// Category assigned when no rule matched anything.
    pub const FALLBACK: Self = Self::General;

    /// Rank in the registry. Lower ranks win ties.
    #[must_use]
    pub const fn display_order(self) -> usize {
        self as usize
    }

    /// Parse from the lowercase configuration name.
    ///
    /// Returns `None` for names outside the registry.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Lowercase configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Important => "important",
            Self::Finance => "finance",
            Self::Updates => "updates",
            Self::Promotions => "promotions",
            Self::Social => "social",
            Self::Travel => "travel",
            Self::Spam => "spam",
            Self::General => "general",
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Important => "Important",
            Self::Finance => "Finance",
            Self::Updates => "Updates",
            Self::Promotions => "Promotions",
            Self::Social => "Social",
            Self::Travel => "Travel",
            Self::Spam => "Spam",
            Self::General => "General",
        }
    }

    /// Description of what belongs in this category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Important => "Deadlines, escalations and direct requests that need attention",
            Self::Finance => "Invoices, payments, statements and receipts",
            Self::Updates => "Account alerts, security notices and product updates",
            Self::Promotions => "Sales, discounts, newsletters and marketing offers",
            Self::Social => "Mentions, invitations and activity from social networks",
            Self::Travel => "Flights, hotel bookings, itineraries and check-in reminders",
            Self::Spam => "Unsolicited offers, prize claims and phishing attempts",
            Self::General => "Everything without a strong signal",
        }
    }

    /// Icon name for this category.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Important => "alert",
            Self::Finance => "receipt",
            Self::Updates => "bell",
            Self::Promotions => "tag",
            Self::Social => "users",
            Self::Travel => "plane",
            Self::Spam => "shield",
            Self::General => "inbox",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The registry: every category in order.
#[must_use]
pub const fn categories() -> &'static [Category] {
    &Category::ALL
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Category::parse(" Finance "), Some(Category::Finance));
        assert_eq!(Category::parse("SPAM"), Some(Category::Spam));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Category::parse("newsletters"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_display_order_matches_registry() {
        for (idx, category) in categories().iter().enumerate() {
            assert_eq!(category.display_order(), idx);
        }
        assert_eq!(Category::Important.display_order(), 0);
        assert_eq!(Category::General.display_order(), Category::COUNT - 1);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Promotions).unwrap();
        assert_eq!(json, "\"promotions\"");
        let back: Category = serde_json::from_str("\"travel\"").unwrap();
        assert_eq!(back, Category::Travel);
    }
}
