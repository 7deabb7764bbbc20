//! Closed event catalog and the locked price table.
//!
//! Prices live here and nowhere else. A client-supplied price is never
//! trusted; the orchestrator locks the amount it finds in this table at
//! creation time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The known events. Unknown event identifiers fail fast at the
/// validation gate; nothing outside this enum can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventId {
    BirminghamSlamCamp,
    NationalChampCamp,
    TexasRecruitingClinic,
    OpenMatNight,
}

impl EventId {
    pub const ALL: [EventId; 4] = [
        Self::BirminghamSlamCamp,
        Self::NationalChampCamp,
        Self::TexasRecruitingClinic,
        Self::OpenMatNight,
    ];

    /// URL slug used by clients and stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BirminghamSlamCamp => "birmingham-slam-camp",
            Self::NationalChampCamp => "national-champ-camp",
            Self::TexasRecruitingClinic => "texas-recruiting-clinic",
            Self::OpenMatNight => "open-mat-night",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "birmingham-slam-camp" => Some(Self::BirminghamSlamCamp),
            "national-champ-camp" => Some(Self::NationalChampCamp),
            "texas-recruiting-clinic" => Some(Self::TexasRecruitingClinic),
            "open-mat-night" => Some(Self::OpenMatNight),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BirminghamSlamCamp => "Birmingham Slam Camp",
            Self::NationalChampCamp => "National Champ Camp",
            Self::TexasRecruitingClinic => "Texas Recruiting Clinic",
            Self::OpenMatNight => "Open Mat Night",
        }
    }

    /// Locked price in minor units (cents).
    pub fn price_cents(&self) -> i64 {
        match self {
            Self::BirminghamSlamCamp => 24_900,
            Self::NationalChampCamp => 29_900,
            Self::TexasRecruitingClinic => 24_900,
            Self::OpenMatNight => 0,
        }
    }

    /// Locked price as a decimal dollar amount.
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents(), 2)
    }

    /// A zero-price event registers through the free-registration
    /// exception: no external authorization, same uniqueness and
    /// integrity guarantees.
    pub fn is_free(&self) -> bool {
        self.price_cents() == 0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip() {
        for event in EventId::ALL {
            assert_eq!(EventId::parse(event.as_str()), Some(event));
        }
        assert_eq!(EventId::parse("midnight-madness"), None);
    }

    #[test]
    fn test_price_table() {
        assert_eq!(EventId::BirminghamSlamCamp.price_cents(), 24_900);
        assert_eq!(
            EventId::BirminghamSlamCamp.price(),
            Decimal::new(24_900, 2)
        );
        assert!(EventId::OpenMatNight.is_free());
        assert!(!EventId::NationalChampCamp.is_free());
    }
}
