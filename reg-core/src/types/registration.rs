//! Registration records and the closed participant enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::EventId;
use crate::types::{Checksum, ClientContext, CorrelationId, PaymentRef};

/// Payment lifecycle of a registration. Transitions only move forward:
/// `created -> processing -> succeeded` or `failed`. A registration never
/// leaves `succeeded` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Created,
    Processing,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "processing" => Some(Self::Processing),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether advancing from `self` to `next` is a legal forward move.
    pub fn can_advance_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Processing)
                | (Self::Created, Self::Succeeded)
                | (Self::Created, Self::Failed)
                | (Self::Processing, Self::Succeeded)
                | (Self::Processing, Self::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// School grade of the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    K,
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    G7,
    G8,
    G9,
    G10,
    G11,
    G12,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::K => "k",
            Self::G1 => "1",
            Self::G2 => "2",
            Self::G3 => "3",
            Self::G4 => "4",
            Self::G5 => "5",
            Self::G6 => "6",
            Self::G7 => "7",
            Self::G8 => "8",
            Self::G9 => "9",
            Self::G10 => "10",
            Self::G11 => "11",
            Self::G12 => "12",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "k" | "K" => Some(Self::K),
            "1" => Some(Self::G1),
            "2" => Some(Self::G2),
            "3" => Some(Self::G3),
            "4" => Some(Self::G4),
            "5" => Some(Self::G5),
            "6" => Some(Self::G6),
            "7" => Some(Self::G7),
            "8" => Some(Self::G8),
            "9" => Some(Self::G9),
            "10" => Some(Self::G10),
            "11" => Some(Self::G11),
            "12" => Some(Self::G12),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// T-shirt size, youth and adult cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShirtSize {
    YouthSmall,
    YouthMedium,
    YouthLarge,
    AdultSmall,
    AdultMedium,
    AdultLarge,
    AdultXl,
    AdultXxl,
}

impl ShirtSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YouthSmall => "ys",
            Self::YouthMedium => "ym",
            Self::YouthLarge => "yl",
            Self::AdultSmall => "as",
            Self::AdultMedium => "am",
            Self::AdultLarge => "al",
            Self::AdultXl => "axl",
            Self::AdultXxl => "a2xl",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ys" => Some(Self::YouthSmall),
            "ym" => Some(Self::YouthMedium),
            "yl" => Some(Self::YouthLarge),
            "as" => Some(Self::AdultSmall),
            "am" => Some(Self::AdultMedium),
            "al" => Some(Self::AdultLarge),
            "axl" => Some(Self::AdultXl),
            "a2xl" => Some(Self::AdultXxl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Raw registration payload as submitted by the client, before the
/// validation gate has run. Enum-valued fields arrive as strings; the
/// client-displayed `amount` is carried for diagnostics but the locked
/// price always comes from the event catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<u16>,
    pub grade: String,
    pub gender: String,
    pub shirt_size: String,
    pub experience: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub event: String,
    pub amount: Option<String>,
}

/// One confirmed or in-flight registration attempt.
///
/// Uniquely keyed by correlation id, by (email, event), and by payment
/// reference; the storage layer enforces all three. Rows are never
/// deleted - refunds and cancellations are modeled as new records
/// elsewhere, not as mutation of history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub correlation_id: CorrelationId,
    pub payment_ref: PaymentRef,
    pub event: EventId,
    /// Price captured from the catalog at creation time, in minor units.
    /// Never recalculated.
    pub locked_price_cents: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u8,
    pub grade: Grade,
    pub gender: Gender,
    pub shirt_size: ShirtSize,
    pub experience: Experience,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub payment_status: PaymentStatus,
    pub checksum: Checksum,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub origin: ClientContext,
}

impl Registration {
    /// Participant display name used in processor metadata and notices.
    pub fn participant_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
