use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

identifier!(
    /// Fleet identifier for a vehicle, e.g. `V004`.
    VehicleId
);
identifier!(
    /// Identifier for a registered lessee, e.g. `L001`.
    LesseeId
);
identifier!(LeaseId);
identifier!(PaymentId);
identifier!(
    /// Gateway reference attached to a settled payment.
    TransactionId
);

/// Raised when a status string falls outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! closed_status {
    ($name:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn ordered() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownStatus {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_status!(VehicleStatus, "vehicle", {
    Available => ("available", "Available"),
    Leased => ("leased", "Leased"),
    Maintenance => ("maintenance", "Maintenance"),
});

closed_status!(LesseeStatus, "lessee", {
    Active => ("active", "Active"),
    Inactive => ("inactive", "Inactive"),
    Pending => ("pending", "Pending"),
});

closed_status!(LeaseStatus, "lease", {
    Active => ("active", "Active"),
    Completed => ("completed", "Completed"),
    Terminated => ("terminated", "Terminated"),
});

closed_status!(PaymentStatus, "payment", {
    Pending => ("pending", "Pending"),
    Paid => ("paid", "Paid"),
    Overdue => ("overdue", "Overdue"),
    Failed => ("failed", "Failed"),
});

impl PaymentStatus {
    /// Statuses surfaced as "payment issues" on the dashboard.
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Overdue | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub vin: String,
    pub license_plate: String,
    pub color: String,
    pub mileage: u32,
    pub status: VehicleStatus,
    pub monthly_rate: Decimal,
}

impl Vehicle {
    /// `2022 Chevrolet Malibu` style name used in pickers and lease listings.
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// A registered lessee. Payment standing is not stored here; it is derived from the
/// payment ledger (see [`crate::workflows::payments::ledger::lessee_payment_status`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lessee {
    pub id: LesseeId,
    pub name: String,
    pub vehicle_id: Option<VehicleId>,
    pub email: String,
    pub phone: String,
    pub status: LesseeStatus,
    pub lease_start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseAgreement {
    pub id: LeaseId,
    pub vehicle_id: VehicleId,
    pub lessee_id: LesseeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_payment: Decimal,
    pub security_deposit: Decimal,
    pub mileage_limit: u32,
    pub status: LeaseStatus,
    pub terms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub lessee_id: LesseeId,
    pub vehicle_id: VehicleId,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_count: Option<u32>,
}

impl Payment {
    /// A fresh, unattempted charge.
    pub fn pending(
        id: PaymentId,
        lessee_id: LesseeId,
        vehicle_id: VehicleId,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            lessee_id,
            vehicle_id,
            amount,
            due_date,
            paid_at: None,
            status: PaymentStatus::Pending,
            payment_method: None,
            transaction_id: None,
            attempt_count: None,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempt_count.unwrap_or(0)
    }

    /// Status as displayed: a pending payment past its due date reads as overdue.
    pub fn effective_status(&self, today: NaiveDate) -> PaymentStatus {
        match self.status {
            PaymentStatus::Pending if self.due_date < today => PaymentStatus::Overdue,
            status => status,
        }
    }

    /// Whole days past due, never negative.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.due_date).num_days().max(0)
    }
}
