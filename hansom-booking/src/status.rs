use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking lifecycle states.
///
/// A booking starts in `Pending` and either runs the full chain through
/// `Completed` or drops out to `Cancelled` before payment clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Initial state at creation, awaiting operator confirmation
    Pending,
    /// Operator accepted the reservation
    Confirmed,
    /// Payment request sent to the customer
    PaymentSent,
    /// Payment cleared
    Paid,
    /// Driver en route to the pickup address
    OnTheWay,
    /// Driver waiting at the pickup address
    Arrived,
    /// Ride underway
    InProgress,
    /// Ride finished
    Completed,
    /// Dropped out of the lifecycle
    Cancelled,
}

impl BookingStatus {
    /// Statuses directly reachable from this one
    pub fn allowed_next(&self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[PaymentSent, Cancelled],
            PaymentSent => &[Paid, Cancelled],
            Paid => &[OnTheWay],
            OnTheWay => &[Arrived],
            Arrived => &[InProgress],
            InProgress => &[Completed],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::PaymentSent => write!(f, "payment_sent"),
            Self::Paid => write!(f, "paid"),
            Self::OnTheWay => write!(f, "on_the_way"),
            Self::Arrived => write!(f, "arrived"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "payment_sent" => Ok(Self::PaymentSent),
            "paid" => Ok(Self::Paid),
            "on_the_way" => Ok(Self::OnTheWay),
            "arrived" => Ok(Self::Arrived),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid booking status: {s}")),
        }
    }
}
