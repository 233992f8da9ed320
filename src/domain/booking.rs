//! Course bookings, credit balances and coach revenue.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a booking. Cancelled bookings are kept for accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Active,
    Cancelled { at: DateTime<Utc> },
}

impl BookingStatus {
    pub fn from_cancelled_at(cancelled_at: Option<DateTime<Utc>>) -> Self {
        match cancelled_at {
            None => BookingStatus::Active,
            Some(at) => BookingStatus::Cancelled { at },
        }
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BookingStatus::Active => None,
            BookingStatus::Cancelled { at } => Some(*at),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Cancelled { .. } => "cancelled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
}

/// A booking joined with the course it targets, as shown to the booker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookingRecord {
    pub course_id: Uuid,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub meeting_url: String,
    pub coach_name: String,
    /// `active` or `cancelled`
    pub status: String,
}

/// A user's credit position: purchased credits minus active bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CreditBalance {
    pub remain: i64,
    pub used: i64,
}

impl CreditBalance {
    pub fn new(purchased: i64, used: i64) -> Self {
        Self {
            remain: purchased - used,
            used,
        }
    }

    pub fn can_book(&self) -> bool {
        self.remain > 0
    }
}

/// Revenue figures for one coach over one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct MonthlyRevenue {
    pub revenue: i64,
    pub participants: i64,
    pub course_count: i64,
}

impl MonthlyRevenue {
    /// `course_count` bookings priced at the blended per-credit price
    /// (`total_price / total_credits` across the whole catalog), floored.
    pub fn from_bookings(
        course_count: i64,
        participants: i64,
        total_price: i64,
        total_credits: i64,
    ) -> Self {
        let revenue = if total_credits > 0 {
            (course_count as i128 * total_price as i128).div_euclid(total_credits as i128) as i64
        } else {
            0
        };

        Self {
            revenue,
            participants,
            course_count,
        }
    }
}

/// Month names accepted by the revenue endpoint.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// 1-based month number for an English month name (case-insensitive).
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

/// Inclusive UTC bounds of a calendar month: first instant to last microsecond.
pub fn month_window(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let start = Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0)?);
    let end = Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0)?) - chrono::Duration::microseconds(1);
    Some((start, end))
}

/// Current UTC year.
pub fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_nullable_timestamp() {
        assert_eq!(BookingStatus::from_cancelled_at(None), BookingStatus::Active);

        let at = Utc::now();
        let status = BookingStatus::from_cancelled_at(Some(at));
        assert!(!status.is_active());
        assert_eq!(status.cancelled_at(), Some(at));
        assert_eq!(status.label(), "cancelled");
    }

    #[test]
    fn test_credit_balance() {
        let balance = CreditBalance::new(3, 2);
        assert_eq!(balance.remain, 1);
        assert!(balance.can_book());

        let exhausted = CreditBalance::new(2, 2);
        assert!(!exhausted.can_book());

        // Not clamped: an overshoot stays visible
        assert_eq!(CreditBalance::new(1, 2).remain, -1);
    }

    #[test]
    fn test_revenue_uses_blended_price() {
        // 100 credits for 1000 -> 10 per credit
        let revenue = MonthlyRevenue::from_bookings(5, 3, 1000, 100);
        assert_eq!(
            revenue,
            MonthlyRevenue {
                revenue: 50,
                participants: 3,
                course_count: 5
            }
        );

        // 7 credits for 1400 + 14 credits for 2520 -> 3920 / 21 = 186.66.. per credit
        let revenue = MonthlyRevenue::from_bookings(3, 2, 3920, 21);
        assert_eq!(revenue.revenue, 560);

        let revenue = MonthlyRevenue::from_bookings(1, 1, 3920, 21);
        assert_eq!(revenue.revenue, 186);
    }

    #[test]
    fn test_revenue_with_empty_catalog() {
        assert_eq!(MonthlyRevenue::from_bookings(4, 2, 0, 0).revenue, 0);
    }

    #[test]
    fn test_month_from_name() {
        assert_eq!(month_from_name("january"), Some(1));
        assert_eq!(month_from_name("December"), Some(12));
        assert_eq!(month_from_name("smarch"), None);
    }

    #[test]
    fn test_month_window_bounds() {
        let (start, end) = month_window(2024, 2).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, end) = month_window(2024, 12).unwrap();
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        assert!(month_window(2024, 13).is_none());
    }
}
