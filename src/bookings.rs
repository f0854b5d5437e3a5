//! Bookings
//!
//! The booking lifecycle: a reservation starts out `pending`, an
//! administrator relabels it `confirmed` or `cancelled`, and the set of
//! bookings is partitioned into upcoming/past/cancelled for display.

use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle status of a booking
///
/// New bookings are `pending`. Administrators may set any status to any
/// other status; the label set itself is the only guard.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Awaiting confirmation by an administrator
    Pending,

    /// Confirmed by an administrator
    Confirmed,

    /// Cancelled by an administrator
    Cancelled,
}

/// A reservation of one destination on one calendar date
#[derive(Clone, Debug)]
pub struct Booking {
    /// Booking ID
    pub id: Uuid,

    /// The user that made the booking
    pub user_id: Uuid,

    /// The destination the booking is for
    ///
    /// Destinations can be deleted while bookings stay; resolve with care.
    pub destination_id: Uuid,

    /// The calendar date of the tour
    pub booking_date: NaiveDate,

    /// The time slot, copied from the destination at booking time
    ///
    /// A snapshot, not a live join: later edits to the destination's slot
    /// leave this value untouched.
    pub time_slot: String,

    /// Lifecycle status
    pub status: BookingStatus,

    /// Creation date
    pub created_at: NaiveDateTime,
}

/// Bookings grouped for display
///
/// The groups are disjoint and together cover every booking passed to
/// [`partition`].
#[derive(Debug, Default)]
pub struct TripPartition {
    /// Not cancelled, dated today or later
    pub upcoming: Vec<Booking>,

    /// Not cancelled, dated before today
    pub past: Vec<Booking>,

    /// Cancelled, regardless of date
    pub cancelled: Vec<Booking>,
}

/// Partition bookings into upcoming/past/cancelled
///
/// Cancelled wins over the date check, so a cancelled booking never shows
/// up as upcoming or past. The date boundary is inclusive: a booking dated
/// `today` is upcoming.
pub fn partition(bookings: Vec<Booking>, today: NaiveDate) -> TripPartition {
    let mut trips = TripPartition::default();

    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            trips.cancelled.push(booking);
        } else if booking.booking_date >= today {
            trips.upcoming.push(booking);
        } else {
            trips.past.push(booking);
        }
    }

    trips
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use chrono::Utc;

    use super::*;

    fn booking(booking_date: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            destination_id: Uuid::new_v4(),
            booking_date,
            time_slot: "9:00 AM - 10:30 AM".to_string(),
            status,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_partition_is_disjoint_and_exhaustive() {
        let today = Utc::now().date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

        let bookings = vec![
            booking(tomorrow, BookingStatus::Pending),
            booking(tomorrow, BookingStatus::Confirmed),
            booking(yesterday, BookingStatus::Confirmed),
            booking(yesterday, BookingStatus::Pending),
            booking(tomorrow, BookingStatus::Cancelled),
            booking(yesterday, BookingStatus::Cancelled),
        ];

        let count = bookings.len();
        let trips = partition(bookings, today);

        assert_eq!(2, trips.upcoming.len());
        assert_eq!(2, trips.past.len());
        assert_eq!(2, trips.cancelled.len());
        assert_eq!(
            count,
            trips.upcoming.len() + trips.past.len() + trips.cancelled.len()
        );
    }

    #[test]
    fn test_partition_boundary_today_is_upcoming() {
        let today = Utc::now().date_naive();

        let trips = partition(vec![booking(today, BookingStatus::Pending)], today);

        assert_eq!(1, trips.upcoming.len());
        assert!(trips.past.is_empty());
    }

    #[test]
    fn test_partition_cancelled_wins_over_date() {
        let today = Utc::now().date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

        let trips = partition(
            vec![
                booking(tomorrow, BookingStatus::Cancelled),
                booking(yesterday, BookingStatus::Cancelled),
            ],
            today,
        );

        assert!(trips.upcoming.is_empty());
        assert!(trips.past.is_empty());
        assert_eq!(2, trips.cancelled.len());
    }
}
