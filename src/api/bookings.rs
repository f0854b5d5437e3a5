//! Bookings API endpoints
//!
//! Travelers create bookings and see their own; administrators see all of
//! them and move them through the lifecycle.

use std::collections::HashMap;

use axum::Extension;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingStatus;
use crate::bookings::partition;
use crate::destinations::Destination;
use crate::storage::AuditEntry;
use crate::storage::CreateBookingValues;
use crate::storage::Storage;
use crate::users::Role;
use crate::users::User;

use super::AuditTrail;
use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::parse_booking_date;

/// The destination fields shown on a booking
///
/// Serialized as `null` when the destination has been deleted since: the
/// dangling reference is visible, not hidden.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSummary {
    /// Display name
    pub name: String,

    /// Town or area
    pub location: String,
}

impl DestinationSummary {
    fn from_destination(destination: &Destination) -> Self {
        Self {
            name: destination.name.clone(),
            location: destination.location.clone(),
        }
    }
}

/// The profile fields shown on a booking in the admin listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// The email address
    pub email: String,

    /// The display name
    pub full_name: Option<String>,
}

impl ProfileSummary {
    fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

/// Booking response going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Booking ID
    pub id: Uuid,

    /// The destination the booking is for
    pub destination_id: Uuid,

    /// The calendar date of the tour
    pub booking_date: NaiveDate,

    /// The time slot as snapshotted at booking time
    pub time_slot: String,

    /// Lifecycle status
    pub status: BookingStatus,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Expanded destination, `null` when it no longer exists
    pub destination: Option<DestinationSummary>,

    /// Expanded owner profile, only present in the admin listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
}

impl BookingResponse {
    /// Create a response from a [`Booking`](Booking) and the destinations it may reference
    fn from_booking(booking: Booking, destinations: &HashMap<Uuid, Destination>) -> Self {
        let destination = destinations
            .get(&booking.destination_id)
            .map(DestinationSummary::from_destination);

        Self {
            id: booking.id,
            destination_id: booking.destination_id,
            booking_date: booking.booking_date,
            time_slot: booking.time_slot,
            status: booking.status,
            created_at: booking.created_at,
            destination,
            profile: None,
        }
    }

    /// Create a response from multiple [`Booking`](Booking)s
    fn from_booking_multiple(
        bookings: Vec<Booking>,
        destinations: &HashMap<Uuid, Destination>,
    ) -> Vec<Self> {
        bookings
            .into_iter()
            .map(|booking| Self::from_booking(booking, destinations))
            .collect::<Vec<Self>>()
    }

    /// Attach the owner profile for the admin listing
    fn with_profile(mut self, profile: Option<ProfileSummary>) -> Self {
        self.profile = profile;
        self
    }
}

/// The booking lists shown as tabs: upcoming, past, cancelled
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripOverviewResponse {
    /// Not cancelled, dated today or later
    pub upcoming: Vec<BookingResponse>,

    /// Not cancelled, dated before today
    pub past: Vec<BookingResponse>,

    /// Cancelled, regardless of date
    pub cancelled: Vec<BookingResponse>,
}

/// Create booking form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingForm {
    /// The destination to book
    destination_id: Uuid,

    /// The calendar date of the tour, `YYYY-MM-DD`
    date: String,
}

/// Create a booking based on the [`CreateBookingForm`](CreateBookingForm) form
///
/// The booking starts out `pending` and copies the destination's time slot;
/// later changes to the destination do not touch it. Dates in the past are
/// rejected.
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "destinationId": "<uuid>", "date": "2025-11-15" }' \
///     http://localhost:7000/api/bookings
/// ```
///
/// Response
/// ```json
/// { "data": { "id": "<uuid>", "status": "pending" ... } }
/// ```
pub async fn create<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<CreateBookingForm>,
) -> Result<Success<BookingResponse>, Error> {
    current_user.role.is_allowed(Role::Traveler)?;

    let booking_date = parse_booking_date(&form.date)?;

    if booking_date < Utc::now().date_naive() {
        return Err(Error::bad_request("Booking date can not be in the past"));
    }

    let destination = storage
        .find_single_destination_by_id(&form.destination_id)
        .await
        .map_err(Error::internal_server_error)?
        .ok_or_else(|| Error::not_found("Destination not found"))?;

    let values = CreateBookingValues {
        user: &current_user,
        destination: &destination,
        booking_date,
    };

    let booking = storage
        .create_booking(&values)
        .await
        .map_err(Error::internal_server_error)?;

    audit_trail
        .register(AuditEntry::CreateBooking(&booking))
        .await;

    let destinations = HashMap::from([(destination.id, destination)]);

    Ok(Success::created(BookingResponse::from_booking(
        booking,
        &destinations,
    )))
}

/// List the current user's bookings, ordered by booking date ascending
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:7000/api/bookings
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<BookingResponse>>, Error> {
    current_user.role.is_allowed(Role::Traveler)?;

    let bookings = storage
        .find_bookings_by_user(&current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    let destinations = referenced_destinations(&storage, &bookings).await?;

    Ok(Success::ok(BookingResponse::from_booking_multiple(
        bookings,
        &destinations,
    )))
}

/// The current user's bookings partitioned into upcoming/past/cancelled
///
/// The groups are disjoint and cover every booking; a booking dated today
/// is upcoming, a cancelled one is only ever cancelled.
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:7000/api/bookings/overview
/// ```
pub async fn overview<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<TripOverviewResponse>, Error> {
    current_user.role.is_allowed(Role::Traveler)?;

    let bookings = storage
        .find_bookings_by_user(&current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    let destinations = referenced_destinations(&storage, &bookings).await?;

    let trips = partition(bookings, Utc::now().date_naive());

    Ok(Success::ok(TripOverviewResponse {
        upcoming: BookingResponse::from_booking_multiple(trips.upcoming, &destinations),
        past: BookingResponse::from_booking_multiple(trips.past, &destinations),
        cancelled: BookingResponse::from_booking_multiple(trips.cancelled, &destinations),
    }))
}

/// List all bookings of all users, newest first
///
/// Each booking carries the owning profile so the admin knows who booked.
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:7000/api/admin/bookings
/// ```
pub async fn list_all<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<BookingResponse>>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let bookings = storage
        .find_all_bookings()
        .await
        .map_err(Error::internal_server_error)?;

    let destinations = referenced_destinations(&storage, &bookings).await?;

    let users = storage
        .find_all_users()
        .await
        .map_err(Error::internal_server_error)?;
    let users = users
        .into_iter()
        .map(|user| (user.id, user))
        .collect::<HashMap<Uuid, User>>();

    let bookings = bookings
        .into_iter()
        .map(|booking| {
            let profile = users.get(&booking.user_id).map(ProfileSummary::from_user);

            BookingResponse::from_booking(booking, &destinations).with_profile(profile)
        })
        .collect::<Vec<BookingResponse>>();

    Ok(Success::ok(bookings))
}

/// Set status form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusForm {
    /// The new status
    status: BookingStatus,
}

/// Set the status of a booking
///
/// A flat relabel: any status can be set to any status. The status label
/// set itself is the only guard, unknown labels are rejected.
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "status": "confirmed" }' \
///     http://localhost:7000/api/bookings/<uuid>/status
/// ```
pub async fn set_status<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(booking_id): PathParameters<Uuid>,
    Form(form): Form<SetStatusForm>,
) -> Result<Success<BookingResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let booking = storage
        .find_single_booking_by_id(&booking_id)
        .await
        .map_err(Error::internal_server_error)?
        .ok_or_else(|| Error::not_found("Booking not found"))?;

    let updated_booking = storage
        .update_booking_status(&booking, form.status)
        .await
        .map_err(Error::internal_server_error)?;

    audit_trail
        .register(AuditEntry::UpdateBookingStatus(&updated_booking))
        .await;

    let destinations = referenced_destinations(&storage, std::slice::from_ref(&updated_booking)).await?;

    Ok(Success::ok(BookingResponse::from_booking(
        updated_booking,
        &destinations,
    )))
}

/// Fetch the destinations a set of bookings reference, keyed by ID
///
/// Deleted destinations are simply absent
async fn referenced_destinations<S: Storage>(
    storage: &S,
    bookings: &[Booking],
) -> Result<HashMap<Uuid, Destination>, Error> {
    let mut ids = bookings
        .iter()
        .map(|booking| booking.destination_id)
        .collect::<Vec<Uuid>>();
    ids.sort_unstable();
    ids.dedup();

    let destinations = storage
        .find_destinations_by_ids(&ids)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(destinations
        .into_iter()
        .map(|destination| (destination.id, destination))
        .collect())
}
