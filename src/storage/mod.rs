//! All things related to the storage of destinations, bookings and users

use core::fmt;
use std::net::IpAddr;

use async_trait::async_trait;
use chrono::NaiveDate;
use url::Url;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingStatus;
use crate::destinations::Destination;
use crate::destinations::Faq;
use crate::users::Role;
use crate::users::User;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug)]
pub enum Error {
    /// A connection error with the storage
    Connection(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
        }
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The initial session ID for the user
    pub session_id: &'a Uuid,

    /// The role of the user
    pub role: Role,

    /// The email address, unique across all users
    pub email: &'a str,

    /// Optional display name
    pub full_name: Option<&'a str>,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to update the profile part of a user
pub struct UpdateProfileValues<'a> {
    /// New display name
    pub full_name: Option<&'a str>,
}

/// Values to create a Destination
pub struct CreateDestinationValues<'a> {
    /// Display name
    pub name: &'a str,

    /// Town or area
    pub location: &'a str,

    /// Catalog description
    pub description: &'a str,

    /// Catalog card image
    pub image_url: &'a Url,

    /// Free-text duration
    pub duration: &'a str,

    /// The one fixed time slot
    pub time_slot: &'a str,

    /// Catalog highlights
    pub highlights: &'a [String],

    /// Detail view FAQs
    pub faqs: &'a [Faq],
}

/// Values to update a Destination
///
/// Fields left at `None` are not touched
pub struct UpdateDestinationValues<'a> {
    pub name: Option<&'a String>,
    pub location: Option<&'a String>,
    pub description: Option<&'a String>,
    pub image_url: Option<Url>,
    pub duration: Option<&'a String>,
    pub time_slot: Option<&'a String>,
    pub highlights: Option<&'a Vec<String>>,
    pub faqs: Option<&'a Vec<Faq>>,
}

/// Values to create a Booking
///
/// The time slot is snapshotted from the destination here, so the booking
/// keeps it even when the destination later changes or disappears.
pub struct CreateBookingValues<'a> {
    /// The user making the booking
    pub user: &'a User,

    /// The destination being booked
    pub destination: &'a Destination,

    /// The calendar date of the tour
    pub booking_date: NaiveDate,
}

/// Possible audit trail entry types
pub enum AuditEntry<'a> {
    /// User signed up
    SignUp(&'a User),

    /// Destination is created
    CreateDestination(&'a Destination),

    /// Destination is updated
    UpdateDestination(&'a Destination),

    /// Destination is deleted
    DeleteDestination(&'a Destination),

    /// Booking is created
    CreateBooking(&'a Booking),

    /// Booking status is changed
    UpdateBookingStatus(&'a Booking),
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find any single user
    ///
    /// Respects the soft-delete
    async fn find_any_single_user(&self) -> Result<Option<User>>;

    /// Finds all users
    ///
    /// Respects the soft-delete
    async fn find_all_users(&self) -> Result<Vec<User>>;

    /// Finds a single user by its email address
    ///
    /// Respects the soft-delete
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Finds a single user by its ID
    ///
    /// Respects the soft-delete
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues) -> Result<User>;

    /// Update the profile fields of a user
    async fn update_profile(&self, user: &User, values: &UpdateProfileValues) -> Result<User>;

    /// Find all destinations, newest first
    async fn find_all_destinations(&self) -> Result<Vec<Destination>>;

    /// Find the destinations for a set of IDs
    ///
    /// Missing IDs are silently absent from the result
    async fn find_destinations_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Destination>>;

    /// Find a single destination by ID
    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>>;

    /// Create a destination
    async fn create_destination(&self, values: &CreateDestinationValues) -> Result<Destination>;

    /// Update a single destination
    async fn update_destination(
        &self,
        destination: &Destination,
        values: &UpdateDestinationValues,
    ) -> Result<Destination>;

    /// Delete a destination
    ///
    /// A hard delete: bookings referencing the destination keep their row
    /// and their snapshotted time slot, the reference just stops resolving
    async fn delete_destination(&self, destination: &Destination) -> Result<()>;

    /// Find all bookings of all users, newest first
    async fn find_all_bookings(&self) -> Result<Vec<Booking>>;

    /// Find the bookings of one user, ordered by booking date ascending
    async fn find_bookings_by_user(&self, user_id: &Uuid) -> Result<Vec<Booking>>;

    /// Find a single booking by ID
    async fn find_single_booking_by_id(&self, id: &Uuid) -> Result<Option<Booking>>;

    /// Create a booking in `pending` status
    async fn create_booking(&self, values: &CreateBookingValues) -> Result<Booking>;

    /// Set the status of a booking
    async fn update_booking_status(
        &self,
        booking: &Booking,
        status: BookingStatus,
    ) -> Result<Booking>;

    /// Register a creative/destructive action on the audit trail
    async fn register_audit_trail(
        &self,
        created_by: &User,
        entry: &AuditEntry,
        ip_address: Option<&IpAddr>,
    ) -> Result<()>;
}
