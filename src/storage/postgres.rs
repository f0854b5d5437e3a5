//! Postgres storage
//!
//! Queries are runtime-checked: the highlights/FAQ metadata lives in JSONB
//! and the crate has to build against the memory backend alone, without a
//! database around.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::types::ipnetwork::IpNetwork;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingStatus;
use crate::destinations::Destination;
use crate::destinations::Faq;
use crate::users::Role;
use crate::users::User;

use super::AuditEntry;
use super::CreateBookingValues;
use super::CreateDestinationValues;
use super::CreateUserValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateDestinationValues;
use super::UpdateProfileValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Uses the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// `SQLx` type for user role
#[derive(Debug, sqlx::Type)]
#[sqlx(type_name = "user_role_type")]
#[sqlx(rename_all = "kebab-case")]
enum UserRoleType {
    Admin,
    Traveler,
}

impl UserRoleType {
    fn from_role(role: Role) -> Self {
        match role {
            Role::Admin => UserRoleType::Admin,
            Role::Traveler => UserRoleType::Traveler,
        }
    }

    fn to_role(&self) -> Role {
        match self {
            UserRoleType::Admin => Role::Admin,
            UserRoleType::Traveler => Role::Traveler,
        }
    }
}

/// `SQLx` type for booking status
#[derive(Debug, sqlx::Type)]
#[sqlx(type_name = "booking_status_type")]
#[sqlx(rename_all = "kebab-case")]
enum BookingStatusType {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatusType {
    fn from_status(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => BookingStatusType::Pending,
            BookingStatus::Confirmed => BookingStatusType::Confirmed,
            BookingStatus::Cancelled => BookingStatusType::Cancelled,
        }
    }

    fn to_status(&self) -> BookingStatus {
        match self {
            BookingStatusType::Pending => BookingStatus::Pending,
            BookingStatusType::Confirmed => BookingStatus::Confirmed,
            BookingStatusType::Cancelled => BookingStatus::Cancelled,
        }
    }
}

/// `SQLx` type for audit trail entry type
#[derive(Debug, sqlx::Type)]
#[sqlx(type_name = "audit_trail_entry_type")]
#[sqlx(rename_all = "kebab-case")]
enum AuditEntryType {
    SignUp,
    CreateDestination,
    UpdateDestination,
    DeleteDestination,
    CreateBooking,
    UpdateBookingStatus,
}

impl AuditEntryType {
    fn from_audit_entry(entry: &AuditEntry) -> Self {
        match entry {
            AuditEntry::SignUp(_) => Self::SignUp,

            AuditEntry::CreateDestination(_) => Self::CreateDestination,
            AuditEntry::UpdateDestination(_) => Self::UpdateDestination,
            AuditEntry::DeleteDestination(_) => Self::DeleteDestination,

            AuditEntry::CreateBooking(_) => Self::CreateBooking,
            AuditEntry::UpdateBookingStatus(_) => Self::UpdateBookingStatus,
        }
    }
}

/// `SQLx` version of user
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    session_id: Uuid,
    email: String,
    full_name: Option<String>,
    hashed_password: String,
    role: UserRoleType,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    deleted_at: Option<NaiveDateTime>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            session_id: self.session_id,
            email: self.email,
            full_name: self.full_name,
            hashed_password: self.hashed_password,
            role: self.role.to_role(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// `SQLx` version of destination
#[derive(sqlx::FromRow)]
struct DestinationRow {
    id: Uuid,
    name: String,
    location: String,
    description: String,
    image_url: String,
    duration: String,
    time_slot: String,
    highlights: Json<Vec<String>>,
    faqs: Json<Vec<Faq>>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl DestinationRow {
    fn into_destination(self) -> Destination {
        Destination {
            id: self.id,
            name: self.name,
            location: self.location,
            description: self.description,
            image_url: self.image_url,
            duration: self.duration,
            time_slot: self.time_slot,
            highlights: self.highlights.0,
            faqs: self.faqs.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `SQLx` version of booking
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    destination_id: Uuid,
    booking_date: NaiveDate,
    time_slot: String,
    status: BookingStatusType,
    created_at: NaiveDateTime,
}

impl BookingRow {
    fn into_booking(self) -> Booking {
        Booking {
            id: self.id,
            user_id: self.user_id,
            destination_id: self.destination_id,
            booking_date: self.booking_date,
            time_slot: self.time_slot,
            status: self.status.to_status(),
            created_at: self.created_at,
        }
    }
}

const SELECT_USER: &str = "
    SELECT id, session_id, email, full_name, hashed_password, role,
        created_at, updated_at, deleted_at
    FROM users
";

const SELECT_DESTINATION: &str = "
    SELECT id, name, location, description, image_url, duration, time_slot,
        highlights, faqs, created_at, updated_at
    FROM destinations
";

const SELECT_BOOKING: &str = "
    SELECT id, user_id, destination_id, booking_date, time_slot, status, created_at
    FROM bookings
";

#[async_trait]
impl Storage for Postgres {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE deleted_at IS NULL LIMIT 1"
        ))
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(UserRow::into_user))
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE deleted_at IS NULL"))
            .fetch_all(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(users.into_iter().map(UserRow::into_user).collect())
    }

    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE deleted_at IS NULL AND email = $1 LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(UserRow::into_user))
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE deleted_at IS NULL AND id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(UserRow::into_user))
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = sqlx::query_as::<_, UserRow>(
            "
            INSERT INTO users (id, session_id, email, full_name, hashed_password, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, session_id, email, full_name, hashed_password, role,
                created_at, updated_at, deleted_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.session_id)
        .bind(values.email)
        .bind(values.full_name)
        .bind(values.hashed_password)
        .bind(UserRoleType::from_role(values.role))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.into_user())
    }

    async fn update_profile(&self, user: &User, values: &UpdateProfileValues) -> Result<User> {
        let user = sqlx::query_as::<_, UserRow>(
            "
            UPDATE users
            SET full_name = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING id, session_id, email, full_name, hashed_password, role,
                created_at, updated_at, deleted_at
            ",
        )
        .bind(
            values
                .full_name
                .map_or(user.full_name.clone(), |full_name| {
                    Some(full_name.to_string())
                }),
        )
        .bind(user.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.into_user())
    }

    async fn find_all_destinations(&self) -> Result<Vec<Destination>> {
        let destinations =
            sqlx::query_as::<_, DestinationRow>(&format!("{SELECT_DESTINATION} ORDER BY created_at DESC"))
                .fetch_all(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(destinations
            .into_iter()
            .map(DestinationRow::into_destination)
            .collect())
    }

    async fn find_destinations_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Destination>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let destinations = sqlx::query_as::<_, DestinationRow>(&format!(
            "{SELECT_DESTINATION} WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destinations
            .into_iter()
            .map(DestinationRow::into_destination)
            .collect())
    }

    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>> {
        let destination = sqlx::query_as::<_, DestinationRow>(&format!(
            "{SELECT_DESTINATION} WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destination.map(DestinationRow::into_destination))
    }

    async fn create_destination(&self, values: &CreateDestinationValues) -> Result<Destination> {
        let destination = sqlx::query_as::<_, DestinationRow>(
            "
            INSERT INTO destinations
                (id, name, location, description, image_url, duration, time_slot, highlights, faqs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, location, description, image_url, duration, time_slot,
                highlights, faqs, created_at, updated_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.name)
        .bind(values.location)
        .bind(values.description)
        .bind(values.image_url.to_string())
        .bind(values.duration)
        .bind(values.time_slot)
        .bind(Json(values.highlights.to_vec()))
        .bind(Json(values.faqs.to_vec()))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destination.into_destination())
    }

    async fn update_destination(
        &self,
        destination: &Destination,
        values: &UpdateDestinationValues,
    ) -> Result<Destination> {
        let updated_destination = sqlx::query_as::<_, DestinationRow>(
            "
            UPDATE destinations
            SET name = $1, location = $2, description = $3, image_url = $4,
                duration = $5, time_slot = $6, highlights = $7, faqs = $8,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $9
            RETURNING id, name, location, description, image_url, duration, time_slot,
                highlights, faqs, created_at, updated_at
            ",
        )
        .bind(values.name.unwrap_or(&destination.name))
        .bind(values.location.unwrap_or(&destination.location))
        .bind(values.description.unwrap_or(&destination.description))
        .bind(
            values
                .image_url
                .as_ref()
                .map_or(destination.image_url.clone(), ToString::to_string),
        )
        .bind(values.duration.unwrap_or(&destination.duration))
        .bind(values.time_slot.unwrap_or(&destination.time_slot))
        .bind(Json(
            values.highlights.unwrap_or(&destination.highlights).clone(),
        ))
        .bind(Json(values.faqs.unwrap_or(&destination.faqs).clone()))
        .bind(destination.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(updated_destination.into_destination())
    }

    async fn delete_destination(&self, destination: &Destination) -> Result<()> {
        sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(destination.id)
            .execute(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(())
    }

    async fn find_all_bookings(&self) -> Result<Vec<Booking>> {
        let bookings =
            sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} ORDER BY created_at DESC"))
                .fetch_all(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(bookings.into_iter().map(BookingRow::into_booking).collect())
    }

    async fn find_bookings_by_user(&self, user_id: &Uuid) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE user_id = $1 ORDER BY booking_date ASC, created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(bookings.into_iter().map(BookingRow::into_booking).collect())
    }

    async fn find_single_booking_by_id(&self, id: &Uuid) -> Result<Option<Booking>> {
        let booking =
            sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE id = $1 LIMIT 1"))
                .bind(id)
                .fetch_optional(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(booking.map(BookingRow::into_booking))
    }

    async fn create_booking(&self, values: &CreateBookingValues) -> Result<Booking> {
        let booking = sqlx::query_as::<_, BookingRow>(
            "
            INSERT INTO bookings (id, user_id, destination_id, booking_date, time_slot, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, destination_id, booking_date, time_slot, status, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.user.id)
        .bind(values.destination.id)
        .bind(values.booking_date)
        .bind(&values.destination.time_slot)
        .bind(BookingStatusType::Pending)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(booking.into_booking())
    }

    async fn update_booking_status(
        &self,
        booking: &Booking,
        status: BookingStatus,
    ) -> Result<Booking> {
        let updated_booking = sqlx::query_as::<_, BookingRow>(
            "
            UPDATE bookings
            SET status = $1
            WHERE id = $2
            RETURNING id, user_id, destination_id, booking_date, time_slot, status, created_at
            ",
        )
        .bind(BookingStatusType::from_status(status))
        .bind(booking.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(updated_booking.into_booking())
    }

    async fn register_audit_trail(
        &self,
        created_by: &User,
        entry: &AuditEntry,
        ip_address: Option<&IpAddr>,
    ) -> Result<()> {
        let (user_id, destination_id, booking_id) = match entry {
            AuditEntry::SignUp(user) => (Some(user.id), None, None),

            AuditEntry::CreateDestination(destination)
            | AuditEntry::UpdateDestination(destination)
            | AuditEntry::DeleteDestination(destination) => (None, Some(destination.id), None),

            AuditEntry::CreateBooking(booking) | AuditEntry::UpdateBookingStatus(booking) => {
                (None, Some(booking.destination_id), Some(booking.id))
            }
        };

        sqlx::query(
            "
            INSERT INTO audit_trail
                (id, type, created_by, user_id, destination_id, booking_id, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(AuditEntryType::from_audit_entry(entry))
        .bind(created_by.id)
        .bind(user_id)
        .bind(destination_id)
        .bind(booking_id)
        .bind(
            ip_address
                .map(ToString::to_string)
                .and_then(|ip| ip.parse::<IpNetwork>().ok()),
        )
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
