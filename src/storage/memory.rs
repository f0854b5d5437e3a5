//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingStatus;
use crate::destinations::Destination;
use crate::users::User;

use super::AuditEntry;
use super::CreateBookingValues;
use super::CreateDestinationValues;
use super::CreateUserValues;
use super::Result;
use super::Storage;
use super::UpdateDestinationValues;
use super::UpdateProfileValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown. Applies the same ordering
/// contracts as the SQL backend so the two are not observably different.
#[derive(Clone, Debug)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All destinations in storage
    destinations: Arc<Mutex<HashMap<Uuid, Destination>>>,

    /// All bookings in storage
    bookings: Arc<Mutex<HashMap<Uuid, Booking>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            destinations: Arc::new(Mutex::new(HashMap::new())),
            bookings: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.deleted_at.is_none())
            .cloned())
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email && user.deleted_at.is_none())
            .cloned())
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| &user.id == id && user.deleted_at.is_none())
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            session_id: *values.session_id,
            email: values.email.to_string(),
            full_name: values.full_name.map(ToString::to_string),
            hashed_password: values.hashed_password.to_string(),
            role: values.role,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            deleted_at: None,
        };

        self.users.lock().await.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_profile(&self, user: &User, values: &UpdateProfileValues) -> Result<User> {
        Ok(self
            .users
            .lock()
            .await
            .get_mut(&user.id)
            .map(|user| {
                if let Some(full_name) = values.full_name {
                    user.full_name = Some(full_name.to_string());
                }
                user.updated_at = Utc::now().naive_utc();

                user.clone()
            })
            .expect("HashMap is the source of the user"))
    }

    async fn find_all_destinations(&self) -> Result<Vec<Destination>> {
        let mut destinations = self
            .destinations
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<Destination>>();

        destinations.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(destinations)
    }

    async fn find_destinations_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Destination>> {
        Ok(self
            .destinations
            .lock()
            .await
            .values()
            .filter(|destination| ids.contains(&destination.id))
            .cloned()
            .collect())
    }

    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>> {
        Ok(self.destinations.lock().await.get(id).cloned())
    }

    async fn create_destination(&self, values: &CreateDestinationValues) -> Result<Destination> {
        let destination = Destination {
            id: Uuid::new_v4(),
            name: values.name.to_string(),
            location: values.location.to_string(),
            description: values.description.to_string(),
            image_url: values.image_url.to_string(),
            duration: values.duration.to_string(),
            time_slot: values.time_slot.to_string(),
            highlights: values.highlights.to_vec(),
            faqs: values.faqs.to_vec(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        self.destinations
            .lock()
            .await
            .insert(destination.id, destination.clone());

        Ok(destination)
    }

    async fn update_destination(
        &self,
        destination: &Destination,
        values: &UpdateDestinationValues,
    ) -> Result<Destination> {
        Ok(self
            .destinations
            .lock()
            .await
            .get_mut(&destination.id)
            .map(|destination| {
                if let Some(name) = values.name {
                    destination.name = name.to_string();
                }

                if let Some(location) = values.location {
                    destination.location = location.to_string();
                }

                if let Some(description) = values.description {
                    destination.description = description.to_string();
                }

                if let Some(image_url) = &values.image_url {
                    destination.image_url = image_url.to_string();
                }

                if let Some(duration) = values.duration {
                    destination.duration = duration.to_string();
                }

                if let Some(time_slot) = values.time_slot {
                    destination.time_slot = time_slot.to_string();
                }

                if let Some(highlights) = values.highlights {
                    destination.highlights = highlights.clone();
                }

                if let Some(faqs) = values.faqs {
                    destination.faqs = faqs.clone();
                }

                destination.updated_at = Utc::now().naive_utc();

                destination.clone()
            })
            .expect("HashMap is the source of the destination"))
    }

    async fn delete_destination(&self, destination: &Destination) -> Result<()> {
        self.destinations.lock().await.remove(&destination.id);

        Ok(())
    }

    async fn find_all_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings = self
            .bookings
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<Booking>>();

        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(bookings)
    }

    async fn find_bookings_by_user(&self, user_id: &Uuid) -> Result<Vec<Booking>> {
        let mut bookings = self
            .bookings
            .lock()
            .await
            .values()
            .filter(|booking| &booking.user_id == user_id)
            .cloned()
            .collect::<Vec<Booking>>();

        bookings.sort_by(|a, b| {
            a.booking_date
                .cmp(&b.booking_date)
                .then(a.created_at.cmp(&b.created_at))
        });

        Ok(bookings)
    }

    async fn find_single_booking_by_id(&self, id: &Uuid) -> Result<Option<Booking>> {
        Ok(self.bookings.lock().await.get(id).cloned())
    }

    async fn create_booking(&self, values: &CreateBookingValues) -> Result<Booking> {
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: values.user.id,
            destination_id: values.destination.id,
            booking_date: values.booking_date,
            time_slot: values.destination.time_slot.clone(),
            status: BookingStatus::Pending,
            created_at: Utc::now().naive_utc(),
        };

        self.bookings.lock().await.insert(booking.id, booking.clone());

        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        booking: &Booking,
        status: BookingStatus,
    ) -> Result<Booking> {
        Ok(self
            .bookings
            .lock()
            .await
            .get_mut(&booking.id)
            .map(|booking| {
                booking.status = status;

                booking.clone()
            })
            .expect("HashMap is the source of the booking"))
    }

    async fn register_audit_trail(
        &self,
        _created_by: &User,
        _entry: &AuditEntry,
        _ip_address: Option<&IpAddr>,
    ) -> Result<()> {
        Ok(())
    }
}
