//! Destinations API endpoints
//!
//! The public catalog plus the admin-only management operations

use axum::Extension;
use axum::extract::Query;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::destinations::Destination;
use crate::destinations::Faq;
use crate::destinations::normalize_query;
use crate::storage::AuditEntry;
use crate::storage::CreateDestinationValues;
use crate::storage::Storage;
use crate::storage::UpdateDestinationValues;
use crate::users::Role;

use super::AuditTrail;
use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::parse_url;
use super::required_field;

/// Destination response going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationResponse {
    /// Destination ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Town or area
    pub location: String,

    /// Catalog description
    pub description: String,

    /// Catalog card image
    pub image_url: String,

    /// Free-text duration
    pub duration: String,

    /// The one fixed time slot
    pub time_slot: String,

    /// Catalog highlights
    pub highlights: Vec<String>,

    /// Detail view FAQs
    pub faqs: Vec<Faq>,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}

impl DestinationResponse {
    /// Create a response from a [`Destination`](Destination)
    fn from_destination(destination: Destination) -> Self {
        Self {
            id: destination.id,
            name: destination.name,
            location: destination.location,
            description: destination.description,
            image_url: destination.image_url,
            duration: destination.duration,
            time_slot: destination.time_slot,
            highlights: destination.highlights,
            faqs: destination.faqs,
            created_at: destination.created_at,
            updated_at: destination.updated_at,
        }
    }

    /// Create a response from multiple [`Destination`](Destination)s
    fn from_destination_multiple(mut destinations: Vec<Destination>) -> Vec<Self> {
        destinations
            .drain(..)
            .map(Self::from_destination)
            .collect::<Vec<Self>>()
    }
}

/// Catalog list query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Free-text search over name, location and description
    search: Option<String>,
}

/// List all destinations, newest first
///
/// The catalog is public, no token needed. An optional `search` parameter
/// filters with a case-insensitive substring match.
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:7000/api/destinations?search=temple'
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "id": "<uuid>", "name": "Shore Temple" ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    Query(query): Query<ListQuery>,
) -> Result<Success<Vec<DestinationResponse>>, Error> {
    let destinations = storage
        .find_all_destinations()
        .await
        .map_err(Error::internal_server_error)?;

    let destinations = if let Some(search) = &query.search {
        let needle = normalize_query(search);

        destinations
            .into_iter()
            .filter(|destination| destination.matches(&needle))
            .collect()
    } else {
        destinations
    };

    Ok(Success::ok(DestinationResponse::from_destination_multiple(
        destinations,
    )))
}

/// Get a single destination
///
/// Request:
/// ```sh
/// curl -v http://localhost:7000/api/destinations/<uuid>
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(destination_id): PathParameters<Uuid>,
) -> Result<Success<DestinationResponse>, Error> {
    fetch_destination(&storage, &destination_id)
        .await
        .map(|destination| Success::ok(DestinationResponse::from_destination(destination)))
}

/// A question/answer pair as it comes in on a form
#[derive(Debug, Deserialize)]
pub struct FaqForm {
    question: String,
    answer: String,
}

impl FaqForm {
    fn into_faq(self) -> Faq {
        Faq {
            question: self.question,
            answer: self.answer,
        }
    }
}

/// Create destination form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestinationForm {
    /// Display name
    name: String,

    /// Town or area
    location: String,

    /// Catalog description
    description: String,

    /// Catalog card image, must be a valid URL
    image_url: String,

    /// Free-text duration, e.g. "1.5 hours"
    duration: String,

    /// The one fixed time slot, e.g. "9:00 AM - 10:30 AM"
    time_slot: String,

    /// Optional catalog highlights
    highlights: Option<Vec<String>>,

    /// Optional detail view FAQs
    faqs: Option<Vec<FaqForm>>,
}

/// Create a destination based on the [`CreateDestinationForm`](CreateDestinationForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "name": "Shore Temple", "location": "Mahabalipuram", ... }' \
///     http://localhost:7000/api/destinations
/// ```
pub async fn create<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<CreateDestinationForm>,
) -> Result<Success<DestinationResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let name = required_field(&form.name, "Name")?;
    let location = required_field(&form.location, "Location")?;
    let description = required_field(&form.description, "Description")?;
    let duration = required_field(&form.duration, "Duration")?;
    let time_slot = required_field(&form.time_slot, "Time slot")?;
    let image_url = parse_url(&form.image_url)?;

    let highlights = form.highlights.unwrap_or_default();
    let faqs = form
        .faqs
        .unwrap_or_default()
        .into_iter()
        .map(FaqForm::into_faq)
        .collect::<Vec<Faq>>();

    let values = CreateDestinationValues {
        name,
        location,
        description,
        image_url: &image_url,
        duration,
        time_slot,
        highlights: &highlights,
        faqs: &faqs,
    };

    let destination = storage
        .create_destination(&values)
        .await
        .map_err(Error::internal_server_error)?;

    audit_trail
        .register(AuditEntry::CreateDestination(&destination))
        .await;

    Ok(Success::created(DestinationResponse::from_destination(
        destination,
    )))
}

/// Update destination form
///
/// Fields to update a destination with, all fields are optional and are not
/// touched when not provided
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestinationForm {
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    duration: Option<String>,
    time_slot: Option<String>,
    highlights: Option<Vec<String>>,
    faqs: Option<Vec<FaqForm>>,
}

/// Update a destination based on the [`UpdateDestinationForm`](UpdateDestinationForm) form
///
/// Only provided values are processed, the other fields of the destination
/// will not be touched. Existing bookings keep their snapshotted time slot
/// even when the slot changes here.
///
/// Request:
/// ```sh
/// curl -v -XPATCH -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "timeSlot": "11:00 AM - 12:30 PM" }' \
///     http://localhost:7000/api/destinations/<uuid>
/// ```
pub async fn update<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(destination_id): PathParameters<Uuid>,
    Form(form): Form<UpdateDestinationForm>,
) -> Result<Success<DestinationResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let destination = fetch_destination(&storage, &destination_id).await?;

    let image_url = if let Some(ref image_url) = form.image_url {
        Some(parse_url(image_url)?)
    } else {
        None
    };

    let faqs = form.faqs.map(|faqs| {
        faqs.into_iter()
            .map(FaqForm::into_faq)
            .collect::<Vec<Faq>>()
    });

    let values = UpdateDestinationValues {
        name: form.name.as_ref(),
        location: form.location.as_ref(),
        description: form.description.as_ref(),
        image_url,
        duration: form.duration.as_ref(),
        time_slot: form.time_slot.as_ref(),
        highlights: form.highlights.as_ref(),
        faqs: faqs.as_ref(),
    };

    let updated_destination = storage
        .update_destination(&destination, &values)
        .await
        .map_err(Error::internal_server_error)?;

    audit_trail
        .register(AuditEntry::UpdateDestination(&updated_destination))
        .await;

    Ok(Success::ok(DestinationResponse::from_destination(
        updated_destination,
    )))
}

/// Delete a destination
///
/// Irreversible: the row is gone. Bookings referencing the destination are
/// left in place and resolve their destination to `null` from here on.
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:7000/api/destinations/<uuid>
/// ```
pub async fn delete<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(destination_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let destination = fetch_destination(&storage, &destination_id).await?;

    storage
        .delete_destination(&destination)
        .await
        .map_err(Error::internal_server_error)?;

    audit_trail
        .register(AuditEntry::DeleteDestination(&destination))
        .await;

    Ok(Success::<&'static str>::no_content())
}

/// Fetch destination from storage
async fn fetch_destination<S: Storage>(
    storage: &S,
    destination_id: &Uuid,
) -> Result<Destination, Error> {
    storage
        .find_single_destination_by_id(destination_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Destination not found")), Ok)
}
