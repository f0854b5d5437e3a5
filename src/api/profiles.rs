//! Profile API endpoints
//!
//! The profile is the public projection of a user: email, display name,
//! role. Owners manage their own profile, administrators can read all of
//! them (the booking manager shows who booked).

use std::collections::HashMap;
use std::ops::Deref;

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::storage::Storage;
use crate::storage::UpdateProfileValues;
use crate::users::Role;
use crate::users::User;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// The profile response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// The user ID
    pub id: Uuid,

    /// The email address
    pub email: String,

    /// The display name
    pub full_name: Option<String>,

    /// The role of the user
    pub role: Role,
}

impl ProfileResponse {
    /// Create a profile response from a [`User`](User)
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
        }
    }

    /// Create a profile response from multiple [`User`](User)s
    fn from_user_multiple(mut users: Vec<User>) -> Vec<Self> {
        users.drain(..).map(Self::from_user).collect::<Vec<Self>>()
    }
}

/// List all profiles
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:7000/api/profiles
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<ProfileResponse>>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let users = storage
        .find_all_users()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(ProfileResponse::from_user_multiple(users)))
}

/// Get a single profile or the current user's profile
///
/// By passing `me` instead of a user ID, the current user's profile is
/// returned; reading somebody else's profile takes the admin capability
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:7000/api/profiles/me
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(params): PathParameters<HashMap<String, Uuid>>,
) -> Result<Success<ProfileResponse>, Error> {
    let user = if let Some(user_id) = params.get("user") {
        current_user.role.is_allowed(Role::Admin)?;
        fetch_user(&storage, user_id).await?
    } else {
        current_user.role.is_allowed(Role::Traveler)?;
        current_user.deref().clone()
    };

    Ok(Success::ok(ProfileResponse::from_user(user)))
}

/// Update profile form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileForm {
    /// New display name
    full_name: Option<String>,
}

/// Update the current user's profile
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "fullName": "A. Traveler" }' \
///     http://localhost:7000/api/profiles/me
/// ```
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<UpdateProfileForm>,
) -> Result<Success<ProfileResponse>, Error> {
    current_user.role.is_allowed(Role::Traveler)?;

    let values = UpdateProfileValues {
        full_name: form.full_name.as_deref(),
    };

    let updated_user = storage
        .update_profile(&current_user, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(ProfileResponse::from_user(updated_user)))
}

/// Fetch a user from storage
async fn fetch_user<S: Storage>(storage: &S, user_id: &Uuid) -> Result<User, Error> {
    storage
        .find_single_user_by_id(user_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Profile not found")), Ok)
}
