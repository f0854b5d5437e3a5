//! Authentication API endpoints
//!
//! Sign-up and token issuing. Everything else on the API expects the token
//! in the `Authorization` header.

use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::client_ip::ClientIp;
use crate::password::hash;
use crate::password::verify;
use crate::storage::AuditEntry;
use crate::storage::CreateUserValues;
use crate::storage::Storage;
use crate::users::Role;

use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;
use super::profiles::ProfileResponse;

/// Sign up form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    /// Email address, unique across all users
    email: String,

    /// Password, at least 6 characters
    password: String,

    /// Optional display name
    full_name: Option<String>,
}

/// Create an account based on the [`SignUpForm`](SignUpForm) form
///
/// New accounts always get the traveler role; administrators are not
/// created through the public API.
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "traveler@example.com", "password": "verysecret", "fullName": "A. Traveler" }' \
///     http://localhost:7000/api/auth/signup
/// ```
///
/// Response
/// ```json
/// { "data": { "id": "<uuid>", "email": "traveler@example.com" ... } }
/// ```
pub async fn sign_up<S: Storage>(
    Extension(storage): Extension<S>,
    ip_address: Option<ClientIp>,
    Form(form): Form<SignUpForm>,
) -> Result<Success<ProfileResponse>, Error> {
    let email = form.email.trim();

    if !email.contains('@') {
        return Err(Error::bad_request("A valid email address is required"));
    }

    if form.password.len() < 6 {
        return Err(Error::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let user = storage
        .find_single_user_by_email(email)
        .await
        .map_err(Error::internal_server_error)?;

    if user.is_some() {
        return Err(Error::bad_request("An account with this email already exists"));
    }

    let hashed_password = hash(&form.password);

    let values = CreateUserValues {
        session_id: &Uuid::new_v4(),
        role: Role::Traveler,
        email,
        full_name: form.full_name.as_deref(),
        hashed_password: &hashed_password,
    };

    let user = storage
        .create_user(&values)
        .await
        .map_err(Error::internal_server_error)?;

    // the actor is the freshly created user itself, there is no current
    // user to hang this on
    let audit_result = storage
        .register_audit_trail(
            &user,
            &AuditEntry::SignUp(&user),
            ip_address.map(|client_ip| client_ip.ip_address.0).as_ref(),
        )
        .await;

    if let Err(err) = audit_result {
        tracing::error!("Could not register audit trail entry: {err}");
    }

    Ok(Success::created(ProfileResponse::from_user(user)))
}

/// Login form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Email address of the user
    email: String,
    /// Password of the user
    password: String,
}

/// Get a token for a user "session"
///
/// The token can then be used to access the rest of the API routes by using
/// it in the `Authorization` header
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "traveler@example.com", "password": "verysecret" }' \
///     http://localhost:7000/api/auth/token
/// ```
///
/// Response
/// ```json
/// { "data": { "type": "Bearer", "access_token": "some token" } }
/// ```
pub async fn token<S: Storage>(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    Form(form): Form<LoginForm>,
) -> Result<Success<Token>, Error> {
    let user = storage
        .find_single_user_by_email(form.email.trim())
        .await
        .map_err(Error::internal_server_error)?;

    // same error for a missing user and a wrong password
    if let Some(user) = user {
        if verify(&user.hashed_password, &form.password) {
            let token = generate_token(&jwt_keys, &user)?;

            Ok(Success::ok(token))
        } else {
            Err(Error::bad_request("Invalid credentials"))
        }
    } else {
        Err(Error::bad_request("Invalid credentials"))
    }
}
