use anyhow::Result;
use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::password::generate;
use crate::password::hash;
use crate::storage::CreateUserValues;
use crate::storage::Storage;
use crate::utils::env_var_or_else;

/// User roles
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Manage destinations, bookings and profiles
    Admin,
    /// Browse the catalog and manage their own bookings
    Traveler,
}

/// A registered identity
///
/// Doubles as the profile record: the public projection (email, full name)
/// is what other parts of the system call a "profile".
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub session_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Seed an administrator account when the storage holds no users at all
///
/// Sign-up only ever creates travelers, so without this there would be no
/// way to manage the catalog on a fresh install.
pub async fn ensure_initial_user<S: Storage>(storage: &S) -> Result<()> {
    let user = storage.find_any_single_user().await?;

    if user.is_none() {
        let email = env_var_or_else("INITIAL_EMAIL", || {
            let initial_email = String::from("admin@ulatrips.local");
            tracing::info!("`INITIAL_EMAIL` not set, using default: {initial_email}");
            initial_email
        });

        let password = env_var_or_else("INITIAL_PASSWORD", || {
            let initial_password = generate();
            tracing::info!(
                "`INITIAL_PASSWORD` not set, generating new password: {initial_password}"
            );
            initial_password
        });

        let hashed_password = hash(&password);

        let values = CreateUserValues {
            session_id: &Uuid::new_v4(),
            role: Role::Admin,
            email: &email,
            full_name: None,
            hashed_password: &hashed_password,
        };

        storage.create_user(&values).await?;
    }

    Ok(())
}
