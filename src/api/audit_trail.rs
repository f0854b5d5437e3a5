//! Audit trail service

use std::net::IpAddr;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::extract::OptionalFromRequestParts;
use axum::http::request::Parts;

use crate::client_ip::ClientIp;
use crate::storage::AuditEntry;
use crate::storage::Storage;

use super::CurrentUser;
use super::Error;

/// Audit trail service
pub struct AuditTrail<S: Storage> {
    /// Storage in where the trail is saved
    storage: S,

    /// The current user for the audit trail
    current_user: CurrentUser<S>,

    /// The IP address associated with the audit trail
    ip_address: Option<IpAddr>,
}

impl<S: Storage> AuditTrail<S> {
    /// Register an entry on the audit trail
    ///
    /// A failure here is logged, never returned: the action itself already
    /// happened.
    pub async fn register(&self, entry: AuditEntry<'_>) {
        let result = self
            .storage
            .register_audit_trail(&self.current_user, &entry, self.ip_address.as_ref())
            .await;

        if let Err(err) = result {
            tracing::error!("Could not register audit trail entry: {err}");
        }
    }
}

impl<B, S> FromRequestParts<B> for AuditTrail<S>
where
    B: Send + Sync,
    S: Storage,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        let Extension(storage) = parts
            .extract::<Extension<S>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get a storage pool"))?;

        let current_user = CurrentUser::from_request_parts(parts, state).await?;

        let ip_address =
            <ClientIp as OptionalFromRequestParts<B>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::internal_server_error("Missing address"))?
                .map(|client_ip| client_ip.ip_address.0);

        Ok(AuditTrail {
            storage,
            current_user,
            ip_address,
        })
    }
}
