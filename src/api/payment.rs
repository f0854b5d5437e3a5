//! Payment stub API endpoint
//!
//! There is no payment processing: the endpoint echoes the booking summary
//! back with the external contact channel to complete the booking through.
//! Query-parameter driven, like the screen it backs.

use axum::extract::Query;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::Error;
use super::Success;

/// Where bookings are completed until payment processing lands
const CONTACT_URL: &str = "https://linktr.ee/ulatrips";

/// Payment summary query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    destination_id: Option<Uuid>,
    destination: Option<String>,
    location: Option<String>,
    time_slot: Option<String>,
    duration: Option<String>,
}

/// Payment summary response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummaryResponse {
    /// The destination being paid for, if known
    pub destination_id: Option<Uuid>,

    /// Display name of the destination
    pub destination: String,

    /// Town or area
    pub location: String,

    /// The time slot of the tour
    pub time_slot: String,

    /// Free-text duration
    pub duration: String,

    /// Where to complete the booking
    pub contact_url: &'static str,

    /// What the user should do next
    pub note: &'static str,
}

/// Summarize a booking for the payment screen
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:7000/api/payment?destination=Shore%20Temple&location=Mahabalipuram'
/// ```
pub async fn summary(
    Query(query): Query<SummaryQuery>,
) -> Result<Success<PaymentSummaryResponse>, Error> {
    Ok(Success::ok(PaymentSummaryResponse {
        destination_id: query.destination_id,
        destination: query
            .destination
            .unwrap_or_else(|| String::from("Unknown Destination")),
        location: query.location.unwrap_or_default(),
        time_slot: query
            .time_slot
            .unwrap_or_else(|| String::from("12:00 PM - 1:00 PM")),
        duration: query.duration.unwrap_or_default(),
        contact_url: CONTACT_URL,
        note: "Payment processing is coming soon. For now, please contact us to \
            complete your booking.",
    }))
}
