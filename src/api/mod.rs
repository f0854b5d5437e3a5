//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;

pub use audit_trail::AuditTrail;
pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::parse_booking_date;
pub use request::parse_url;
pub use request::required_field;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod audit_trail;
mod auth;
mod bookings;
mod current_user;
mod destinations;
mod payment;
mod profiles;
mod programs;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let auth = Router::new()
        .route("/signup", post(auth::sign_up::<S>))
        .route("/token", post(auth::token::<S>));

    let profiles = Router::new()
        .route("/", get(profiles::list::<S>))
        .route("/me", get(profiles::single::<S>))
        .route("/me", put(profiles::update::<S>))
        .route("/{user}", get(profiles::single::<S>));

    let destinations = Router::new()
        .route("/", get(destinations::list::<S>))
        .route("/", post(destinations::create::<S>))
        .route("/{destination}", get(destinations::single::<S>))
        .route("/{destination}", patch(destinations::update::<S>))
        .route("/{destination}", delete(destinations::delete::<S>));

    let bookings = Router::new()
        .route("/", get(bookings::list::<S>))
        .route("/", post(bookings::create::<S>))
        .route("/overview", get(bookings::overview::<S>))
        .route("/{booking}/status", put(bookings::set_status::<S>));

    let admin = Router::new().route("/bookings", get(bookings::list_all::<S>));

    let programs = Router::new()
        .route("/", get(programs::list))
        .route("/grades", get(programs::grades));

    Router::new()
        .nest("/auth", auth)
        .nest("/profiles", profiles)
        .nest("/destinations", destinations)
        .nest("/bookings", bookings)
        .nest("/admin", admin)
        .nest("/programs", programs)
        .route("/payment", get(payment::summary))
}
