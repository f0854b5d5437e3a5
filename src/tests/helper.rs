use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use tower::Service;
use uuid::Uuid;

use crate::setup_app;

/// Test helper version of Profile struct
#[derive(Debug)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
}

/// Test helper version of Destination struct
#[derive(Debug)]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub time_slot: String,
}

/// Test helper version of Booking struct
///
/// The expanded destination is a (name, location) pair, `None` when the
/// destination no longer exists
#[derive(Debug)]
pub struct Booking {
    pub id: Uuid,
    pub destination_id: Uuid,
    pub booking_date: String,
    pub time_slot: String,
    pub status: String,
    pub destination: Option<(String, String)>,
    pub profile_email: Option<String>,
}

/// Test helper version of the trips overview
#[derive(Debug)]
pub struct Overview {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

/// Setup the app against a fresh in-memory storage
///
/// Inject some environment variables to match our tests
pub async fn setup_test_app() -> Router {
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var("INITIAL_EMAIL", "admin@ulatrips.local");
        std::env::set_var("INITIAL_PASSWORD", "verysecret");
        std::env::set_var("JWT_SECRET", "verysecret");
    }

    setup_app().await.unwrap()
}

async fn request(
    app: &mut Router,
    method: Method,
    uri: &str,
    access_token: Option<&str>,
    payload: Option<Value>,
) -> (StatusCode, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(access_token) = access_token {
        builder = builder.header(AUTHORIZATION, access_token);
    }

    let request = if let Some(payload) = payload {
        builder
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, body)
}

pub async fn maybe_sign_up(
    app: &mut Router,
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> (StatusCode, Option<Profile>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("email".to_string(), Value::String(email.to_string()));
    payload.insert("password".to_string(), Value::String(password.to_string()));

    if let Some(full_name) = full_name {
        payload.insert(
            "fullName".to_string(),
            Value::String(full_name.to_string()),
        );
    }

    let (status_code, body) = request(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_profile(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_login(
    app: &mut Router,
    email: &str,
    password: &str,
) -> (StatusCode, Option<String>) {
    let mut payload = Map::new();
    payload.insert("email".to_string(), Value::String(email.to_string()));
    payload.insert("password".to_string(), Value::String(password.to_string()));

    let (status_code, body) = request(
        app,
        Method::POST,
        "/api/auth/token",
        None,
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_access_token(&body))
        } else {
            None
        },
    )
}

pub async fn login_with(app: &mut Router, email: &str, password: &str) -> String {
    let (status_code, access_token) = maybe_login(app, email, password).await;

    assert_eq!(StatusCode::OK, status_code);

    access_token.unwrap()
}

/// Login as the seeded administrator
pub async fn login(app: &mut Router) -> String {
    login_with(app, "admin@ulatrips.local", "verysecret").await
}

/// Sign up a fresh traveler and login
pub async fn sign_up_and_login(app: &mut Router, email: &str) -> String {
    let (status_code, profile, _) = maybe_sign_up(app, email, "verysecret", None).await;

    assert_eq!(StatusCode::CREATED, status_code);
    assert!(profile.is_some());

    login_with(app, email, "verysecret").await
}

pub async fn current_profile(app: &mut Router, access_token: &str) -> (StatusCode, Option<Profile>) {
    let (status_code, body) = request(
        app,
        Method::GET,
        "/api/profiles/me",
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_profile(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_update_profile(
    app: &mut Router,
    access_token: &str,
    full_name: &str,
) -> (StatusCode, Option<Profile>) {
    let mut payload = Map::new();
    payload.insert(
        "fullName".to_string(),
        Value::String(full_name.to_string()),
    );

    let (status_code, body) = request(
        app,
        Method::PUT,
        "/api/profiles/me",
        Some(access_token),
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_profile(&body))
        } else {
            None
        },
    )
}

pub async fn list_profiles(
    app: &mut Router,
    access_token: &str,
) -> (StatusCode, Option<Vec<Profile>>) {
    let (status_code, body) =
        request(app, Method::GET, "/api/profiles", Some(access_token), None).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_profiles(&body))
        } else {
            None
        },
    )
}

pub async fn single_profile(
    app: &mut Router,
    access_token: &str,
    id: &Uuid,
) -> (StatusCode, Option<Profile>) {
    let (status_code, body) = request(
        app,
        Method::GET,
        &format!("/api/profiles/{id}"),
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_profile(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_create_destination(
    app: &mut Router,
    access_token: Option<&str>,
    name: &str,
    location: &str,
    description: &str,
    time_slot: &str,
) -> (StatusCode, Option<Destination>, Option<String>) {
    maybe_create_destination_with_image(
        app,
        access_token,
        name,
        location,
        description,
        "https://www.example.com/image.jpg",
        time_slot,
    )
    .await
}

pub async fn maybe_create_destination_with_image(
    app: &mut Router,
    access_token: Option<&str>,
    name: &str,
    location: &str,
    description: &str,
    image_url: &str,
    time_slot: &str,
) -> (StatusCode, Option<Destination>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::String(name.to_string()));
    payload.insert("location".to_string(), Value::String(location.to_string()));
    payload.insert(
        "description".to_string(),
        Value::String(description.to_string()),
    );
    payload.insert(
        "imageUrl".to_string(),
        Value::String(image_url.to_string()),
    );
    payload.insert(
        "duration".to_string(),
        Value::String("1.5 hours".to_string()),
    );
    payload.insert(
        "timeSlot".to_string(),
        Value::String(time_slot.to_string()),
    );

    let (status_code, body) = request(
        app,
        Method::POST,
        "/api/destinations",
        access_token,
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_destination(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn list_destinations(
    app: &mut Router,
    search: Option<&str>,
) -> (StatusCode, Option<Vec<Destination>>) {
    let uri = match search {
        Some(search) => format!("/api/destinations?search={search}"),
        None => "/api/destinations".to_string(),
    };

    let (status_code, body) = request(app, Method::GET, &uri, None, None).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_destinations(&body))
        } else {
            None
        },
    )
}

pub async fn single_destination(
    app: &mut Router,
    id: &Uuid,
) -> (StatusCode, Option<Destination>) {
    let (status_code, body) =
        request(app, Method::GET, &format!("/api/destinations/{id}"), None, None).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_destination(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_update_destination_time_slot(
    app: &mut Router,
    access_token: &str,
    id: &Uuid,
    time_slot: &str,
) -> (StatusCode, Option<Destination>) {
    let mut payload = Map::new();
    payload.insert(
        "timeSlot".to_string(),
        Value::String(time_slot.to_string()),
    );

    let (status_code, body) = request(
        app,
        Method::PATCH,
        &format!("/api/destinations/{id}"),
        Some(access_token),
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_destination(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_delete_destination(
    app: &mut Router,
    access_token: &str,
    id: &Uuid,
) -> StatusCode {
    let (status_code, _) = request(
        app,
        Method::DELETE,
        &format!("/api/destinations/{id}"),
        Some(access_token),
        None,
    )
    .await;

    status_code
}

pub async fn maybe_create_booking(
    app: &mut Router,
    access_token: Option<&str>,
    destination_id: &Uuid,
    date: &str,
) -> (StatusCode, Option<Booking>, Option<String>) {
    let mut payload = Map::new();
    payload.insert(
        "destinationId".to_string(),
        Value::String(destination_id.to_string()),
    );
    payload.insert("date".to_string(), Value::String(date.to_string()));

    let (status_code, body) = request(
        app,
        Method::POST,
        "/api/bookings",
        access_token,
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_booking(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn list_bookings(
    app: &mut Router,
    access_token: &str,
) -> (StatusCode, Option<Vec<Booking>>) {
    let (status_code, body) =
        request(app, Method::GET, "/api/bookings", Some(access_token), None).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_bookings(&body))
        } else {
            None
        },
    )
}

pub async fn booking_overview(app: &mut Router, access_token: &str) -> (StatusCode, Option<Overview>) {
    let (status_code, body) = request(
        app,
        Method::GET,
        "/api/bookings/overview",
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_overview(&body))
        } else {
            None
        },
    )
}

pub async fn list_all_bookings(
    app: &mut Router,
    access_token: &str,
) -> (StatusCode, Option<Vec<Booking>>) {
    let (status_code, body) = request(
        app,
        Method::GET,
        "/api/admin/bookings",
        Some(access_token),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_bookings(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_set_booking_status(
    app: &mut Router,
    access_token: &str,
    booking_id: &Uuid,
    status: &str,
) -> (StatusCode, Option<Booking>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("status".to_string(), Value::String(status.to_string()));

    let (status_code, body) = request(
        app,
        Method::PUT,
        &format!("/api/bookings/{booking_id}/status"),
        Some(access_token),
        Some(Value::Object(payload)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_booking(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn get_json(app: &mut Router, uri: &str) -> (StatusCode, Value) {
    let (status_code, body) = request(app, Method::GET, uri, None, None).await;

    (status_code, serde_json::from_slice(&body[..]).unwrap())
}

/// Today as a `YYYY-MM-DD` string
pub fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

/// A date a number of days in the future as a `YYYY-MM-DD` string
pub fn days_from_today(days: u64) -> String {
    chrono::Utc::now()
        .date_naive()
        .checked_add_days(chrono::Days::new(days))
        .unwrap()
        .to_string()
}

fn value_to_profile(profile: &Map<String, Value>) -> Profile {
    Profile {
        id: profile["id"].as_str().map(Uuid::parse_str).unwrap().unwrap(),
        email: profile["email"].as_str().map(ToString::to_string).unwrap(),
        full_name: profile
            .get("fullName")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        role: profile["role"].as_str().map(ToString::to_string).unwrap(),
    }
}

fn get_profile(body: &Bytes) -> Profile {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_object()
        .map(value_to_profile)
        .unwrap()
}

fn get_profiles(body: &Bytes) -> Vec<Profile> {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|profile| profile.as_object().unwrap())
        .map(value_to_profile)
        .collect()
}

fn value_to_destination(destination: &Map<String, Value>) -> Destination {
    Destination {
        id: destination["id"]
            .as_str()
            .map(Uuid::parse_str)
            .unwrap()
            .unwrap(),
        name: destination["name"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        location: destination["location"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        time_slot: destination["timeSlot"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
    }
}

fn get_destination(body: &Bytes) -> Destination {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_object()
        .map(value_to_destination)
        .unwrap()
}

fn get_destinations(body: &Bytes) -> Vec<Destination> {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|destination| destination.as_object().unwrap())
        .map(value_to_destination)
        .collect()
}

fn value_to_booking(booking: &Map<String, Value>) -> Booking {
    Booking {
        id: booking["id"].as_str().map(Uuid::parse_str).unwrap().unwrap(),
        destination_id: booking["destinationId"]
            .as_str()
            .map(Uuid::parse_str)
            .unwrap()
            .unwrap(),
        booking_date: booking["bookingDate"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        time_slot: booking["timeSlot"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
        status: booking["status"].as_str().map(ToString::to_string).unwrap(),
        destination: booking
            .get("destination")
            .and_then(Value::as_object)
            .map(|destination| {
                (
                    destination["name"].as_str().unwrap().to_string(),
                    destination["location"].as_str().unwrap().to_string(),
                )
            }),
        profile_email: booking
            .get("profile")
            .and_then(Value::as_object)
            .and_then(|profile| profile.get("email"))
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn get_booking(body: &Bytes) -> Booking {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_object()
        .map(value_to_booking)
        .unwrap()
}

fn get_bookings(body: &Bytes) -> Vec<Booking> {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|booking| booking.as_object().unwrap())
        .map(value_to_booking)
        .collect()
}

fn value_to_bookings(data: &Value, group: &str) -> Vec<Booking> {
    data[group]
        .as_array()
        .unwrap()
        .iter()
        .map(|booking| booking.as_object().unwrap())
        .map(value_to_booking)
        .collect()
}

fn get_overview(body: &Bytes) -> Overview {
    let data = serde_json::from_slice::<Value>(&body[..]).unwrap()["data"].clone();

    Overview {
        upcoming: value_to_bookings(&data, "upcoming"),
        past: value_to_bookings(&data, "past"),
        cancelled: value_to_bookings(&data, "cancelled"),
    }
}

fn get_error_message(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["error"]
        .as_str()
        .map(ToString::to_string)
        .unwrap()
}

fn get_access_token(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]["access_token"]
        .as_str()
        .map(|access_token| format!("Bearer {access_token}"))
        .unwrap()
}
