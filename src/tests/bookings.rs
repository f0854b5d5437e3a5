use axum::http::StatusCode;
use axum::Router;
use uuid::Uuid;

use crate::tests::helper;

async fn create_destination(app: &mut Router, admin_token: &str) -> helper::Destination {
    let (status_code, destination, _) = helper::maybe_create_destination(
        app,
        Some(admin_token),
        "Shore Temple",
        "Mahabalipuram",
        "An 8th century temple by the Bay of Bengal",
        "9:00 AM - 10:30 AM",
    )
    .await;

    assert_eq!(StatusCode::CREATED, status_code);

    destination.unwrap()
}

#[tokio::test]
async fn test_booking_create_and_list() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    let date = helper::days_from_today(30);
    let (status_code, booking, _) =
        helper::maybe_create_booking(&mut app, Some(&traveler_token), &destination.id, &date).await;
    assert_eq!(StatusCode::CREATED, status_code);

    let booking = booking.unwrap();
    assert_eq!("pending", booking.status);
    assert_eq!(date, booking.booking_date);
    assert_eq!(destination.id, booking.destination_id);
    // the slot is copied from the destination
    assert_eq!("9:00 AM - 10:30 AM", booking.time_slot);

    // the owner sees exactly this one booking, destination expanded
    let (status_code, bookings) = helper::list_bookings(&mut app, &traveler_token).await;
    assert_eq!(StatusCode::OK, status_code);

    let bookings = bookings.unwrap();
    assert_eq!(1, bookings.len());
    assert_eq!(booking.id, bookings[0].id);
    assert_eq!(
        Some(("Shore Temple".to_string(), "Mahabalipuram".to_string())),
        bookings[0].destination
    );

    // another traveler sees nothing
    let other_token = helper::sign_up_and_login(&mut app, "other@example.com").await;
    let (_, bookings) = helper::list_bookings(&mut app, &other_token).await;
    assert!(bookings.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_create_requires_authentication() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let date = helper::days_from_today(30);
    let (status_code, booking, _) =
        helper::maybe_create_booking(&mut app, None, &destination.id, &date).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert!(booking.is_none());

    // and nothing was written
    let (_, bookings) = helper::list_all_bookings(&mut app, &admin_token).await;
    assert!(bookings.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_create_validations() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    // not a calendar date
    let (status_code, _, error) = helper::maybe_create_booking(
        &mut app,
        Some(&traveler_token),
        &destination.id,
        "next tuesday",
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        Some("Date must be a calendar date in YYYY-MM-DD format".to_string()),
        error
    );

    // in the past
    let (status_code, _, error) = helper::maybe_create_booking(
        &mut app,
        Some(&traveler_token),
        &destination.id,
        "2019-01-01",
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        Some("Booking date can not be in the past".to_string()),
        error
    );

    // unknown destination
    let date = helper::days_from_today(30);
    let (status_code, _, _) =
        helper::maybe_create_booking(&mut app, Some(&traveler_token), &Uuid::new_v4(), &date).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_booking_list_is_ordered_by_date() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    for days in [30, 10, 20] {
        let date = helper::days_from_today(days);
        helper::maybe_create_booking(&mut app, Some(&traveler_token), &destination.id, &date)
            .await;
    }

    let (_, bookings) = helper::list_bookings(&mut app, &traveler_token).await;
    let bookings = bookings.unwrap();

    assert_eq!(3, bookings.len());
    assert_eq!(helper::days_from_today(10), bookings[0].booking_date);
    assert_eq!(helper::days_from_today(20), bookings[1].booking_date);
    assert_eq!(helper::days_from_today(30), bookings[2].booking_date);
}

#[tokio::test]
async fn test_booking_status_flow() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    let date = helper::days_from_today(30);
    let (_, booking, _) =
        helper::maybe_create_booking(&mut app, Some(&traveler_token), &destination.id, &date).await;
    let booking = booking.unwrap();

    // travelers can not change the status, it stays pending
    let (status_code, _, _) =
        helper::maybe_set_booking_status(&mut app, &traveler_token, &booking.id, "confirmed").await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let (_, bookings) = helper::list_bookings(&mut app, &traveler_token).await;
    assert_eq!("pending", bookings.unwrap()[0].status);

    // an unknown status label is rejected
    let (status_code, _, _) =
        helper::maybe_set_booking_status(&mut app, &admin_token, &booking.id, "complete").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    // an unknown booking is not found
    let (status_code, _, _) =
        helper::maybe_set_booking_status(&mut app, &admin_token, &Uuid::new_v4(), "confirmed")
            .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    // the admin confirms; the owner sees it and the overview has it upcoming
    let (status_code, updated, _) =
        helper::maybe_set_booking_status(&mut app, &admin_token, &booking.id, "confirmed").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("confirmed", updated.unwrap().status);

    let (_, bookings) = helper::list_bookings(&mut app, &traveler_token).await;
    assert_eq!("confirmed", bookings.unwrap()[0].status);

    let (_, overview) = helper::booking_overview(&mut app, &traveler_token).await;
    let overview = overview.unwrap();
    assert_eq!(1, overview.upcoming.len());
    assert!(overview.past.is_empty());
    assert!(overview.cancelled.is_empty());

    // relabeling is flat: confirmed goes straight to cancelled
    let (status_code, updated, _) =
        helper::maybe_set_booking_status(&mut app, &admin_token, &booking.id, "cancelled").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("cancelled", updated.unwrap().status);

    let (_, overview) = helper::booking_overview(&mut app, &traveler_token).await;
    let overview = overview.unwrap();
    assert!(overview.upcoming.is_empty());
    assert!(overview.past.is_empty());
    assert_eq!(1, overview.cancelled.len());
}

#[tokio::test]
async fn test_booking_today_is_upcoming() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    let (status_code, _, _) = helper::maybe_create_booking(
        &mut app,
        Some(&traveler_token),
        &destination.id,
        &helper::today(),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    // the boundary is inclusive: today is upcoming, not past
    let (_, overview) = helper::booking_overview(&mut app, &traveler_token).await;
    let overview = overview.unwrap();
    assert_eq!(1, overview.upcoming.len());
    assert!(overview.past.is_empty());
}

#[tokio::test]
async fn test_booking_keeps_snapshotted_time_slot() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    let date = helper::days_from_today(30);
    let (_, booking, _) =
        helper::maybe_create_booking(&mut app, Some(&traveler_token), &destination.id, &date).await;
    assert_eq!("9:00 AM - 10:30 AM", booking.unwrap().time_slot);

    // the destination moves to a new slot
    let (status_code, _) = helper::maybe_update_destination_time_slot(
        &mut app,
        &admin_token,
        &destination.id,
        "2:00 PM - 3:30 PM",
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    // the booking keeps the slot it was made for
    let (_, bookings) = helper::list_bookings(&mut app, &traveler_token).await;
    assert_eq!("9:00 AM - 10:30 AM", bookings.unwrap()[0].time_slot);
}

#[tokio::test]
async fn test_deleted_destination_leaves_booking_dangling() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    let date = helper::days_from_today(30);
    helper::maybe_create_booking(&mut app, Some(&traveler_token), &destination.id, &date).await;

    let status_code =
        helper::maybe_delete_destination(&mut app, &admin_token, &destination.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // the booking survives with its snapshot, the expansion resolves to null
    let (status_code, bookings) = helper::list_bookings(&mut app, &traveler_token).await;
    assert_eq!(StatusCode::OK, status_code);

    let bookings = bookings.unwrap();
    assert_eq!(1, bookings.len());
    assert_eq!(None, bookings[0].destination);
    assert_eq!("9:00 AM - 10:30 AM", bookings[0].time_slot);
}

#[tokio::test]
async fn test_admin_booking_list() {
    let mut app = helper::setup_test_app().await;

    let admin_token = helper::login(&mut app).await;
    let destination = create_destination(&mut app, &admin_token).await;

    let traveler_token = helper::sign_up_and_login(&mut app, "traveler@example.com").await;

    let date = helper::days_from_today(30);
    helper::maybe_create_booking(&mut app, Some(&traveler_token), &destination.id, &date).await;

    // travelers do not get the full listing
    let (status_code, bookings) = helper::list_all_bookings(&mut app, &traveler_token).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert!(bookings.is_none());

    // admins see every booking with the owning profile attached
    let (status_code, bookings) = helper::list_all_bookings(&mut app, &admin_token).await;
    assert_eq!(StatusCode::OK, status_code);

    let bookings = bookings.unwrap();
    assert_eq!(1, bookings.len());
    assert_eq!(
        Some("traveler@example.com".to_string()),
        bookings[0].profile_email
    );
    assert_eq!(
        Some(("Shore Temple".to_string(), "Mahabalipuram".to_string())),
        bookings[0].destination
    );
}
