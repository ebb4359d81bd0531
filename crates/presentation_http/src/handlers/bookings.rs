//! Booking handlers
//!
//! REST endpoints for the caller's ride bookings. Every handler acts on
//! behalf of the user in the request's `RequestContext`.

use application::RequestContext;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::{Booking, BookingId, DriverMatch, NewBooking};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use super::route::RouteResponse;
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Booking form body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 10, max = 25, message = "must be between 10 and 25 characters"))]
    pub phone: String,
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub departure: String,
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub arrival: String,
}

/// Response to a successful booking
///
/// `driver` is absent when dispatch found nobody; the booking then stays
/// pending.
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    pub route: RouteResponse,
    pub driver: Option<DriverMatch>,
}

/// Book a ride
///
/// POST /v1/bookings
#[instrument(skip(state, ctx, request))]
pub async fn create_booking(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), ApiError> {
    let new_booking = NewBooking::new(
        &request.name,
        &request.phone,
        &request.departure,
        &request.arrival,
    )?;

    let confirmation = state
        .booking_service
        .create_booking(ctx.as_ref().map(|Extension(c)| c), new_booking)
        .await?;

    info!(
        booking_id = %confirmation.booking.id,
        status = %confirmation.booking.status,
        driver_found = confirmation.driver.is_some(),
        "Booking request handled"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            route: RouteResponse::from(&confirmation.route),
            booking: confirmation.booking,
            driver: confirmation.driver,
        }),
    ))
}

/// List the caller's bookings, newest first
///
/// GET /v1/bookings
#[instrument(skip(state, ctx))]
pub async fn list_bookings(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state
        .booking_service
        .list_bookings(ctx.as_ref().map(|Extension(c)| c))
        .await?;
    debug!(count = bookings.len(), "Listed bookings");
    Ok(Json(bookings))
}

/// Get one booking
///
/// GET /v1/bookings/{id}
#[instrument(skip(state, ctx))]
pub async fn get_booking(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let booking = state
        .booking_service
        .get_booking(ctx.as_ref().map(|Extension(c)| c), booking_id)
        .await?;
    Ok(Json(booking))
}

/// Cancel a pending or confirmed booking
///
/// POST /v1/bookings/{id}/cancel
#[instrument(skip(state, ctx))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    let booking = state
        .booking_service
        .cancel_booking(ctx.as_ref().map(|Extension(c)| c), booking_id)
        .await?;
    Ok(Json(booking))
}

/// Delete a booking
///
/// DELETE /v1/bookings/{id}
#[instrument(skip(state, ctx))]
pub async fn delete_booking(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let booking_id = parse_booking_id(&id)?;
    state
        .booking_service
        .delete_booking(ctx.as_ref().map(|Extension(c)| c), booking_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    BookingId::parse(id).map_err(|e| ApiError::BadRequest(format!("Invalid booking ID: {e}")))
}
