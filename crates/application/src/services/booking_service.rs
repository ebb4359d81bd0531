//! Booking service
//!
//! Creates ride bookings from the booking form: resolves the route, prices
//! the trip, persists the booking and asks dispatch for a driver.

use std::sync::Arc;

use domain::{Booking, BookingId, DriverMatch, NewBooking, ResolvedRoute};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::RouteService;
use crate::error::ApplicationError;
use crate::ports::{BookingStore, DriverDispatchPort};
use crate::request_context::RequestContext;

/// Default number of bookings returned by a listing
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Result of a successful booking
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    /// The stored booking
    pub booking: Booking,
    /// The route the booking was priced on
    pub route: ResolvedRoute,
    /// Driver who accepted the ride, if any was found
    pub driver: Option<DriverMatch>,
}

/// Service managing the bookings of authenticated users
pub struct BookingService {
    routes: Arc<RouteService>,
    store: Arc<dyn BookingStore>,
    dispatch: Arc<dyn DriverDispatchPort>,
    list_limit: usize,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("routes", &self.routes)
            .field("store", &"<BookingStore>")
            .field("dispatch", &"<DriverDispatchPort>")
            .field("list_limit", &self.list_limit)
            .finish()
    }
}

impl BookingService {
    /// Create a new booking service
    #[must_use]
    pub fn new(
        routes: Arc<RouteService>,
        store: Arc<dyn BookingStore>,
        dispatch: Arc<dyn DriverDispatchPort>,
    ) -> Self {
        Self {
            routes,
            store,
            dispatch,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Set the maximum number of bookings returned by a listing
    #[must_use]
    pub const fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    /// Book a ride
    ///
    /// A route failure aborts the booking. A dispatch failure does not: the
    /// booking stays pending and the confirmation carries no driver.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthorized` without a caller, the route service's errors,
    /// or a storage error.
    #[instrument(skip_all, fields(departure = %request.departure, arrival = %request.arrival))]
    pub async fn create_booking(
        &self,
        ctx: Option<&RequestContext>,
        request: NewBooking,
    ) -> Result<BookingConfirmation, ApplicationError> {
        let user_id = RequestContext::require_user(ctx)?;

        let route = self
            .routes
            .resolve_route(&request.departure, &request.arrival)
            .await?;

        let mut booking = Booking::new(user_id, request).with_route(&route);
        self.store.save(&booking).await?;
        info!(booking_id = %booking.id, price = ?booking.price, "Booking created");

        let driver = match self.dispatch.find_driver(route.departure).await {
            Ok(Some(driver)) => {
                let mut confirmed = booking.clone();
                confirmed.assign_driver(driver.clone())?;
                match self.store.update(&confirmed).await {
                    Ok(_) => {
                        info!(booking_id = %confirmed.id, driver = %driver.name, "Driver assigned");
                        booking = confirmed;
                        Some(DriverMatch::new(driver, route.result.driving_duration_s()))
                    },
                    Err(e) => {
                        warn!(booking_id = %booking.id, error = %e, "Failed to record driver");
                        None
                    },
                }
            },
            Ok(None) => {
                warn!(booking_id = %booking.id, "No driver available");
                None
            },
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Driver dispatch failed");
                None
            },
        };

        Ok(BookingConfirmation {
            booking,
            route,
            driver,
        })
    }

    /// List the caller's bookings, newest first
    ///
    /// # Errors
    ///
    /// Returns `NotAuthorized` without a caller, or a storage error.
    #[instrument(skip_all)]
    pub async fn list_bookings(
        &self,
        ctx: Option<&RequestContext>,
    ) -> Result<Vec<Booking>, ApplicationError> {
        let user_id = RequestContext::require_user(ctx)?;
        let bookings = self.store.list_for_user(&user_id, self.list_limit).await?;
        debug!(count = bookings.len(), "Listed bookings");
        Ok(bookings)
    }

    /// Get one of the caller's bookings
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the booking does not exist or belongs to
    /// someone else.
    #[instrument(skip(self, ctx))]
    pub async fn get_booking(
        &self,
        ctx: Option<&RequestContext>,
        id: BookingId,
    ) -> Result<Booking, ApplicationError> {
        let user_id = RequestContext::require_user(ctx)?;
        self.store
            .get(&id)
            .await?
            .filter(|booking| booking.is_owned_by(&user_id))
            .ok_or_else(|| ApplicationError::NotFound(format!("booking {id}")))
    }

    /// Cancel one of the caller's bookings
    ///
    /// # Errors
    ///
    /// Returns `NotFound` like [`Self::get_booking`], or `NotPermitted` for
    /// completed and already cancelled bookings.
    #[instrument(skip(self, ctx))]
    pub async fn cancel_booking(
        &self,
        ctx: Option<&RequestContext>,
        id: BookingId,
    ) -> Result<Booking, ApplicationError> {
        let mut booking = self.get_booking(ctx, id).await?;
        booking.cancel()?;
        if !self.store.update(&booking).await? {
            return Err(ApplicationError::NotFound(format!("booking {id}")));
        }
        info!(booking_id = %id, "Booking cancelled");
        Ok(booking)
    }

    /// Delete one of the caller's bookings
    ///
    /// # Errors
    ///
    /// Returns `NotFound` like [`Self::get_booking`].
    #[instrument(skip(self, ctx))]
    pub async fn delete_booking(
        &self,
        ctx: Option<&RequestContext>,
        id: BookingId,
    ) -> Result<(), ApplicationError> {
        self.get_booking(ctx, id).await?;
        if !self.store.delete(&id).await? {
            return Err(ApplicationError::NotFound(format!("booking {id}")));
        }
        info!(booking_id = %id, "Booking deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::ports::{
        MockBookingStore, MockDirectionsPort, MockDriverDispatchPort, MockGeocodingPort,
    };
    use domain::{BookingStatus, Coordinate, Driver, DomainError, RoutePath, TravelMode, UserId};

    fn route_service(driving_ok: bool) -> Arc<RouteService> {
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_has_credentials().return_const(true);
        let mut directions = MockDirectionsPort::new();
        directions.expect_has_credentials().return_const(true);
        directions
            .expect_fetch_route()
            .returning(move |from, to, mode| match mode {
                TravelMode::Driving if driving_ok => {
                    Ok(RoutePath::new(5000.0, 900.0, vec![from, to]))
                },
                TravelMode::Driving => Err(RouteError::DirectionsService {
                    mode,
                    message: "HTTP 503".to_string(),
                }
                .into()),
                TravelMode::Walking => Ok(RoutePath::new(4800.0, 3840.0, vec![from, to])),
            });
        Arc::new(RouteService::new(Arc::new(geocoding), Arc::new(directions)))
    }

    fn unreachable_routes() -> Arc<RouteService> {
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_has_credentials().return_const(true);
        geocoding.expect_geocode().returning(|_| Ok(vec![]));
        let mut directions = MockDirectionsPort::new();
        directions.expect_has_credentials().return_const(true);
        directions.expect_fetch_route().never();
        Arc::new(RouteService::new(Arc::new(geocoding), Arc::new(directions)))
    }

    fn driver() -> Driver {
        Driver::demo_roster().remove(0)
    }

    fn request() -> NewBooking {
        NewBooking::new("Grace", "+243 81 234 5678", "-4.304,15.3136", "-4.335,15.35").unwrap()
    }

    fn stored_booking(owner: UserId) -> Booking {
        Booking::new(owner, request())
    }

    fn dispatch_returning(driver: Option<Driver>) -> MockDriverDispatchPort {
        let mut dispatch = MockDriverDispatchPort::new();
        dispatch
            .expect_find_driver()
            .times(1)
            .returning(move |_| Ok(driver.clone()));
        dispatch
    }

    #[tokio::test]
    async fn create_booking_prices_and_confirms() {
        let mut store = MockBookingStore::new();
        store
            .expect_save()
            .withf(|b: &Booking| b.status == BookingStatus::Pending && b.price.is_some())
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_update()
            .withf(|b: &Booking| b.status == BookingStatus::Confirmed && b.driver.is_some())
            .times(1)
            .returning(|_| Ok(true));
        let service = BookingService::new(
            route_service(true),
            Arc::new(store),
            Arc::new(dispatch_returning(Some(driver()))),
        );
        let ctx = RequestContext::new(UserId::new());

        let confirmation = service.create_booking(Some(&ctx), request()).await.unwrap();

        let booking = &confirmation.booking;
        assert_eq!(booking.user_id, ctx.user_id());
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.departure_coords.as_deref(), Some("-4.304,15.3136"));
        assert_eq!(booking.distance_m, Some(5000.0));
        assert_eq!(booking.duration_s, Some(900));
        assert_eq!(booking.price.map(|p| p.francs()), Some(3500));

        let assigned = confirmation.driver.unwrap();
        assert_eq!(assigned.driver, driver());
        assert_eq!(assigned.trip_minutes, Some(15));
    }

    #[tokio::test]
    async fn walking_booking_has_no_trip_minutes() {
        let mut store = MockBookingStore::new();
        store.expect_save().returning(|_| Ok(()));
        store.expect_update().returning(|_| Ok(true));
        let service = BookingService::new(
            route_service(false),
            Arc::new(store),
            Arc::new(dispatch_returning(Some(driver()))),
        );
        let ctx = RequestContext::new(UserId::new());

        let confirmation = service.create_booking(Some(&ctx), request()).await.unwrap();

        assert_eq!(confirmation.route.result.mode(), TravelMode::Walking);
        assert_eq!(confirmation.booking.duration_s, Some(3840));
        assert_eq!(confirmation.driver.unwrap().trip_minutes, None);
    }

    #[tokio::test]
    async fn no_driver_leaves_booking_pending() {
        let mut store = MockBookingStore::new();
        store.expect_save().times(1).returning(|_| Ok(()));
        store.expect_update().never();
        let service = BookingService::new(
            route_service(true),
            Arc::new(store),
            Arc::new(dispatch_returning(None)),
        );
        let ctx = RequestContext::new(UserId::new());

        let confirmation = service.create_booking(Some(&ctx), request()).await.unwrap();

        assert_eq!(confirmation.booking.status, BookingStatus::Pending);
        assert!(confirmation.driver.is_none());
    }

    #[tokio::test]
    async fn dispatch_failure_leaves_booking_pending() {
        let mut store = MockBookingStore::new();
        store.expect_save().returning(|_| Ok(()));
        store.expect_update().never();
        let mut dispatch = MockDriverDispatchPort::new();
        dispatch
            .expect_find_driver()
            .returning(|_| Err(ApplicationError::ExternalService("offline".to_string())));
        let service = BookingService::new(route_service(true), Arc::new(store), Arc::new(dispatch));
        let ctx = RequestContext::new(UserId::new());

        let confirmation = service.create_booking(Some(&ctx), request()).await.unwrap();
        assert_eq!(confirmation.booking.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn route_failure_aborts_booking() {
        let mut store = MockBookingStore::new();
        store.expect_save().never();
        let mut dispatch = MockDriverDispatchPort::new();
        dispatch.expect_find_driver().never();
        let service = BookingService::new(unreachable_routes(), Arc::new(store), Arc::new(dispatch));
        let ctx = RequestContext::new(UserId::new());
        let request = NewBooking::new("Grace", "0812345678", "Nowhere street", "Limete").unwrap();

        let err = service.create_booking(Some(&ctx), request).await.unwrap_err();
        assert!(matches!(
            err.as_route_error(),
            Some(RouteError::AddressNotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_requires_identity() {
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(MockBookingStore::new()),
            Arc::new(MockDriverDispatchPort::new()),
        );

        let err = service.create_booking(None, request()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn list_uses_caller_and_limit() {
        let ctx = RequestContext::new(UserId::new());
        let user_id = ctx.user_id();
        let mut store = MockBookingStore::new();
        store
            .expect_list_for_user()
            .withf(move |id: &UserId, limit: &usize| *id == user_id && *limit == 10)
            .returning(move |id, _| Ok(vec![stored_booking(*id)]));
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(store),
            Arc::new(MockDriverDispatchPort::new()),
        )
        .with_list_limit(10);

        let bookings = service.list_bookings(Some(&ctx)).await.unwrap();
        assert_eq!(bookings.len(), 1);
    }

    #[tokio::test]
    async fn list_requires_identity() {
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(MockBookingStore::new()),
            Arc::new(MockDriverDispatchPort::new()),
        );

        let err = service.list_bookings(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn foreign_booking_is_not_found() {
        let mut store = MockBookingStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(stored_booking(UserId::new()))));
        store.expect_delete().never();
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(store),
            Arc::new(MockDriverDispatchPort::new()),
        );
        let ctx = RequestContext::new(UserId::new());

        let err = service.get_booking(Some(&ctx), BookingId::new()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));

        let err = service.delete_booking(Some(&ctx), BookingId::new()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn cancel_updates_status() {
        let ctx = RequestContext::new(UserId::new());
        let owner = ctx.user_id();
        let mut store = MockBookingStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored_booking(owner))));
        store
            .expect_update()
            .withf(|b: &Booking| b.status == BookingStatus::Cancelled)
            .times(1)
            .returning(|_| Ok(true));
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(store),
            Arc::new(MockDriverDispatchPort::new()),
        );

        let booking = service.cancel_booking(Some(&ctx), BookingId::new()).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancelling_twice_is_not_permitted() {
        let ctx = RequestContext::new(UserId::new());
        let owner = ctx.user_id();
        let mut store = MockBookingStore::new();
        store.expect_get().returning(move |_| {
            let mut booking = stored_booking(owner);
            booking.status = BookingStatus::Cancelled;
            Ok(Some(booking))
        });
        store.expect_update().never();
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(store),
            Arc::new(MockDriverDispatchPort::new()),
        );

        let err = service
            .cancel_booking(Some(&ctx), BookingId::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::NotPermitted(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_owned_booking() {
        let ctx = RequestContext::new(UserId::new());
        let owner = ctx.user_id();
        let mut store = MockBookingStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(stored_booking(owner))));
        store.expect_delete().times(1).returning(|_| Ok(true));
        let service = BookingService::new(
            unreachable_routes(),
            Arc::new(store),
            Arc::new(MockDriverDispatchPort::new()),
        );

        service
            .delete_booking(Some(&ctx), BookingId::new())
            .await
            .unwrap();
    }

    #[test]
    fn confirmation_serializes_route_mode() {
        let route = ResolvedRoute {
            departure: Coordinate::kinshasa(),
            arrival: Coordinate::kinshasa(),
            result: domain::RouteResult::Walking {
                route: RoutePath::new(100.0, 80.0, vec![]),
            },
        };
        let confirmation = BookingConfirmation {
            booking: stored_booking(UserId::new()).with_route(&route),
            route,
            driver: None,
        };

        let json = serde_json::to_value(&confirmation).unwrap();
        assert_eq!(json["route"]["result"]["mode"], "walking");
        assert_eq!(json["booking"]["status"], "pending");
    }
}
