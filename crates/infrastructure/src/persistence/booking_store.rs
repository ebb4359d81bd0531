//! SQLite booking store implementation
//!
//! Implements the `BookingStore` port for persisting ride bookings.

use std::sync::Arc;

use application::{error::ApplicationError, ports::BookingStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{Booking, BookingId, BookingStatus, Driver, Fare, PhoneNumber, UserId};
use rusqlite::{Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

const BOOKING_COLUMNS: &str = "id, user_id, name, phone, departure, arrival, departure_coords, \
     arrival_coords, distance_m, duration_s, price, status, driver, created_at, updated_at";

/// SQLite-based booking store
#[derive(Debug, Clone)]
pub struct SqliteBookingStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteBookingStore {
    /// Create a new SQLite booking store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, user_id = %booking.user_id))]
    async fn save(&self, booking: &Booking) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let booking = booking.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let driver = encode_driver(booking.driver.as_ref())?;

            conn.execute(
                "INSERT INTO bookings (id, user_id, name, phone, departure, arrival, departure_coords,
                     arrival_coords, distance_m, duration_s, price, status, driver, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    booking.id.to_string(),
                    booking.user_id.to_string(),
                    booking.name,
                    booking.phone.as_str(),
                    booking.departure,
                    booking.arrival,
                    booking.departure_coords,
                    booking.arrival_coords,
                    booking.distance_m,
                    booking.duration_s,
                    booking.price.map(|p| i64::try_from(p.francs()).unwrap_or(i64::MAX)),
                    booking.status.as_str(),
                    driver,
                    format_timestamp(booking.created_at),
                    format_timestamp(booking.updated_at),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!("Saved booking");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, booking), fields(booking_id = %booking.id, status = %booking.status))]
    async fn update(&self, booking: &Booking) -> Result<bool, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let booking = booking.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let driver = encode_driver(booking.driver.as_ref())?;

            let updated = conn
                .execute(
                    "UPDATE bookings SET status = ?1, driver = ?2, updated_at = ?3 WHERE id = ?4",
                    params![
                        booking.status.as_str(),
                        driver,
                        format_timestamp(booking.updated_at),
                        booking.id.to_string(),
                    ],
                )
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(updated = updated > 0, "Updated booking");
            Ok(updated > 0)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let id_str = id.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
                [&id_str],
                row_to_booking,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Booking>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user_id_str = user_id.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings
                     WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?2"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let bookings = stmt
                .query_map(params![user_id_str, limit], row_to_booking)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = bookings.len(), "Listed bookings for user");
            Ok(bookings)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn delete(&self, id: &BookingId) -> Result<bool, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let id_str = id.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let deleted = conn
                .execute("DELETE FROM bookings WHERE id = ?1", [&id_str])
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(deleted = deleted > 0, "Deleted booking");
            Ok(deleted > 0)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Fixed-width timestamps keep `ORDER BY created_at` chronological
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn encode_driver(driver: Option<&Driver>) -> Result<Option<String>, ApplicationError> {
    driver
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApplicationError::Internal(format!("Failed to encode driver: {e}")))
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

/// Convert a database row to a `Booking`
fn row_to_booking(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let phone: String = row.get(3)?;
    let price: Option<i64> = row.get(10)?;
    let status: String = row.get(11)?;
    let driver: Option<String> = row.get(12)?;
    let created_at: String = row.get(13)?;
    let updated_at: String = row.get(14)?;
    let price = price.map(|p| Fare::from_francs(u64::try_from(p).unwrap_or_default()));

    Ok(Booking {
        id: BookingId::parse(&id).map_err(|e| conversion_error(0, e))?,
        user_id: UserId::parse(&user_id).map_err(|e| conversion_error(1, e))?,
        name: row.get(2)?,
        phone: PhoneNumber::new(phone).map_err(|e| conversion_error(3, e))?,
        departure: row.get(4)?,
        arrival: row.get(5)?,
        departure_coords: row.get(6)?,
        arrival_coords: row.get(7)?,
        distance_m: row.get(8)?,
        duration_s: row.get(9)?,
        price,
        status: status
            .parse::<BookingStatus>()
            .map_err(|e| conversion_error(11, e))?,
        driver: driver
            .map(|json| serde_json::from_str::<Driver>(&json))
            .transpose()
            .map_err(|e| conversion_error(12, e))?,
        created_at: parse_timestamp(13, &created_at)?,
        updated_at: parse_timestamp(14, &updated_at)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
