//! HTTP request handlers

pub mod bookings;
pub mod health;
pub mod route;
