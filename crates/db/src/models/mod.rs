//! Database row types and insert DTOs.

pub mod reservation;
pub mod service;
