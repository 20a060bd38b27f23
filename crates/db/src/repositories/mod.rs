//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async functions that
//! accept `&PgPool` as the first argument.

pub mod reservation_repo;
pub mod service_repo;

pub use reservation_repo::ReservationRepo;
pub use service_repo::ServiceRepo;
