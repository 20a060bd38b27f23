//! Movitur domain core.
//!
//! Pure, I/O-free building blocks shared by the database and API crates:
//! time normalisation, reservation code generation, and the domain error
//! type.

pub mod error;
pub mod reservation_code;
pub mod time;
pub mod types;
