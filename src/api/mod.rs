//! Wire shapes of the remote tutoring REST API.
pub mod dtos;
