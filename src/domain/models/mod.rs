pub mod availability;
pub mod serde_time;
pub mod tutoring_request;
