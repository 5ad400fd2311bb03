pub mod factory;
pub mod http_tutoring_backend;
