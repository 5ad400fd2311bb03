pub mod availability;
pub mod calendar;
pub mod lifecycle;
pub mod tutoring_service;
pub mod validator;
