use crate::domain::models::availability::AvailabilityWindow;
use crate::domain::models::tutoring_request::{EntityId, MeetingUrl, RejectionReason, TutoringRequest};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// Bearer credential handed to backend clients by their caller.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// The remote tutoring service. It is the authority on every request; local
/// checks only mirror its rules.
#[async_trait]
pub trait TutoringBackend: Send + Sync {
    async fn load_availability(&self, teacher_id: &EntityId) -> Result<Vec<AvailabilityWindow>, AppError>;
    async fn submit_request(
        &self,
        teacher_id: &EntityId,
        requested_date: NaiveDate,
        requested_time: NaiveTime,
    ) -> Result<TutoringRequest, AppError>;
    async fn accept(&self, id: &EntityId, meeting_url: Option<&MeetingUrl>) -> Result<TutoringRequest, AppError>;
    async fn reject(&self, id: &EntityId, reason: &RejectionReason) -> Result<TutoringRequest, AppError>;
    async fn mark_attendance(&self, id: &EntityId, attended: bool) -> Result<TutoringRequest, AppError>;
    async fn fetch_request(&self, id: &EntityId) -> Result<TutoringRequest, AppError>;
    async fn list_requests(&self) -> Result<Vec<TutoringRequest>, AppError>;
}
