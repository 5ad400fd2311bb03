use crate::domain::models::availability::Language;
use crate::domain::models::tutoring_request::{EntityId, RejectionReason, TutoringRequest, TutoringStatus};
use crate::domain::ports::TutoringBackend;
use crate::domain::services::availability::AvailabilityIndex;
use crate::domain::services::calendar::generate_ics;
use crate::domain::services::lifecycle::{self, LifecycleAction};
use crate::domain::services::validator::validate_submission;
use crate::error::{AppError, ValidationError};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

/// Drives tutoring requests against the backend.
///
/// Transitions are applied to the caller's copy first and then confirmed
/// remotely. If the backend refuses, the copy is restored from a snapshot
/// taken before the local change.
pub struct TutoringService {
    backend: Arc<dyn TutoringBackend>,
    timezone: Tz,
    language: Language,
    session_duration_min: i64,
}

impl TutoringService {
    pub fn new(backend: Arc<dyn TutoringBackend>, timezone: Tz) -> Self {
        Self {
            backend,
            timezone,
            language: Language::default(),
            session_duration_min: 60,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_session_duration(mut self, minutes: i64) -> Self {
        self.session_duration_min = minutes;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub async fn load_availability(&self, teacher_id: &EntityId) -> Result<AvailabilityIndex, AppError> {
        let windows = self.backend.load_availability(teacher_id).await?;
        info!("Loaded {} availability windows for teacher {}", windows.len(), teacher_id);
        Ok(AvailabilityIndex::new(windows))
    }

    /// Client-side pre-check, cheap enough to run on every selection change.
    pub fn check_slot(
        &self,
        availability: &AvailabilityIndex,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<(), ValidationError> {
        validate_submission(date, time, self.today(), availability)
    }

    pub async fn submit(
        &self,
        teacher_id: &EntityId,
        availability: &AvailabilityIndex,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<TutoringRequest, AppError> {
        self.check_slot(availability, date, time)?;

        let created = self.backend.submit_request(teacher_id, date, time).await?;
        if created.status != TutoringStatus::Pending {
            warn!(
                "Backend created tutoring request {} in status '{}' instead of 'pending'",
                created.id, created.status
            );
        }
        info!("Tutoring request {} submitted to teacher {}", created.id, teacher_id);
        Ok(created)
    }

    pub async fn accept(&self, request: &mut TutoringRequest, meeting_url: Option<&str>) -> Result<(), AppError> {
        let snapshot = request.clone();
        lifecycle::accept(request, meeting_url)?;

        let outcome = self.backend.accept(&request.id, request.meeting_url.as_ref()).await;
        reconcile(request, snapshot, outcome, LifecycleAction::Accept)
    }

    pub async fn reject(&self, request: &mut TutoringRequest, reason: &str) -> Result<(), AppError> {
        let reason = RejectionReason::parse(reason)?;
        let snapshot = request.clone();
        lifecycle::reject_with(request, reason.clone())?;

        let outcome = self.backend.reject(&request.id, &reason).await;
        reconcile(request, snapshot, outcome, LifecycleAction::Reject)
    }

    /// Attendance is only meaningful once the session has started.
    pub async fn mark_attendance(&self, request: &mut TutoringRequest, attended: bool) -> Result<(), AppError> {
        let snapshot = request.clone();
        lifecycle::mark_attendance(request, attended)?;

        let starts_at = snapshot.session_start(self.timezone);
        if starts_at > Utc::now() {
            *request = snapshot;
            return Err(ValidationError::SessionNotHeldYet { starts_at }.into());
        }

        let outcome = self.backend.mark_attendance(&request.id, attended).await;
        reconcile(request, snapshot, outcome, LifecycleAction::MarkAttendance)
    }

    /// Message for a rejected slot or input, in the configured language.
    pub fn feedback(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::Slot(rejection) => rejection.message(self.language),
            other => other.to_string(),
        }
    }

    /// Calendar entry for an accepted or completed session.
    pub fn calendar_entry(&self, request: &TutoringRequest, summary: &str) -> Option<String> {
        generate_ics(request, self.timezone, self.session_duration_min, summary)
    }

    /// Replaces the local copy with the backend's current version.
    pub async fn refresh(&self, request: &mut TutoringRequest) -> Result<(), AppError> {
        *request = self.backend.fetch_request(&request.id).await?;
        Ok(())
    }

    /// Requests visible to the caller in `status`, soonest session first.
    pub async fn requests_with_status(&self, status: TutoringStatus) -> Result<Vec<TutoringRequest>, AppError> {
        let mut requests: Vec<TutoringRequest> = self
            .backend
            .list_requests()
            .await?
            .into_iter()
            .filter(|r| r.status == status)
            .collect();
        requests.sort_by_key(|r| (r.requested_date, r.requested_time));
        Ok(requests)
    }
}

fn reconcile(
    request: &mut TutoringRequest,
    snapshot: TutoringRequest,
    outcome: Result<TutoringRequest, AppError>,
    action: LifecycleAction,
) -> Result<(), AppError> {
    match outcome {
        Ok(confirmed) => {
            info!("Tutoring request {}: '{}' confirmed, now '{}'", confirmed.id, action, confirmed.status);
            *request = confirmed;
            Ok(())
        }
        Err(e) => {
            warn!(
                "Tutoring request {}: '{}' refused by backend, restoring '{}': {}",
                snapshot.id, action, snapshot.status, e
            );
            *request = snapshot;
            Err(e)
        }
    }
}
