//! Status transitions of a tutoring request.
//!
//! ```text
//! pending --accept--> accepted --mark_attendance--> completed
//!    \
//!     --reject--> rejected
//! ```
//!
//! Every transition checks the current status first and leaves the request
//! untouched when the check fails.

use crate::domain::models::tutoring_request::{
    MeetingUrl, RejectionReason, TutoringRequest, TutoringStatus,
};
use crate::error::{AppError, GuardViolation};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    Accept,
    Reject,
    MarkAttendance,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifecycleAction::Accept => "accept",
            LifecycleAction::Reject => "reject",
            LifecycleAction::MarkAttendance => "mark_attendance",
        })
    }
}

pub fn next_status(from: TutoringStatus, action: LifecycleAction) -> Result<TutoringStatus, GuardViolation> {
    use LifecycleAction::*;
    use TutoringStatus::*;

    match (from, action) {
        (Pending, Accept) => Ok(Accepted),
        (Pending, Reject) => Ok(Rejected),
        (Accepted, MarkAttendance) => Ok(Completed),
        (Pending, MarkAttendance)
        | (Accepted, Accept)
        | (Accepted, Reject)
        | (Rejected, _)
        | (Completed, _) => Err(GuardViolation::InvalidTransition { action, from }),
    }
}

fn guard(request: &TutoringRequest, action: LifecycleAction) -> Result<TutoringStatus, GuardViolation> {
    next_status(request.status, action).inspect_err(|violation| {
        warn!(request_id = %request.id, %violation, "Refusing tutoring request transition");
    })
}

pub fn accept(request: &mut TutoringRequest, meeting_url: Option<&str>) -> Result<(), GuardViolation> {
    let next = guard(request, LifecycleAction::Accept)?;
    request.status = next;
    request.meeting_url = meeting_url.and_then(MeetingUrl::normalize);
    Ok(())
}

/// Validates the reason before looking at the status, so a short reason is
/// reported as a validation failure even on a request that could not be
/// rejected anyway.
pub fn reject(request: &mut TutoringRequest, reason: &str) -> Result<(), AppError> {
    let reason = RejectionReason::parse(reason)?;
    reject_with(request, reason)?;
    Ok(())
}

pub fn reject_with(request: &mut TutoringRequest, reason: RejectionReason) -> Result<(), GuardViolation> {
    let next = guard(request, LifecycleAction::Reject)?;
    request.status = next;
    request.rejection_reason = Some(reason);
    Ok(())
}

pub fn mark_attendance(request: &mut TutoringRequest, attended: bool) -> Result<(), GuardViolation> {
    let next = guard(request, LifecycleAction::MarkAttendance)?;
    request.status = next;
    request.attended = Some(attended);
    Ok(())
}
