use crate::domain::models::serde_time::hhmm;
use crate::domain::models::tutoring_request::{EntityId, MeetingUrl, RejectionReason};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SubmitTutoringRequest<'a> {
    pub teacher_id: &'a EntityId,
    pub requested_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub requested_time: NaiveTime,
}

#[derive(Debug, Serialize)]
pub struct AcceptTutoringRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<&'a MeetingUrl>,
}

#[derive(Debug, Serialize)]
pub struct RejectTutoringRequest<'a> {
    pub reason: &'a RejectionReason,
}

#[derive(Debug, Serialize)]
pub struct MarkAttendanceRequest {
    pub attended: bool,
}
