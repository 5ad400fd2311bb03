use crate::domain::models::tutoring_request::{TutoringRequest, TutoringStatus};
use chrono::Duration;
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for an accepted or completed session.
/// Returns `None` for requests that never became a session.
pub fn generate_ics(request: &TutoringRequest, tz: Tz, duration_min: i64, summary: &str) -> Option<String> {
    if !matches!(request.status, TutoringStatus::Accepted | TutoringStatus::Completed) {
        return None;
    }

    let start = request.session_start(tz);
    let end = start + Duration::minutes(duration_min);

    let mut ical_event = IcalEvent::new();
    ical_event
        .summary(summary)
        .starts(start)
        .ends(end)
        .uid(&format!("tutoring-{}", request.id));

    if let Some(url) = &request.meeting_url {
        ical_event.location(url.as_str());
        ical_event.description(&format!("Join: {}", url));
        ical_event.add_property("URL", url.as_str());
    }

    let mut calendar = Calendar::new();
    calendar.push(ical_event.done());
    Some(calendar.to_string())
}
