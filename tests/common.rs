use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tutoring_core::{
    domain::models::availability::AvailabilityWindow,
    domain::models::serde_time::hhmm,
    domain::models::tutoring_request::{EntityId, TutoringRequest, TutoringStatus},
    domain::ports::BearerToken,
    domain::services::availability::AvailabilityIndex,
    domain::services::lifecycle,
    domain::services::tutoring_service::TutoringService,
    domain::services::validator::validate,
    infra::http_tutoring_backend::HttpTutoringBackend,
};
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-token";

#[derive(Default)]
pub struct FakeState {
    pub availability: HashMap<String, Vec<AvailabilityWindow>>,
    pub requests: HashMap<String, TutoringRequest>,
    /// Payloads served verbatim by `GET /tutoring/requests/{id}`.
    pub raw_requests: HashMap<String, Value>,
}

type Shared = Arc<Mutex<FakeState>>;

/// In-process stand-in for the tutoring REST backend. It enforces the same
/// slot and lifecycle rules as the client so tests can observe both sides.
#[allow(dead_code)]
pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

#[allow(dead_code)]
impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::default()));

        let router = Router::new()
            .route("/api/tutoring/teachers/{teacher_id}/availability", get(load_availability))
            .route("/api/tutoring/requests", get(list_requests).post(submit_request))
            .route("/api/tutoring/requests/{id}", get(fetch_request))
            .route("/api/tutoring/requests/{id}/accept", post(accept_request))
            .route("/api/tutoring/requests/{id}/reject", post(reject_request))
            .route("/api/tutoring/requests/{id}/attendance", post(mark_attendance))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn client_with_token(&self, token: &str) -> HttpTutoringBackend {
        HttpTutoringBackend::new(
            self.base_url.clone(),
            BearerToken::new(token),
            std::time::Duration::from_secs(5),
        )
        .unwrap()
    }

    pub fn client(&self) -> HttpTutoringBackend {
        self.client_with_token(TEST_TOKEN)
    }

    pub fn service(&self) -> TutoringService {
        TutoringService::new(Arc::new(self.client()), chrono_tz::UTC)
    }

    pub fn set_availability(&self, teacher_id: &str, windows: Vec<AvailabilityWindow>) {
        self.state.lock().unwrap().availability.insert(teacher_id.to_string(), windows);
    }

    pub fn insert_request(&self, request: TutoringRequest) {
        self.state
            .lock()
            .unwrap()
            .requests
            .insert(request.id.to_string(), request);
    }

    pub fn serve_raw(&self, id: &str, payload: Value) {
        self.state.lock().unwrap().raw_requests.insert(id.to_string(), payload);
    }

    pub fn stored(&self, id: &EntityId) -> TutoringRequest {
        self.state.lock().unwrap().requests[id.as_str()].clone()
    }

    pub fn update_stored(&self, id: &EntityId, f: impl FnOnce(&mut TutoringRequest)) {
        let mut state = self.state.lock().unwrap();
        f(state.requests.get_mut(id.as_str()).unwrap());
    }
}

#[allow(dead_code)]
pub fn request_in(status: TutoringStatus, date: NaiveDate) -> TutoringRequest {
    TutoringRequest {
        id: EntityId::from(Uuid::new_v4().to_string()),
        student_id: EntityId::from("student-1"),
        teacher_id: EntityId::from("teacher-1"),
        requested_date: date,
        requested_time: chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        status,
        meeting_url: None,
        rejection_reason: None,
        attended: None,
    }
}

#[allow(dead_code)]
pub fn next_weekday(day: Weekday) -> NaiveDate {
    let mut next = Utc::now().date_naive() + Duration::days(1);
    while next.weekday() != day {
        next += Duration::days(1);
    }
    next
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", TEST_TOKEN);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str())
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Unauthenticated.")
}

async fn load_availability(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(teacher_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap();
    let windows = state.availability.get(&teacher_id).cloned().unwrap_or_default();
    Json(json!({ "data": windows })).into_response()
}

async fn submit_request(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let teacher_id = body["teacher_id"].as_str().unwrap_or_default().to_string();
    let date = body["requested_date"]
        .as_str()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    let time = body["requested_time"].as_str().and_then(hhmm::parse);
    let (Some(date), Some(time)) = (date, time) else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid date or time");
    };

    let mut state = state.lock().unwrap();
    let index = AvailabilityIndex::new(state.availability.get(&teacher_id).cloned().unwrap_or_default());
    if let Err(rejection) = validate(date, time, &index).into_result() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, rejection.to_string());
    }

    let request = TutoringRequest {
        id: EntityId::from(Uuid::new_v4().to_string()),
        student_id: EntityId::from("student-1"),
        teacher_id: EntityId::from(teacher_id),
        requested_date: date,
        requested_time: time,
        status: TutoringStatus::Pending,
        meeting_url: None,
        rejection_reason: None,
        attended: None,
    };
    state.requests.insert(request.id.to_string(), request.clone());
    (StatusCode::CREATED, Json(json!({ "data": request }))).into_response()
}

async fn list_requests(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap();
    let all: Vec<TutoringRequest> = state.requests.values().cloned().collect();
    Json(all).into_response()
}

async fn fetch_request(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap();
    if let Some(payload) = state.raw_requests.get(&id) {
        return Json(json!({ "data": payload })).into_response();
    }
    match state.requests.get(&id) {
        Some(request) => Json(request.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Tutoring request not found"),
    }
}

/// Applies `transition` to the stored request; 409 when the status forbids it.
fn mutate(
    state: &Shared,
    headers: &HeaderMap,
    id: &str,
    transition: impl FnOnce(&mut TutoringRequest) -> Result<(), String>,
) -> Response {
    if !authorized(headers) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap();
    let Some(stored) = state.requests.get_mut(id) else {
        return error(StatusCode::NOT_FOUND, "Tutoring request not found");
    };
    match transition(stored) {
        Ok(()) => Json(json!({ "data": stored.clone() })).into_response(),
        Err(message) => error(StatusCode::CONFLICT, message),
    }
}

async fn accept_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let meeting_url = body["meeting_url"].as_str().map(str::to_string);
    mutate(&state, &headers, &id, |request| {
        lifecycle::accept(request, meeting_url.as_deref()).map_err(|e| e.to_string())
    })
}

async fn reject_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let reason = body["reason"].as_str().unwrap_or_default().to_string();
    mutate(&state, &headers, &id, |request| {
        lifecycle::reject(request, &reason).map_err(|e| e.to_string())
    })
}

async fn mark_attendance(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(attended) = body["attended"].as_bool() else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "attended must be a boolean");
    };
    mutate(&state, &headers, &id, |request| {
        lifecycle::mark_attendance(request, attended).map_err(|e| e.to_string())
    })
}
