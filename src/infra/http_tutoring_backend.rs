use crate::api::dtos::requests::{
    AcceptTutoringRequest, MarkAttendanceRequest, RejectTutoringRequest, SubmitTutoringRequest,
};
use crate::api::dtos::responses::ApiEnvelope;
use crate::domain::models::availability::AvailabilityWindow;
use crate::domain::models::tutoring_request::{EntityId, MeetingUrl, RejectionReason, TutoringRequest};
use crate::domain::ports::{BearerToken, TutoringBackend};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

pub struct HttpTutoringBackend {
    client: Client,
    base_url: String,
    token: BearerToken,
}

impl HttpTutoringBackend {
    pub fn new(base_url: impl Into<String>, token: BearerToken, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<T, AppError> {
        let res = request
            .bearer_auth(self.token.expose())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Tutoring backend connection error ({}): {}", context, e);
                AppError::Transport(e)
            })?;

        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            error!("Tutoring backend failed ({}). Status: {}, Body: {}", context, status, text);
            return Err(AppError::from_status(status.as_u16(), text));
        }

        debug!("Tutoring backend answered {} for {}", status, context);
        serde_json::from_str::<ApiEnvelope<T>>(&text)
            .map(ApiEnvelope::into_inner)
            .map_err(|e| {
                let msg = format!("{}: {}", context, e);
                error!("Undecodable tutoring backend payload: {}", msg);
                AppError::Decode(msg)
            })
    }
}

#[async_trait]
impl TutoringBackend for HttpTutoringBackend {
    async fn load_availability(&self, teacher_id: &EntityId) -> Result<Vec<AvailabilityWindow>, AppError> {
        let url = self.url(&format!("tutoring/teachers/{}/availability", teacher_id));
        self.send(self.client.get(url), "load availability").await
    }

    async fn submit_request(
        &self,
        teacher_id: &EntityId,
        requested_date: NaiveDate,
        requested_time: NaiveTime,
    ) -> Result<TutoringRequest, AppError> {
        let payload = SubmitTutoringRequest {
            teacher_id,
            requested_date,
            requested_time,
        };
        let request = self.client.post(self.url("tutoring/requests")).json(&payload);
        self.send(request, "submit request").await
    }

    async fn accept(&self, id: &EntityId, meeting_url: Option<&MeetingUrl>) -> Result<TutoringRequest, AppError> {
        let payload = AcceptTutoringRequest { meeting_url };
        let request = self
            .client
            .post(self.url(&format!("tutoring/requests/{}/accept", id)))
            .json(&payload);
        self.send(request, "accept request").await
    }

    async fn reject(&self, id: &EntityId, reason: &RejectionReason) -> Result<TutoringRequest, AppError> {
        let payload = RejectTutoringRequest { reason };
        let request = self
            .client
            .post(self.url(&format!("tutoring/requests/{}/reject", id)))
            .json(&payload);
        self.send(request, "reject request").await
    }

    async fn mark_attendance(&self, id: &EntityId, attended: bool) -> Result<TutoringRequest, AppError> {
        let payload = MarkAttendanceRequest { attended };
        let request = self
            .client
            .post(self.url(&format!("tutoring/requests/{}/attendance", id)))
            .json(&payload);
        self.send(request, "mark attendance").await
    }

    async fn fetch_request(&self, id: &EntityId) -> Result<TutoringRequest, AppError> {
        let url = self.url(&format!("tutoring/requests/{}", id));
        self.send(self.client.get(url), "fetch request").await
    }

    async fn list_requests(&self) -> Result<Vec<TutoringRequest>, AppError> {
        self.send(self.client.get(self.url("tutoring/requests")), "list requests").await
    }
}
