use crate::config::Config;
use crate::domain::ports::{BearerToken, TutoringBackend};
use crate::domain::services::tutoring_service::TutoringService;
use crate::error::AppError;
use crate::infra::http_tutoring_backend::HttpTutoringBackend;
use std::sync::Arc;
use tracing::info;

pub fn bootstrap_backend(config: &Config) -> Result<Arc<dyn TutoringBackend>, AppError> {
    let backend = HttpTutoringBackend::new(
        config.api_base_url.clone(),
        BearerToken::new(config.api_token.clone()),
        config.http_timeout,
    )?;
    info!("Tutoring backend client targeting {}", config.api_base_url);
    Ok(Arc::new(backend))
}

pub fn bootstrap_service(config: &Config) -> Result<TutoringService, AppError> {
    let backend = bootstrap_backend(config)?;
    Ok(TutoringService::new(backend, config.timezone)
        .with_language(config.language)
        .with_session_duration(config.session_duration_min))
}
