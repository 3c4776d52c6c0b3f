pub mod attempt;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod session;

use crate::services::{analysis::GeminiAnalysisService, email::EmailService};
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub analysis_service: GeminiAnalysisService,
    pub email_service: EmailService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.ai_request_timeout_secs))
            .build()
            .unwrap();

        let analysis_service = GeminiAnalysisService::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            http_client,
        );
        let email_service =
            EmailService::new(Duration::from_millis(config.email_simulation_delay_ms));

        Self {
            analysis_service,
            email_service,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
