use std::fmt::Display;

use actix_web::{http::header::USER_AGENT, HttpRequest};

use crate::utils::get_client_ip::get_client_ip;

/// Client metadata attached to every handler log line.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub client_ip: String,
    pub user_agent: String,
}

impl RequestMeta {
    pub fn from_request(req: &HttpRequest, trust_x_forwarded_for: bool) -> Self {
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        RequestMeta {
            client_ip: get_client_ip(req, trust_x_forwarded_for),
            user_agent,
        }
    }
}

pub fn log_handler_success(meta: &RequestMeta, operation: &str, message: &str) {
    tracing::info!(
        operation,
        client_ip = %meta.client_ip,
        user_agent = %meta.user_agent,
        "{}",
        message
    );
}

pub fn log_handler_error(
    meta: &RequestMeta,
    operation: &str,
    message: &str,
    error: Option<&dyn Display>,
) {
    match error {
        Some(err) => tracing::error!(
            operation,
            client_ip = %meta.client_ip,
            user_agent = %meta.user_agent,
            error = %err,
            "{}",
            message
        ),
        None => tracing::error!(
            operation,
            client_ip = %meta.client_ip,
            user_agent = %meta.user_agent,
            "{}",
            message
        ),
    }
}
