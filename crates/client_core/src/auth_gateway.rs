//! Remote sign-in boundary.
//!
//! Every failure, including an unreachable server, comes back as a
//! [`RemoteError`] value so callers can classify it; nothing here panics or
//! returns an opaque error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    error::{ErrorCode, RemoteError},
    protocol::{SignInRequest, SignInResponse, UserProfile},
};
use tracing::{debug, warn};
use url::Url;

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, RemoteError>;
}

pub struct HttpAuthGateway {
    http: Client,
    server_url: String,
}

impl HttpAuthGateway {
    pub fn new(server_url: &str) -> Result<Self> {
        Url::parse(server_url).with_context(|| format!("invalid server url '{server_url}'"))?;
        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, RemoteError> {
        let response = self
            .http
            .post(format!("{}/sign_in", self.server_url))
            .json(&SignInRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "sign-in request did not reach the server");
                RemoteError::transport(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let body: SignInResponse = response.json().await.map_err(|err| {
                RemoteError::unknown(format!("undecodable sign-in response: {err}"))
            })?;
            debug!(user_id = %body.user_id, "sign-in accepted");
            return Ok(body.into());
        }

        let text = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<RemoteError>(&text).unwrap_or_else(|_| {
            RemoteError::new(status_error_code(status), fallback_message(status, &text))
        });
        debug!(status = status.as_u16(), code = ?error.code, "sign-in rejected");
        Err(error)
    }
}

fn status_error_code(status: StatusCode) -> ErrorCode {
    if status == StatusCode::UNAUTHORIZED {
        ErrorCode::UserUnauthorized
    } else if status.is_server_error() {
        ErrorCode::ServerUnavailable
    } else {
        ErrorCode::Unknown
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("sign-in failed with HTTP {status}")
    } else {
        format!("sign-in failed with HTTP {status}: {body}")
    }
}

#[cfg(test)]
#[path = "tests/auth_gateway_tests.rs"]
mod tests;
