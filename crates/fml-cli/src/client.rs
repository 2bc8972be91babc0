//! Async HTTP client wrapping the FollowMyLead JSON API.

use std::{sync::Mutex, time::Duration};

use fml_core::{
  insights::InsightsReport,
  lead::{Lead, LeadDetail, LeadNote},
  status::LeadStatus,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Connection settings for the FollowMyLead API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// A client-side failure, classified so the caller can pick a recovery.
///
/// `Auth` is the only kind with a global reaction (drop the session, go back
/// to login); everything else stays local to the screen that triggered it.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("session expired, log in again")]
  Auth,

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Validation(String),

  #[error("server error: {0}")]
  Api(String),

  #[error("network error: {0}")]
  Transport(#[from] reqwest::Error),
}

/// Shape of the API's `{"error": "…"}` failure envelope.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the FollowMyLead JSON REST API.
///
/// Holds the bearer token once logged in; a 401 from any call clears it so
/// the app can route back to the login screen.
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
  token:  Mutex<Option<String>>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config, token: Mutex::new(None) })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match self.token.lock().unwrap().as_deref() {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  pub fn clear_token(&self) {
    self.token.lock().unwrap().take();
  }

  /// Map a non-success response onto a [`ClientError`], pulling the message
  /// out of the error envelope where there is one. A 401 also clears the
  /// stored token.
  async fn check(
    &self,
    resp: reqwest::Response,
  ) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());

    Err(match status {
      StatusCode::UNAUTHORIZED => {
        self.clear_token();
        ClientError::Auth
      }
      StatusCode::NOT_FOUND => ClientError::NotFound(message),
      StatusCode::BAD_REQUEST => ClientError::Validation(message),
      _ => ClientError::Api(message),
    })
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /api/auth/login`; stores the bearer token on success.
  pub async fn login(
    &self,
    username: &str,
    password: &str,
  ) -> Result<(), ClientError> {
    #[derive(Deserialize)]
    struct LoginResponse {
      token: String,
    }

    let resp = self
      .client
      .post(self.url("/auth/login"))
      .json(&json!({ "username": username, "password": password }))
      .send()
      .await?;

    let body: LoginResponse = self.check(resp).await?.json().await?;
    *self.token.lock().unwrap() = Some(body.token);
    Ok(())
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  /// `GET /api/leads`
  pub async fn list_leads(&self) -> Result<Vec<Lead>, ClientError> {
    let resp = self.auth(self.client.get(self.url("/leads"))).send().await?;
    Ok(self.check(resp).await?.json().await?)
  }

  /// `GET /api/leads/{id}`
  pub async fn get_detail(&self, id: Uuid) -> Result<LeadDetail, ClientError> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/leads/{id}"))))
      .send()
      .await?;
    Ok(self.check(resp).await?.json().await?)
  }

  /// `PATCH /api/leads/{id}/status`
  pub async fn set_status(
    &self,
    id: Uuid,
    status: LeadStatus,
  ) -> Result<Lead, ClientError> {
    let resp = self
      .auth(self.client.patch(self.url(&format!("/leads/{id}/status"))))
      .json(&json!({ "status": status.as_ref() }))
      .send()
      .await?;
    Ok(self.check(resp).await?.json().await?)
  }

  /// `POST /api/leads/{id}/notes`
  pub async fn add_note(
    &self,
    id: Uuid,
    content: &str,
  ) -> Result<LeadNote, ClientError> {
    let resp = self
      .auth(self.client.post(self.url(&format!("/leads/{id}/notes"))))
      .json(&json!({ "content": content }))
      .send()
      .await?;
    Ok(self.check(resp).await?.json().await?)
  }

  /// `POST /api/leads/upload-csv`; returns the imported row count.
  pub async fn upload_csv(
    &self,
    file_name: &str,
    bytes: Vec<u8>,
  ) -> Result<usize, ClientError> {
    #[derive(Deserialize)]
    struct UploadResponse {
      imported: usize,
    }

    let part = reqwest::multipart::Part::bytes(bytes)
      .file_name(file_name.to_owned())
      .mime_str("text/csv")?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = self
      .auth(self.client.post(self.url("/leads/upload-csv")))
      .multipart(form)
      .send()
      .await?;
    let body: UploadResponse = self.check(resp).await?.json().await?;
    Ok(body.imported)
  }

  // ── Insights ──────────────────────────────────────────────────────────────

  /// `GET /api/insights`
  pub async fn insights(&self) -> Result<InsightsReport, ClientError> {
    let resp = self
      .auth(self.client.get(self.url("/insights")))
      .send()
      .await?;
    Ok(self.check(resp).await?.json().await?)
  }
}
