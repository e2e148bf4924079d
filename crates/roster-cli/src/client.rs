//! Async HTTP client wrapping the roster JSON API.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use roster_core::{
  assign::BatchAssignment,
  event::Event,
  participation::{AssignmentPatch, Participation, ParticipationStatus, StatusPatch},
  role::{Department, Role, RoleListing},
  roster::Partition,
  volunteer::Volunteer,
};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the roster JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Body of every non-2xx API response.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req`, turning a non-2xx status into an error carrying the server's
  /// message.
  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp: Response = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<ErrorBody>()
        .await
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_owned());
      return Err(anyhow!("{what} → {status}: {message}"));
    }
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))
  }

  // ── Reference data ────────────────────────────────────────────────────────

  /// `GET /api/events`
  pub async fn list_events(&self) -> Result<Vec<Event>> {
    self.send(self.client.get(self.url("/events")), "GET /events").await
  }

  /// `GET /api/volunteers`
  pub async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
    self
      .send(self.client.get(self.url("/volunteers")), "GET /volunteers")
      .await
  }

  /// `GET /api/departments`
  pub async fn list_departments(&self) -> Result<Vec<Department>> {
    self
      .send(self.client.get(self.url("/departments")), "GET /departments")
      .await
  }

  /// `GET /api/roles`, dropping the resolved department names.
  pub async fn list_roles(&self) -> Result<Vec<Role>> {
    let listings: Vec<RoleListing> = self
      .send(self.client.get(self.url("/roles")), "GET /roles")
      .await?;
    Ok(listings.into_iter().map(|l| l.role).collect())
  }

  // ── Assignment ────────────────────────────────────────────────────────────

  /// `GET /api/events/<id>/participations`
  pub async fn list_participations(&self, event_id: Uuid) -> Result<Vec<Participation>> {
    let path = format!("/events/{event_id}/participations");
    self
      .send(self.client.get(self.url(&path)), "GET /events/:id/participations")
      .await
  }

  /// `POST /api/events/<id>/assignments`
  pub async fn assign(&self, event_id: Uuid, batch: &BatchAssignment) -> Result<Partition> {
    let path = format!("/events/{event_id}/assignments");
    self
      .send(
        self.client.post(self.url(&path)).json(batch),
        "POST /events/:id/assignments",
      )
      .await
  }

  /// `PATCH /api/participations/<id>`
  pub async fn update_participation(
    &self,
    participation_id: Uuid,
    patch: &AssignmentPatch,
  ) -> Result<Participation> {
    let path = format!("/participations/{participation_id}");
    self
      .send(
        self.client.patch(self.url(&path)).json(patch),
        "PATCH /participations/:id",
      )
      .await
  }

  /// `PATCH /api/participations/<id>/status`
  pub async fn set_status(
    &self,
    participation_id: Uuid,
    status: ParticipationStatus,
  ) -> Result<Participation> {
    let path = format!("/participations/{participation_id}/status");
    self
      .send(
        self.client.patch(self.url(&path)).json(&StatusPatch { status }),
        "PATCH /participations/:id/status",
      )
      .await
  }
}
