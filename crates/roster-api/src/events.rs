//! Handlers for `/events` endpoints, including the assignment screen's
//! partition and batch assignment.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/events` | Dated events first, latest first |
//! | `POST` | `/events` | Body: [`NewEvent`]; `name` is required |
//! | `GET`  | `/events/:id` | 404 if not found |
//! | `GET`  | `/events/:id/participations` | Raw records, oldest first |
//! | `GET`  | `/events/:id/partition` | Unassigned / assigned / orphaned |
//! | `POST` | `/events/:id/assignments` | Body: [`BatchAssignment`]; returns the reloaded partition |
//! | `GET`  | `/events/:id/actions` | Newest-assigned first |
//! | `GET`  | `/events/:id/links` | Newest first |
//! | `POST` | `/events/:id/links` | Body: `{"name":…,"url":…}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  action::Action,
  assign::{BatchAssignment, confirm_batch_assignment, load_partition},
  event::{Event, ManualLink, NewEvent, NewManualLink},
  participation::Participation,
  roster::Partition,
  store::RosterStore,
};
use uuid::Uuid;

use crate::error::ApiError;

async fn require_event<S: RosterStore>(store: &S, id: Uuid) -> Result<Event, ApiError> {
  store
    .get_event(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))
}

// ─── Events ───────────────────────────────────────────────────────────────────

/// `GET /events`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Event>>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(store.list_events().await.map_err(ApiError::store)?))
}

/// `POST /events`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  let event = store.add_event(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(require_event(store.as_ref(), id).await?))
}

// ─── Assignment ───────────────────────────────────────────────────────────────

/// `GET /events/:id/participations`
pub async fn participations<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Participation>>, ApiError>
where
  S: RosterStore,
{
  require_event(store.as_ref(), id).await?;
  let records = store.list_participations(id).await.map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /events/:id/partition`
pub async fn partition<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Partition>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(load_partition(store.as_ref(), id).await?))
}

/// `POST /events/:id/assignments`
pub async fn assign<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<BatchAssignment>,
) -> Result<Json<Partition>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(confirm_batch_assignment(store.as_ref(), id, body).await?))
}

// ─── Actions and links ────────────────────────────────────────────────────────

/// `GET /events/:id/actions`
pub async fn actions<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Action>>, ApiError>
where
  S: RosterStore,
{
  require_event(store.as_ref(), id).await?;
  Ok(Json(store.list_actions(Some(id)).await.map_err(ApiError::store)?))
}

/// `GET /events/:id/links`
pub async fn links<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ManualLink>>, ApiError>
where
  S: RosterStore,
{
  require_event(store.as_ref(), id).await?;
  Ok(Json(store.list_links(id).await.map_err(ApiError::store)?))
}

/// `POST /events/:id/links`
pub async fn add_link<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewManualLink>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  require_event(store.as_ref(), id).await?;
  let link = store.add_link(id, body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(link)))
}
