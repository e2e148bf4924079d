//! Handlers for `/volunteers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/volunteers` | Optional `?ids=<uuid>,<uuid>` membership filter |
//! | `POST` | `/volunteers` | Body: [`NewVolunteer`] |
//! | `GET`  | `/volunteers/:id` | 404 if not found |
//! | `PUT`  | `/volunteers/:id` | Create or overwrite a profile |
//! | `GET`  | `/volunteers/:id/events` | Events the volunteer takes part in |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  assign::volunteer_events,
  event::Event,
  store::RosterStore,
  volunteer::{NewVolunteer, Volunteer, split_list},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Comma-separated volunteer ids.
  pub ids: Option<String>,
}

fn parse_ids(raw: &str) -> Result<Vec<Uuid>, ApiError> {
  split_list(raw)
    .into_iter()
    .map(|s| {
      Uuid::parse_str(s).map_err(|e| ApiError::BadRequest(format!("invalid id {s:?}: {e}")))
    })
    .collect()
}

/// `GET /volunteers[?ids=<ids>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Volunteer>>, ApiError>
where
  S: RosterStore,
{
  let volunteers = match params.ids.as_deref() {
    Some(raw) => {
      let ids = parse_ids(raw)?;
      store.get_volunteers(&ids).await.map_err(ApiError::store)?
    }
    None => store.list_volunteers().await.map_err(ApiError::store)?,
  };
  Ok(Json(volunteers))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /volunteers`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewVolunteer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  let volunteer = store.add_volunteer(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(volunteer)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /volunteers/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Volunteer>, ApiError>
where
  S: RosterStore,
{
  let volunteer = store
    .get_volunteer(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("volunteer {id} not found")))?;
  Ok(Json(volunteer))
}

// ─── Profile save ─────────────────────────────────────────────────────────────

/// `PUT /volunteers/:id`
pub async fn put_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewVolunteer>,
) -> Result<Json<Volunteer>, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  let volunteer = store.put_volunteer(id, body).await.map_err(ApiError::store)?;
  Ok(Json(volunteer))
}

// ─── Events ───────────────────────────────────────────────────────────────────

/// `GET /volunteers/:id/events`
pub async fn events<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Event>>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(volunteer_events(store.as_ref(), id).await?))
}
