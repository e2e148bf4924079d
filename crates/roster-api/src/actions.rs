//! Handlers for the action tracker.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/actions` | Optional `?status=<label>&owner=<substring>` |
//! | `POST` | `/actions` | Body: [`NewAction`]; `description` is required |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  action::{Action, ActionFilter, ActionStatus, NewAction},
  store::RosterStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Status label as displayed, e.g. `Yet to Start`.
  pub status: Option<String>,
  pub owner:  Option<String>,
}

impl ListParams {
  fn into_filter(self) -> Result<ActionFilter, ApiError> {
    let status = self
      .status
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .map(ActionStatus::parse)
      .transpose()?;
    Ok(ActionFilter {
      status,
      owner: self.owner,
    })
  }
}

/// `GET /actions[?status=<label>][&owner=<name>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Action>>, ApiError>
where
  S: RosterStore,
{
  let filter = params.into_filter()?;
  let actions = store.list_actions(None).await.map_err(ApiError::store)?;
  Ok(Json(filter.apply(actions)))
}

/// `POST /actions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAction>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  if let Some(event_id) = body.event_id
    && store.get_event(event_id).await.map_err(ApiError::store)?.is_none()
  {
    return Err(ApiError::NotFound(format!("event {event_id} not found")));
  }
  let action = store.add_action(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(action)))
}
