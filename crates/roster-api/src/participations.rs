//! Handlers for editing one participation.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `PATCH` | `/participations/:id` | Body: `{"department_id":…,"assigned_roles":[…]}` |
//! | `PATCH` | `/participations/:id/status` | Body: `{"status":"Withdrawn"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{
  assign::{set_participation_status, update_assignment},
  participation::{AssignmentPatch, Participation, StatusPatch},
  store::RosterStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `PATCH /participations/:id`: overwrites department and roles only.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignmentPatch>,
) -> Result<Json<Participation>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(update_assignment(store.as_ref(), id, body).await?))
}

/// `PATCH /participations/:id/status`: overwrites the status only.
pub async fn update_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusPatch>,
) -> Result<Json<Participation>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(set_participation_status(store.as_ref(), id, body.status).await?))
}
