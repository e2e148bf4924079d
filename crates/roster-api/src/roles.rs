//! Handlers for departments and roles.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/departments` | |
//! | `POST`   | `/departments` | Body: `{"name":…}` |
//! | `GET`    | `/departments/:id/roles` | Role options for one department |
//! | `GET`    | `/roles` | Each role with its department name |
//! | `POST`   | `/roles` | Body: [`NewRole`]; `preferred_skills` is comma-separated |
//! | `DELETE` | `/roles/:id` | 204, or 404 if absent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  role::{Department, NewDepartment, NewRole, RoleListing, list_with_departments},
  roster::{RoleOptions, role_options},
  store::RosterStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Departments ──────────────────────────────────────────────────────────────

/// `GET /departments`
pub async fn list_departments<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Department>>, ApiError>
where
  S: RosterStore,
{
  Ok(Json(store.list_departments().await.map_err(ApiError::store)?))
}

/// `POST /departments`
pub async fn create_department<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDepartment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  let department = store.add_department(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(department)))
}

/// `GET /departments/:id/roles`
pub async fn department_roles<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RoleOptions>, ApiError>
where
  S: RosterStore,
{
  let departments = store.list_departments().await.map_err(ApiError::store)?;
  if !departments.iter().any(|d| d.department_id == id) {
    return Err(roster_core::Error::DepartmentNotFound(id).into());
  }
  let roles = store.list_roles().await.map_err(ApiError::store)?;
  Ok(Json(role_options(&roles, id)))
}

// ─── Roles ────────────────────────────────────────────────────────────────────

/// `GET /roles`
pub async fn list_roles<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RoleListing>>, ApiError>
where
  S: RosterStore,
{
  let roles = store.list_roles().await.map_err(ApiError::store)?;
  let departments = store.list_departments().await.map_err(ApiError::store)?;
  Ok(Json(list_with_departments(&roles, &departments)))
}

/// `POST /roles`
pub async fn create_role<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewRole>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  body.validate()?;
  let role = store.add_role(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(role)))
}

/// `DELETE /roles/:id`
pub async fn delete_role<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RosterStore,
{
  if store.delete_role(id).await.map_err(ApiError::store)? {
    tracing::info!(role = %id, "role deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("role {id} not found")))
  }
}
