//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::RosterStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone()))
//! ```

pub mod actions;
pub mod error;
pub mod events;
pub mod participations;
pub mod roles;
pub mod volunteers;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use roster_core::store::RosterStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Volunteers
    .route("/volunteers", get(volunteers::list::<S>).post(volunteers::create::<S>))
    .route("/volunteers/{id}", get(volunteers::get_one::<S>).put(volunteers::put_one::<S>))
    .route("/volunteers/{id}/events", get(volunteers::events::<S>))
    // Events
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route("/events/{id}", get(events::get_one::<S>))
    .route("/events/{id}/participations", get(events::participations::<S>))
    .route("/events/{id}/partition", get(events::partition::<S>))
    .route("/events/{id}/assignments", post(events::assign::<S>))
    .route("/events/{id}/actions", get(events::actions::<S>))
    .route("/events/{id}/links", get(events::links::<S>).post(events::add_link::<S>))
    // Participations
    .route("/participations/{id}", patch(participations::update::<S>))
    .route("/participations/{id}/status", patch(participations::update_status::<S>))
    // Departments and roles
    .route(
      "/departments",
      get(roles::list_departments::<S>).post(roles::create_department::<S>),
    )
    .route("/departments/{id}/roles", get(roles::department_roles::<S>))
    .route("/roles", get(roles::list_roles::<S>).post(roles::create_role::<S>))
    .route("/roles/{id}", delete(roles::delete_role::<S>))
    // Action tracker
    .route("/actions", get(actions::list::<S>).post(actions::create::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
