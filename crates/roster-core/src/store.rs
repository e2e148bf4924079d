//! The `RosterStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Each group of methods corresponds to one named collection. Reads are
//! whole-collection or filtered by equality/membership; writes are create and
//! update-by-id. Nothing here spans more than one record atomically.

use std::future::Future;

use uuid::Uuid;

use crate::{
  action::{Action, NewAction},
  event::{Event, ManualLink, NewEvent, NewManualLink},
  participation::{AssignmentPatch, NewParticipation, Participation, ParticipationStatus},
  role::{Department, NewDepartment, NewRole, Role},
  volunteer::{NewVolunteer, Volunteer},
};

/// Abstraction over a roster store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Volunteers ────────────────────────────────────────────────────────

  /// Create a volunteer under a fresh id.
  fn add_volunteer(
    &self,
    input: NewVolunteer,
  ) -> impl Future<Output = Result<Volunteer, Self::Error>> + Send + '_;

  /// Create or overwrite the volunteer stored under `id`.
  ///
  /// Used by self-service profile saves, where the id is the signed-in
  /// user's. An overwrite keeps the original `created_at`.
  fn put_volunteer(
    &self,
    id: Uuid,
    input: NewVolunteer,
  ) -> impl Future<Output = Result<Volunteer, Self::Error>> + Send + '_;

  fn get_volunteer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Volunteer>, Self::Error>> + Send + '_;

  fn list_volunteers(
    &self,
  ) -> impl Future<Output = Result<Vec<Volunteer>, Self::Error>> + Send + '_;

  /// Volunteers whose id is in `ids`. Unknown ids are skipped.
  fn get_volunteers<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Volunteer>, Self::Error>> + Send + 'a;

  // ── Events ────────────────────────────────────────────────────────────

  fn add_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  // ── Departments and roles ─────────────────────────────────────────────

  fn add_department(
    &self,
    input: NewDepartment,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  fn add_role(
    &self,
    input: NewRole,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  /// All roles, ordered by name.
  fn list_roles(
    &self,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  /// Delete a role. Returns `false` if it did not exist. Participations that
  /// name the role keep the name.
  fn delete_role(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Participations ────────────────────────────────────────────────────

  /// Create one participation. `recorded_at` is set by the store.
  fn record_participation(
    &self,
    input: NewParticipation,
  ) -> impl Future<Output = Result<Participation, Self::Error>> + Send + '_;

  fn get_participation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Participation>, Self::Error>> + Send + '_;

  /// All participations for `event_id`, oldest first.
  fn list_participations(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + '_;

  /// All participations of one volunteer across events, oldest first.
  fn list_volunteer_participations(
    &self,
    volunteer_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + '_;

  /// Overwrite department and roles of one participation. Returns `None` if
  /// it does not exist.
  fn update_participation(
    &self,
    id: Uuid,
    patch: AssignmentPatch,
  ) -> impl Future<Output = Result<Option<Participation>, Self::Error>> + Send + '_;

  /// Overwrite the status of one participation. Returns `None` if it does
  /// not exist.
  fn set_participation_status(
    &self,
    id: Uuid,
    status: ParticipationStatus,
  ) -> impl Future<Output = Result<Option<Participation>, Self::Error>> + Send + '_;

  // ── Action tracker ────────────────────────────────────────────────────

  /// Create an action. `assigned_at` is set by the store.
  fn add_action(
    &self,
    input: NewAction,
  ) -> impl Future<Output = Result<Action, Self::Error>> + Send + '_;

  /// With `event_id`, that event's actions newest-assigned first; without,
  /// every action by due date, latest first and undated last.
  fn list_actions(
    &self,
    event_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Action>, Self::Error>> + Send + '_;

  fn add_link(
    &self,
    event_id: Uuid,
    input: NewManualLink,
  ) -> impl Future<Output = Result<ManualLink, Self::Error>> + Send + '_;

  /// An event's links, newest first.
  fn list_links(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ManualLink>, Self::Error>> + Send + '_;

  // ── Admin allowlist ───────────────────────────────────────────────────

  /// Add `email` to the allowlist. Adding an existing entry is a no-op.
  fn add_admin<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Whether `email` is on the allowlist. Comparison ignores ASCII case.
  fn is_admin<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
