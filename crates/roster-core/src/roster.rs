//! The assignment reconciler.
//!
//! [`Roster`] owns the in-memory copies of everything an assignment screen
//! works with. [`Roster::partition`] splits the volunteers into those not yet
//! assigned to the selected event and those that are, with department and
//! role detail resolved.
//!
//! A volunteer is assigned to an event iff at least one participation exists
//! for the pair. Every volunteer therefore lands in exactly one side of a
//! partition, even when duplicate participation rows exist.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  event::Event,
  participation::{Participation, ParticipationStatus},
  role::{Department, Role},
  volunteer::Volunteer,
};

/// Shown wherever a participation's department cannot be resolved.
pub const UNKNOWN_DEPARTMENT: &str = "N/A";

// ─── Partition ───────────────────────────────────────────────────────────────

/// A volunteer's side of a participation, with lookups resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedVolunteer {
  pub participation_id: Uuid,
  pub volunteer:        Volunteer,
  pub department_id:    Option<Uuid>,
  /// The department's name, or [`UNKNOWN_DEPARTMENT`].
  pub department_name:  String,
  pub assigned_roles:   Vec<String>,
  pub status:           ParticipationStatus,
}

/// The assigned/unassigned split of all volunteers for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
  pub event_id:   Uuid,
  pub unassigned: Vec<Volunteer>,
  pub assigned:   Vec<AssignedVolunteer>,
  /// Participations whose volunteer record no longer exists. They count as
  /// neither assigned nor unassigned.
  pub orphaned:   Vec<Participation>,
}

impl Partition {
  pub fn is_assigned(&self, volunteer_id: Uuid) -> bool {
    self
      .assigned
      .iter()
      .any(|a| a.volunteer.volunteer_id == volunteer_id)
  }
}

/// Split `volunteers` relative to `event_id`.
///
/// Participations for other events are ignored.
pub fn partition(
  event_id: Uuid,
  volunteers: &[Volunteer],
  departments: &[Department],
  participations: &[Participation],
) -> Partition {
  let scoped = participations.iter().filter(|p| p.event_id == event_id);

  let assigned_ids: HashSet<Uuid> = scoped.clone().map(|p| p.volunteer_id).collect();

  let unassigned = volunteers
    .iter()
    .filter(|v| !assigned_ids.contains(&v.volunteer_id))
    .cloned()
    .collect();

  let mut assigned = Vec::new();
  let mut orphaned = Vec::new();
  for p in scoped {
    let Some(volunteer) = volunteers.iter().find(|v| v.volunteer_id == p.volunteer_id) else {
      orphaned.push(p.clone());
      continue;
    };
    assigned.push(AssignedVolunteer {
      participation_id: p.participation_id,
      volunteer:        volunteer.clone(),
      department_id:    p.department_id,
      department_name:  department_name(departments, p.department_id),
      assigned_roles:   p.assigned_roles.clone(),
      status:           p.status,
    });
  }

  Partition { event_id, unassigned, assigned, orphaned }
}

fn department_name(departments: &[Department], id: Option<Uuid>) -> String {
  id.and_then(|id| departments.iter().find(|d| d.department_id == id))
    .map(|d| d.name.clone())
    .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_owned())
}

// ─── Role options ────────────────────────────────────────────────────────────

/// The roles an operator may pick once a department is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum RoleOptions {
  Available(Vec<Role>),
  /// The department has no roles defined.
  NoneForDepartment,
}

impl RoleOptions {
  pub fn roles(&self) -> &[Role] {
    match self {
      Self::Available(roles) => roles,
      Self::NoneForDepartment => &[],
    }
  }

  pub fn offers(&self, role_name: &str) -> bool {
    self.roles().iter().any(|r| r.name == role_name)
  }
}

/// Roles whose department is `department_id`, in their original order.
pub fn role_options(roles: &[Role], department_id: Uuid) -> RoleOptions {
  let matching: Vec<Role> = roles
    .iter()
    .filter(|r| r.department_id == department_id)
    .cloned()
    .collect();
  if matching.is_empty() {
    RoleOptions::NoneForDepartment
  } else {
    RoleOptions::Available(matching)
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// Everything an assignment screen holds in memory.
///
/// `participations` only ever holds records for `selected_event`.
#[derive(Debug, Clone, Default)]
pub struct Roster {
  pub volunteers:  Vec<Volunteer>,
  pub events:      Vec<Event>,
  pub departments: Vec<Department>,
  pub roles:       Vec<Role>,
  selected_event:  Option<Uuid>,
  participations:  Vec<Participation>,
}

impl Roster {
  pub fn new(
    volunteers: Vec<Volunteer>,
    events: Vec<Event>,
    departments: Vec<Department>,
    roles: Vec<Role>,
  ) -> Self {
    Self { volunteers, events, departments, roles, ..Self::default() }
  }

  pub fn selected_event(&self) -> Option<Uuid> { self.selected_event }

  pub fn selected_event_record(&self) -> Option<&Event> {
    let id = self.selected_event?;
    self.events.iter().find(|e| e.event_id == id)
  }

  pub fn participations(&self) -> &[Participation] { &self.participations }

  /// Switch the selected event. Participations of the previous event are
  /// dropped until [`Roster::set_participations`] delivers the new ones.
  pub fn select_event(&mut self, event_id: Option<Uuid>) {
    if self.selected_event != event_id {
      self.participations.clear();
    }
    self.selected_event = event_id;
  }

  /// Replace the participation set with a fresh load for `event_id`.
  ///
  /// Returns `false` and leaves state untouched when `event_id` is no longer
  /// the selected event, so a late response never mixes two events.
  pub fn set_participations(
    &mut self,
    event_id: Uuid,
    participations: Vec<Participation>,
  ) -> bool {
    if self.selected_event != Some(event_id) {
      return false;
    }
    self.participations = participations
      .into_iter()
      .filter(|p| p.event_id == event_id)
      .collect();
    true
  }

  pub fn partition(&self) -> Result<Partition> {
    let event_id = self.selected_event.ok_or(Error::NoEventSelected)?;
    Ok(partition(
      event_id,
      &self.volunteers,
      &self.departments,
      &self.participations,
    ))
  }

  pub fn role_options(&self, department_id: Uuid) -> RoleOptions {
    role_options(&self.roles, department_id)
  }

  pub fn department(&self, department_id: Uuid) -> Option<&Department> {
    self
      .departments
      .iter()
      .find(|d| d.department_id == department_id)
  }
}
