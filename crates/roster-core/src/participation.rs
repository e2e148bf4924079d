//! Participation: the join record between a volunteer and an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Free status label carried by a participation. No transitions between
/// values are enforced.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
pub enum ParticipationStatus {
  #[default]
  Assigned,
  Withdrawn,
  Unavailable,
}

/// A volunteer's assignment to an event.
///
/// `assigned_roles` holds role display names; renaming a role does not
/// rewrite existing participations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
  pub participation_id: Uuid,
  pub event_id:         Uuid,
  pub volunteer_id:     Uuid,
  pub department_id:    Option<Uuid>,
  pub assigned_roles:   Vec<String>,
  pub status:           ParticipationStatus,
  /// Set by the store on creation.
  pub recorded_at:      DateTime<Utc>,
}

/// Input to [`crate::store::RosterStore::record_participation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipation {
  pub event_id:       Uuid,
  pub volunteer_id:   Uuid,
  pub department_id:  Option<Uuid>,
  pub assigned_roles: Vec<String>,
  pub status:         ParticipationStatus,
}

impl NewParticipation {
  pub fn into_participation(
    self,
    participation_id: Uuid,
    recorded_at: DateTime<Utc>,
  ) -> Participation {
    Participation {
      participation_id,
      event_id: self.event_id,
      volunteer_id: self.volunteer_id,
      department_id: self.department_id,
      assigned_roles: self.assigned_roles,
      status: self.status,
      recorded_at,
    }
  }
}

/// The fields an assignment edit overwrites. Everything else on the record
/// is left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPatch {
  pub department_id:  Uuid,
  #[serde(default)]
  pub assigned_roles: Vec<String>,
}

/// Body of a status change. Only `status` is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
  pub status: ParticipationStatus,
}
