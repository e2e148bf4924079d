//! Error types for `roster-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  // ── Validation ──────────────────────────────────────────────────────────
  #[error("no event selected")]
  NoEventSelected,

  #[error("select at least one volunteer to assign")]
  NoVolunteersSelected,

  #[error("select a department")]
  NoDepartmentSelected,

  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("role {role:?} does not belong to department {department}")]
  RoleNotInDepartment { role: String, department: Uuid },

  #[error("volunteer {volunteer} is already assigned to event {event}")]
  AlreadyAssigned { volunteer: Uuid, event: Uuid },

  #[error("unknown status: {0:?}")]
  UnknownStatus(String),

  // ── Lookups ─────────────────────────────────────────────────────────────
  #[error("event not found: {0}")]
  EventNotFound(Uuid),

  #[error("volunteer not found: {0}")]
  VolunteerNotFound(Uuid),

  #[error("department not found: {0}")]
  DepartmentNotFound(Uuid),

  #[error("participation not found: {0}")]
  ParticipationNotFound(Uuid),

  // ── Store ───────────────────────────────────────────────────────────────
  /// Some creates of a batch assignment failed. Records created before the
  /// failure are kept.
  #[error("failed to assign volunteers")]
  BatchIncomplete {
    created:   usize,
    requested: usize,
    #[source]
    source:    Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// `true` for errors raised before any store call was made.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::NoEventSelected
        | Self::NoVolunteersSelected
        | Self::NoDepartmentSelected
        | Self::MissingField(_)
        | Self::RoleNotInDepartment { .. }
        | Self::AlreadyAssigned { .. }
        | Self::UnknownStatus(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
