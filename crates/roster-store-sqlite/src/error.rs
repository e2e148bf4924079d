//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a value no variant maps to.
  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },

  #[error("event not found: {0}")]
  EventNotFound(uuid::Uuid),

  /// Rejected by the `(event_id, volunteer_id)` uniqueness constraint.
  #[error("volunteer {volunteer} already has a participation in event {event}")]
  DuplicateParticipation {
    event:     uuid::Uuid,
    volunteer: uuid::Uuid,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
