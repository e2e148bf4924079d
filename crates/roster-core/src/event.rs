//! Events (also called programs) and the resource links attached to them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// How an event is attended.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum EventMode {
  #[serde(rename = "In Person")]
  #[strum(serialize = "In Person")]
  InPerson,
  Online,
  Hybrid,
}

/// An activity volunteers are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:    Uuid,
  pub name:        String,
  pub date:        Option<NaiveDate>,
  pub location:    String,
  pub mode:        Option<EventMode>,
  pub age_group:   String,
  pub description: String,
  /// Free-text background for the event.
  pub context:     String,
}

/// Input to [`crate::store::RosterStore::add_event`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewEvent {
  pub name:        String,
  pub date:        Option<NaiveDate>,
  pub location:    String,
  pub mode:        Option<EventMode>,
  pub age_group:   String,
  pub description: String,
  pub context:     String,
}

impl NewEvent {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("event name"));
    }
    Ok(())
  }

  pub fn into_event(self, event_id: Uuid) -> Event {
    Event {
      event_id,
      name: self.name,
      date: self.date,
      location: self.location,
      mode: self.mode,
      age_group: self.age_group,
      description: self.description,
      context: self.context,
    }
  }
}

// ─── Manual links ────────────────────────────────────────────────────────────

/// A named URL an operator attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualLink {
  pub link_id:    Uuid,
  pub event_id:   Uuid,
  pub name:       String,
  pub url:        String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewManualLink {
  pub name: String,
  pub url:  String,
}

impl NewManualLink {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("link name"));
    }
    if self.url.trim().is_empty() {
      return Err(Error::MissingField("link url"));
    }
    Ok(())
  }
}
