//! Volunteer records.
//!
//! Volunteers enter the store by bulk import or by a self-service profile
//! save. The assignment screens only ever read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A person who can be assigned to events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
  pub volunteer_id:  Uuid,
  pub name:          String,
  pub city:          String,
  pub state:         String,
  pub country:       String,
  /// The local center the volunteer is affiliated with.
  pub kendra:        String,
  pub lesson_number: String,
  pub age:           Option<u32>,
  pub gender:        String,
  pub contact:       String,
  /// Free-form, comma-separated.
  pub skills:        String,
  pub created_at:    DateTime<Utc>,
}

impl Volunteer {
  /// The individual entries of the comma-separated `skills` field.
  pub fn skill_list(&self) -> Vec<&str> { split_list(&self.skills) }
}

/// Input to [`crate::store::RosterStore::add_volunteer`] and
/// [`crate::store::RosterStore::put_volunteer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVolunteer {
  pub name:          String,
  pub city:          String,
  pub state:         String,
  pub country:       String,
  pub kendra:        String,
  pub lesson_number: String,
  pub age:           Option<u32>,
  pub gender:        String,
  pub contact:       String,
  pub skills:        String,
}

impl NewVolunteer {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("volunteer name"));
    }
    Ok(())
  }

  /// Build the stored record; `created_at` is supplied by the store.
  pub fn into_volunteer(self, volunteer_id: Uuid, created_at: DateTime<Utc>) -> Volunteer {
    Volunteer {
      volunteer_id,
      name: self.name,
      city: self.city,
      state: self.state,
      country: self.country,
      kendra: self.kendra,
      lesson_number: self.lesson_number,
      age: self.age,
      gender: self.gender,
      contact: self.contact,
      skills: self.skills,
      created_at,
    }
  }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(s: &str) -> Vec<&str> {
  s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
}
