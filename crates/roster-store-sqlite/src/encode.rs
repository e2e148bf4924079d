//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so they order lexicographically. Calendar dates are
//! `YYYY-MM-DD`. String lists are compact JSON arrays. UUIDs are hyphenated
//! lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use roster_core::{
  action::{Action, ActionStatus},
  event::{Event, EventMode, ManualLink},
  participation::{Participation, ParticipationStatus},
  role::{Department, Role},
  volunteer::Volunteer,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

fn decode_opt_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
  s.map(|s| {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
  })
  .transpose()
}

// ─── Enum columns ─────────────────────────────────────────────────────────────

fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::UnknownValue {
    column,
    value: s.to_owned(),
  })
}

// ─── String lists ─────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

fn decode_list(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawVolunteer::from_row`].
pub const VOLUNTEER_COLUMNS: &str = "volunteer_id, name, city, state, country, \
   kendra, lesson_number, age, gender, contact, skills, created_at";

/// Raw values read directly from a `volunteers` row.
pub struct RawVolunteer {
  pub volunteer_id:  String,
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
  pub created_at:    String,
}

impl RawVolunteer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      volunteer_id:  row.get(0)?,
      name:          row.get(1)?,
      city:          row.get(2)?,
      state:         row.get(3)?,
      country:       row.get(4)?,
      kendra:        row.get(5)?,
      lesson_number: row.get(6)?,
      age:           row.get(7)?,
      gender:        row.get(8)?,
      contact:       row.get(9)?,
      skills:        row.get(10)?,
      created_at:    row.get(11)?,
    })
  }

  pub fn into_volunteer(self) -> Result<Volunteer> {
    Ok(Volunteer {
      volunteer_id:  decode_uuid(&self.volunteer_id)?,
      name:          self.name,
      city:          self.city,
      state:         self.state,
      country:       self.country,
      kendra:        self.kendra,
      lesson_number: self.lesson_number,
      age:           self.age,
      gender:        self.gender,
      contact:       self.contact,
      skills:        self.skills,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const EVENT_COLUMNS: &str =
  "event_id, name, event_date, location, mode, age_group, description, context";

pub struct RawEvent {
  pub event_id:    String,
  pub name:        String,
  pub event_date:  Option<String>,
  pub location:    String,
  pub mode:        Option<String>,
  pub age_group:   String,
  pub description: String,
  pub context:     String,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      name:        row.get(1)?,
      event_date:  row.get(2)?,
      location:    row.get(3)?,
      mode:        row.get(4)?,
      age_group:   row.get(5)?,
      description: row.get(6)?,
      context:     row.get(7)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    let mode = self
      .mode
      .as_deref()
      .map(|m| decode_enum::<EventMode>("mode", m))
      .transpose()?;
    Ok(Event {
      event_id: decode_uuid(&self.event_id)?,
      name: self.name,
      date: decode_opt_date(self.event_date.as_deref())?,
      location: self.location,
      mode,
      age_group: self.age_group,
      description: self.description,
      context: self.context,
    })
  }
}

pub struct RawDepartment {
  pub department_id: String,
  pub name:          String,
}

impl RawDepartment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      department_id: row.get(0)?,
      name:          row.get(1)?,
    })
  }

  pub fn into_department(self) -> Result<Department> {
    Ok(Department {
      department_id: decode_uuid(&self.department_id)?,
      name:          self.name,
    })
  }
}

pub const ROLE_COLUMNS: &str = "role_id, name, department_id, category, \
   responsibilities, comments, preferred_skills, time_commitment";

pub struct RawRole {
  pub role_id:          String,
  pub name:             String,
  pub department_id:    String,
  pub category:         String,
  pub responsibilities: String,
  pub comments:         String,
  pub preferred_skills: String,
  pub time_commitment:  String,
}

impl RawRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      role_id:          row.get(0)?,
      name:             row.get(1)?,
      department_id:    row.get(2)?,
      category:         row.get(3)?,
      responsibilities: row.get(4)?,
      comments:         row.get(5)?,
      preferred_skills: row.get(6)?,
      time_commitment:  row.get(7)?,
    })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role {
      role_id:          decode_uuid(&self.role_id)?,
      name:             self.name,
      department_id:    decode_uuid(&self.department_id)?,
      category:         self.category,
      responsibilities: self.responsibilities,
      comments:         self.comments,
      preferred_skills: decode_list(&self.preferred_skills)?,
      time_commitment:  self.time_commitment,
    })
  }
}

pub const PARTICIPATION_COLUMNS: &str = "participation_id, event_id, \
   volunteer_id, department_id, assigned_roles, status, recorded_at";

pub struct RawParticipation {
  pub participation_id: String,
  pub event_id:         String,
  pub volunteer_id:     String,
  pub department_id:    Option<String>,
  pub assigned_roles:   String,
  pub status:           String,
  pub recorded_at:      String,
}

impl RawParticipation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      participation_id: row.get(0)?,
      event_id:         row.get(1)?,
      volunteer_id:     row.get(2)?,
      department_id:    row.get(3)?,
      assigned_roles:   row.get(4)?,
      status:           row.get(5)?,
      recorded_at:      row.get(6)?,
    })
  }

  pub fn into_participation(self) -> Result<Participation> {
    Ok(Participation {
      participation_id: decode_uuid(&self.participation_id)?,
      event_id:         decode_uuid(&self.event_id)?,
      volunteer_id:     decode_uuid(&self.volunteer_id)?,
      department_id:    decode_opt_uuid(self.department_id.as_deref())?,
      assigned_roles:   decode_list(&self.assigned_roles)?,
      status:           decode_enum::<ParticipationStatus>("status", &self.status)?,
      recorded_at:      decode_dt(&self.recorded_at)?,
    })
  }
}

pub const ACTION_COLUMNS: &str =
  "action_id, description, owner_name, due_date, status, event_id, assigned_at";

pub struct RawAction {
  pub action_id:   String,
  pub description: String,
  pub owner_name:  String,
  pub due_date:    Option<String>,
  pub status:      String,
  pub event_id:    Option<String>,
  pub assigned_at: String,
}

impl RawAction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      action_id:   row.get(0)?,
      description: row.get(1)?,
      owner_name:  row.get(2)?,
      due_date:    row.get(3)?,
      status:      row.get(4)?,
      event_id:    row.get(5)?,
      assigned_at: row.get(6)?,
    })
  }

  pub fn into_action(self) -> Result<Action> {
    Ok(Action {
      action_id:   decode_uuid(&self.action_id)?,
      description: self.description,
      owner_name:  self.owner_name,
      due_date:    decode_opt_date(self.due_date.as_deref())?,
      status:      decode_enum::<ActionStatus>("status", &self.status)?,
      event_id:    decode_opt_uuid(self.event_id.as_deref())?,
      assigned_at: decode_dt(&self.assigned_at)?,
    })
  }
}

pub const LINK_COLUMNS: &str = "link_id, event_id, name, url, created_at";

pub struct RawLink {
  pub link_id:    String,
  pub event_id:   String,
  pub name:       String,
  pub url:        String,
  pub created_at: String,
}

impl RawLink {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      link_id:    row.get(0)?,
      event_id:   row.get(1)?,
      name:       row.get(2)?,
      url:        row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_link(self) -> Result<ManualLink> {
    Ok(ManualLink {
      link_id:    decode_uuid(&self.link_id)?,
      event_id:   decode_uuid(&self.event_id)?,
      name:       self.name,
      url:        self.url,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
