//! [`SqliteStore`], the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  action::{sort_by_due_date, Action, NewAction},
  event::{Event, ManualLink, NewEvent, NewManualLink},
  participation::{AssignmentPatch, NewParticipation, Participation, ParticipationStatus},
  role::{Department, NewDepartment, NewRole, Role},
  store::RosterStore,
  volunteer::{NewVolunteer, Volunteer},
};

use crate::{
  encode::{
    encode_date, encode_dt, encode_list, encode_uuid, RawAction, RawDepartment,
    RawEvent, RawLink, RawParticipation, RawRole, RawVolunteer, ACTION_COLUMNS,
    EVENT_COLUMNS, LINK_COLUMNS, PARTICIPATION_COLUMNS, ROLE_COLUMNS,
    VOLUNTEER_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Outcome of an insert guarded by the participation uniqueness constraint.
enum Insert {
  Done,
  MissingEvent,
  Duplicate,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Run raw SQL against the connection.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn event_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM events WHERE event_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Run a single-row `SELECT` whose columns match `R::from_row`.
  async fn query_one<R, F>(&self, sql: String, id: Uuid, from_row: F) -> Result<Option<R>>
  where
    R: Send + 'static,
    F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| from_row(row))
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Run a multi-row `SELECT` with string parameters.
  async fn query_all<R, F>(
    &self,
    sql: String,
    params: Vec<String>,
    from_row: F,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
    F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(raws)
  }
}

// ─── RosterStore impl ─────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Volunteers ────────────────────────────────────────────────────────────

  async fn add_volunteer(&self, input: NewVolunteer) -> Result<Volunteer> {
    let volunteer = input.into_volunteer(Uuid::new_v4(), Utc::now());
    self.put_volunteer_row(&volunteer).await?;
    Ok(volunteer)
  }

  async fn put_volunteer(&self, id: Uuid, input: NewVolunteer) -> Result<Volunteer> {
    let draft = input.into_volunteer(id, Utc::now());
    self.put_volunteer_row(&draft).await?;
    // Re-read so an overwrite reports the original `created_at`.
    self
      .get_volunteer(id)
      .await?
      .ok_or(Error::Core(roster_core::Error::VolunteerNotFound(id)))
  }

  async fn get_volunteer(&self, id: Uuid) -> Result<Option<Volunteer>> {
    let sql = format!("SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE volunteer_id = ?1");
    let raw = self.query_one(sql, id, RawVolunteer::from_row).await?;
    raw.map(RawVolunteer::into_volunteer).transpose()
  }

  async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
    let sql = format!(
      "SELECT {VOLUNTEER_COLUMNS} FROM volunteers ORDER BY name COLLATE NOCASE, created_at"
    );
    let raws = self.query_all(sql, Vec::new(), RawVolunteer::from_row).await?;
    raws.into_iter().map(RawVolunteer::into_volunteer).collect()
  }

  async fn get_volunteers<'a>(&'a self, ids: &'a [Uuid]) -> Result<Vec<Volunteer>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
      "SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE volunteer_id IN ({placeholders}) \
       ORDER BY name COLLATE NOCASE, created_at"
    );
    let params = ids.iter().copied().map(encode_uuid).collect();
    let raws = self.query_all(sql, params, RawVolunteer::from_row).await?;
    raws.into_iter().map(RawVolunteer::into_volunteer).collect()
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn add_event(&self, input: NewEvent) -> Result<Event> {
    let event = input.into_event(Uuid::new_v4());

    let id_str      = encode_uuid(event.event_id);
    let name        = event.name.clone();
    let date_str    = event.date.map(encode_date);
    let location    = event.location.clone();
    let mode_str    = event.mode.map(|m| m.to_string());
    let age_group   = event.age_group.clone();
    let description = event.description.clone();
    let context     = event.context.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             event_id, name, event_date, location, mode, age_group,
             description, context
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            name,
            date_str,
            location,
            mode_str,
            age_group,
            description,
            context,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1");
    let raw = self.query_one(sql, id, RawEvent::from_row).await?;
    raw.map(RawEvent::into_event).transpose()
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    let sql = format!(
      "SELECT {EVENT_COLUMNS} FROM events
       ORDER BY event_date IS NULL, event_date DESC, name COLLATE NOCASE"
    );
    let raws = self.query_all(sql, Vec::new(), RawEvent::from_row).await?;
    raws.into_iter().map(RawEvent::into_event).collect()
  }

  // ── Departments and roles ─────────────────────────────────────────────────

  async fn add_department(&self, input: NewDepartment) -> Result<Department> {
    let department = Department {
      department_id: Uuid::new_v4(),
      name:          input.name,
    };

    let id_str = encode_uuid(department.department_id);
    let name   = department.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO departments (department_id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(department)
  }

  async fn list_departments(&self) -> Result<Vec<Department>> {
    let sql = "SELECT department_id, name FROM departments ORDER BY name COLLATE NOCASE"
      .to_owned();
    let raws = self.query_all(sql, Vec::new(), RawDepartment::from_row).await?;
    raws.into_iter().map(RawDepartment::into_department).collect()
  }

  async fn add_role(&self, input: NewRole) -> Result<Role> {
    let role = input.into_role(Uuid::new_v4())?;

    let id_str           = encode_uuid(role.role_id);
    let name             = role.name.clone();
    let department_str   = encode_uuid(role.department_id);
    let category         = role.category.clone();
    let responsibilities = role.responsibilities.clone();
    let comments         = role.comments.clone();
    let skills_str       = encode_list(&role.preferred_skills)?;
    let time_commitment  = role.time_commitment.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO roles (
             role_id, name, department_id, category, responsibilities,
             comments, preferred_skills, time_commitment
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            name,
            department_str,
            category,
            responsibilities,
            comments,
            skills_str,
            time_commitment,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(role)
  }

  async fn list_roles(&self) -> Result<Vec<Role>> {
    let sql = format!("SELECT {ROLE_COLUMNS} FROM roles ORDER BY name COLLATE NOCASE");
    let raws = self.query_all(sql, Vec::new(), RawRole::from_row).await?;
    raws.into_iter().map(RawRole::into_role).collect()
  }

  async fn delete_role(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM roles WHERE role_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Participations ────────────────────────────────────────────────────────

  async fn record_participation(&self, input: NewParticipation) -> Result<Participation> {
    let (event_id, volunteer_id) = (input.event_id, input.volunteer_id);
    let participation = input.into_participation(Uuid::new_v4(), Utc::now());

    let id_str         = encode_uuid(participation.participation_id);
    let event_str      = encode_uuid(event_id);
    let volunteer_str  = encode_uuid(volunteer_id);
    let department_str = participation.department_id.map(encode_uuid);
    let roles_str      = encode_list(&participation.assigned_roles)?;
    let status_str     = participation.status.to_string();
    let at_str         = encode_dt(participation.recorded_at);

    let outcome = self
      .conn
      .call(move |conn| {
        let event_known = conn
          .query_row(
            "SELECT 1 FROM events WHERE event_id = ?1",
            rusqlite::params![event_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !event_known {
          return Ok(Insert::MissingEvent);
        }

        let inserted = conn.execute(
          "INSERT INTO event_participation (
             participation_id, event_id, volunteer_id, department_id,
             assigned_roles, status, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            event_str,
            volunteer_str,
            department_str,
            roles_str,
            status_str,
            at_str,
          ],
        );
        match inserted {
          Ok(_) => Ok(Insert::Done),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            Ok(Insert::Duplicate)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Insert::Done => Ok(participation),
      Insert::MissingEvent => Err(Error::EventNotFound(event_id)),
      Insert::Duplicate => Err(Error::DuplicateParticipation {
        event:     event_id,
        volunteer: volunteer_id,
      }),
    }
  }

  async fn get_participation(&self, id: Uuid) -> Result<Option<Participation>> {
    let sql = format!(
      "SELECT {PARTICIPATION_COLUMNS} FROM event_participation WHERE participation_id = ?1"
    );
    let raw = self.query_one(sql, id, RawParticipation::from_row).await?;
    raw.map(RawParticipation::into_participation).transpose()
  }

  async fn list_participations(&self, event_id: Uuid) -> Result<Vec<Participation>> {
    let sql = format!(
      "SELECT {PARTICIPATION_COLUMNS} FROM event_participation
       WHERE event_id = ?1 ORDER BY recorded_at, rowid"
    );
    let raws = self
      .query_all(sql, vec![encode_uuid(event_id)], RawParticipation::from_row)
      .await?;
    raws.into_iter().map(RawParticipation::into_participation).collect()
  }

  async fn list_volunteer_participations(
    &self,
    volunteer_id: Uuid,
  ) -> Result<Vec<Participation>> {
    let sql = format!(
      "SELECT {PARTICIPATION_COLUMNS} FROM event_participation
       WHERE volunteer_id = ?1 ORDER BY recorded_at, rowid"
    );
    let raws = self
      .query_all(sql, vec![encode_uuid(volunteer_id)], RawParticipation::from_row)
      .await?;
    raws.into_iter().map(RawParticipation::into_participation).collect()
  }

  async fn update_participation(
    &self,
    id: Uuid,
    patch: AssignmentPatch,
  ) -> Result<Option<Participation>> {
    let id_str         = encode_uuid(id);
    let department_str = encode_uuid(patch.department_id);
    let roles_str      = encode_list(&patch.assigned_roles)?;

    let updated = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE event_participation
             SET department_id = ?2, assigned_roles = ?3
           WHERE participation_id = ?1",
          rusqlite::params![id_str, department_str, roles_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !updated {
      return Ok(None);
    }
    self.get_participation(id).await
  }

  async fn set_participation_status(
    &self,
    id: Uuid,
    status: ParticipationStatus,
  ) -> Result<Option<Participation>> {
    let id_str     = encode_uuid(id);
    let status_str = status.to_string();

    let updated = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE event_participation SET status = ?2 WHERE participation_id = ?1",
          rusqlite::params![id_str, status_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !updated {
      return Ok(None);
    }
    self.get_participation(id).await
  }

  // ── Action tracker ────────────────────────────────────────────────────────

  async fn add_action(&self, input: NewAction) -> Result<Action> {
    if let Some(event_id) = input.event_id
      && !self.event_exists(event_id).await?
    {
      return Err(Error::EventNotFound(event_id));
    }
    let action = input.into_action(Uuid::new_v4(), Utc::now());

    let id_str      = encode_uuid(action.action_id);
    let description = action.description.clone();
    let owner_name  = action.owner_name.clone();
    let due_str     = action.due_date.map(encode_date);
    let status_str  = action.status.to_string();
    let event_str   = action.event_id.map(encode_uuid);
    let at_str      = encode_dt(action.assigned_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO actions (
             action_id, description, owner_name, due_date, status,
             event_id, assigned_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            description,
            owner_name,
            due_str,
            status_str,
            event_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(action)
  }

  async fn list_actions(&self, event_id: Option<Uuid>) -> Result<Vec<Action>> {
    match event_id {
      Some(event_id) => {
        let sql = format!(
          "SELECT {ACTION_COLUMNS} FROM actions
           WHERE event_id = ?1 ORDER BY assigned_at DESC, rowid DESC"
        );
        let raws = self
          .query_all(sql, vec![encode_uuid(event_id)], RawAction::from_row)
          .await?;
        raws.into_iter().map(RawAction::into_action).collect()
      }
      None => {
        let sql = format!("SELECT {ACTION_COLUMNS} FROM actions");
        let raws = self.query_all(sql, Vec::new(), RawAction::from_row).await?;
        let mut actions = raws
          .into_iter()
          .map(RawAction::into_action)
          .collect::<Result<Vec<_>>>()?;
        sort_by_due_date(&mut actions);
        Ok(actions)
      }
    }
  }

  async fn add_link(&self, event_id: Uuid, input: NewManualLink) -> Result<ManualLink> {
    if !self.event_exists(event_id).await? {
      return Err(Error::EventNotFound(event_id));
    }
    let link = ManualLink {
      link_id: Uuid::new_v4(),
      event_id,
      name: input.name,
      url: input.url,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(link.link_id);
    let event_str = encode_uuid(event_id);
    let name      = link.name.clone();
    let url       = link.url.clone();
    let at_str    = encode_dt(link.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO manual_links (link_id, event_id, name, url, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, event_str, name, url, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(link)
  }

  async fn list_links(&self, event_id: Uuid) -> Result<Vec<ManualLink>> {
    let sql = format!(
      "SELECT {LINK_COLUMNS} FROM manual_links
       WHERE event_id = ?1 ORDER BY created_at DESC, rowid DESC"
    );
    let raws = self
      .query_all(sql, vec![encode_uuid(event_id)], RawLink::from_row)
      .await?;
    raws.into_iter().map(RawLink::into_link).collect()
  }

  // ── Admin allowlist ───────────────────────────────────────────────────────

  async fn add_admin<'a>(&'a self, email: &'a str) -> Result<()> {
    let email = email.trim().to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO admins (email) VALUES (?1)",
          rusqlite::params![email],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn is_admin<'a>(&'a self, email: &'a str) -> Result<bool> {
    let email = email.trim().to_owned();
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM admins WHERE email = ?1",
              rusqlite::params![email],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(found)
  }
}

// ─── Private helpers ─────────────────────────────────────────────────────────

impl SqliteStore {
  /// Insert or overwrite a volunteer row. An overwrite leaves `created_at`
  /// untouched.
  async fn put_volunteer_row(&self, v: &Volunteer) -> Result<()> {
    let id_str        = encode_uuid(v.volunteer_id);
    let name          = v.name.clone();
    let city          = v.city.clone();
    let state         = v.state.clone();
    let country       = v.country.clone();
    let kendra        = v.kendra.clone();
    let lesson_number = v.lesson_number.clone();
    let age           = v.age;
    let gender        = v.gender.clone();
    let contact       = v.contact.clone();
    let skills        = v.skills.clone();
    let at_str        = encode_dt(v.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO volunteers (
             volunteer_id, name, city, state, country, kendra,
             lesson_number, age, gender, contact, skills, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
           ON CONFLICT (volunteer_id) DO UPDATE SET
             name          = excluded.name,
             city          = excluded.city,
             state         = excluded.state,
             country       = excluded.country,
             kendra        = excluded.kendra,
             lesson_number = excluded.lesson_number,
             age           = excluded.age,
             gender        = excluded.gender,
             contact       = excluded.contact,
             skills        = excluded.skills",
          rusqlite::params![
            id_str,
            name,
            city,
            state,
            country,
            kendra,
            lesson_number,
            age,
            gender,
            contact,
            skills,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
