//! Request orchestration for assignments, generic over any [`RosterStore`].
//!
//! Every mutation is followed by a full reload of the event's participations
//! rather than a local patch, so the returned [`Partition`] always reflects
//! what the store holds.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  event::Event,
  participation::{AssignmentPatch, NewParticipation, Participation, ParticipationStatus},
  role::Role,
  roster::{Partition, partition, role_options},
  store::RosterStore,
};

// ─── Batch input ─────────────────────────────────────────────────────────────

/// One department/role assignment applied to several volunteers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAssignment {
  pub volunteer_ids:  Vec<Uuid>,
  pub department_id:  Option<Uuid>,
  #[serde(default)]
  pub assigned_roles: Vec<String>,
}

impl BatchAssignment {
  /// Check the selection is usable; returns the chosen department.
  pub fn validate(&self) -> Result<Uuid> {
    if self.volunteer_ids.is_empty() {
      return Err(Error::NoVolunteersSelected);
    }
    self.department_id.ok_or(Error::NoDepartmentSelected)
  }

  /// One record per distinct volunteer, in selection order, all with status
  /// [`ParticipationStatus::Assigned`].
  pub fn into_participations(self, event_id: Uuid) -> Result<Vec<NewParticipation>> {
    let department_id = self.validate()?;
    let mut seen = HashSet::new();
    Ok(
      self
        .volunteer_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .map(|volunteer_id| NewParticipation {
          event_id,
          volunteer_id,
          department_id: Some(department_id),
          assigned_roles: self.assigned_roles.clone(),
          status: ParticipationStatus::Assigned,
        })
        .collect(),
    )
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Load everything needed for `event_id` and partition it.
///
/// Participations pointing at a missing volunteer are logged and returned in
/// [`Partition::orphaned`].
pub async fn load_partition<S: RosterStore>(store: &S, event_id: Uuid) -> Result<Partition> {
  let split = read_partition(store, event_id).await?;
  for orphan in &split.orphaned {
    warn!(
      event = %event_id,
      participation = %orphan.participation_id,
      volunteer = %orphan.volunteer_id,
      "participation references a volunteer that no longer exists"
    );
  }
  Ok(split)
}

async fn read_partition<S: RosterStore>(store: &S, event_id: Uuid) -> Result<Partition> {
  store
    .get_event(event_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::EventNotFound(event_id))?;

  let volunteers = store.list_volunteers().await.map_err(Error::store)?;
  let departments = store.list_departments().await.map_err(Error::store)?;
  let participations = store
    .list_participations(event_id)
    .await
    .map_err(Error::store)?;

  Ok(partition(event_id, &volunteers, &departments, &participations))
}

/// The events `volunteer_id` has at least one participation in.
pub async fn volunteer_events<S: RosterStore>(store: &S, volunteer_id: Uuid) -> Result<Vec<Event>> {
  store
    .get_volunteer(volunteer_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::VolunteerNotFound(volunteer_id))?;

  let event_ids: HashSet<Uuid> = store
    .list_volunteer_participations(volunteer_id)
    .await
    .map_err(Error::store)?
    .into_iter()
    .map(|p| p.event_id)
    .collect();

  let events = store.list_events().await.map_err(Error::store)?;
  Ok(
    events
      .into_iter()
      .filter(|e| event_ids.contains(&e.event_id))
      .collect(),
  )
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Assign every volunteer in `batch` to `event_id` and return the reloaded
/// partition.
///
/// The selection is validated before the store is touched. Creates are issued
/// one per volunteer and are not atomic as a group: if one fails, the ones
/// before it stay and [`Error::BatchIncomplete`] is returned.
pub async fn confirm_batch_assignment<S: RosterStore>(
  store: &S,
  event_id: Uuid,
  batch: BatchAssignment,
) -> Result<Partition> {
  let department_id = batch.validate()?;

  let current = read_partition(store, event_id).await?;
  let roles = load_department_roles(store, department_id).await?;
  check_roles(&roles, department_id, &batch.assigned_roles, &[])?;

  let records = batch.into_participations(event_id)?;
  for record in &records {
    if current.is_assigned(record.volunteer_id) {
      return Err(Error::AlreadyAssigned { volunteer: record.volunteer_id, event: event_id });
    }
  }
  let ids: Vec<Uuid> = records.iter().map(|r| r.volunteer_id).collect();
  let known = store.get_volunteers(&ids).await.map_err(Error::store)?;
  if let Some(missing) = ids
    .iter()
    .find(|id| !known.iter().any(|v| v.volunteer_id == **id))
  {
    return Err(Error::VolunteerNotFound(*missing));
  }

  let requested = records.len();
  info!(event = %event_id, department = %department_id, requested, "assigning volunteers");

  for (created, record) in records.into_iter().enumerate() {
    if let Err(e) = store.record_participation(record).await {
      warn!(event = %event_id, created, requested, error = %e, "batch assignment stopped");
      return Err(Error::BatchIncomplete { created, requested, source: Box::new(e) });
    }
  }

  load_partition(store, event_id).await
}

/// Overwrite the department and roles of one participation.
///
/// When the department is unchanged, role names already on the record are
/// accepted even if the department no longer offers them. Every other name
/// must be offered by the patched department.
pub async fn update_assignment<S: RosterStore>(
  store: &S,
  participation_id: Uuid,
  patch: AssignmentPatch,
) -> Result<Participation> {
  let existing = store
    .get_participation(participation_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ParticipationNotFound(participation_id))?;

  let roles = load_department_roles(store, patch.department_id).await?;
  let held: &[String] = if existing.department_id == Some(patch.department_id) {
    &existing.assigned_roles
  } else {
    &[]
  };
  check_roles(&roles, patch.department_id, &patch.assigned_roles, held)?;

  let updated = store
    .update_participation(participation_id, patch)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ParticipationNotFound(participation_id))?;

  info!(
    participation = %participation_id,
    event = %updated.event_id,
    "assignment updated"
  );
  Ok(updated)
}

/// Record a participation status ("Assigned", "Withdrawn", "Unavailable").
/// Department and roles are left alone.
pub async fn set_participation_status<S: RosterStore>(
  store: &S,
  participation_id: Uuid,
  status: ParticipationStatus,
) -> Result<Participation> {
  let updated = store
    .set_participation_status(participation_id, status)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ParticipationNotFound(participation_id))?;

  info!(
    participation = %participation_id,
    event = %updated.event_id,
    %status,
    "participation status set"
  );
  Ok(updated)
}

async fn load_department_roles<S: RosterStore>(store: &S, department_id: Uuid) -> Result<Vec<Role>> {
  let departments = store.list_departments().await.map_err(Error::store)?;
  if !departments.iter().any(|d| d.department_id == department_id) {
    return Err(Error::DepartmentNotFound(department_id));
  }
  store.list_roles().await.map_err(Error::store)
}

fn check_roles(
  roles: &[Role],
  department_id: Uuid,
  requested: &[String],
  already_held: &[String],
) -> Result<()> {
  let offered = role_options(roles, department_id);
  match requested
    .iter()
    .find(|name| !offered.offers(name) && !already_held.contains(name))
  {
    Some(name) => Err(Error::RoleNotInDepartment {
      role:       name.clone(),
      department: department_id,
    }),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    action::{Action, NewAction},
    event::{ManualLink, NewEvent, NewManualLink},
    role::{Department, NewDepartment, NewRole},
    volunteer::{NewVolunteer, Volunteer},
  };

  // A store that fails the test if it is ever called.
  struct UntouchedStore;

  impl RosterStore for UntouchedStore {
    type Error = std::convert::Infallible;
    async fn add_volunteer(&self, _: NewVolunteer) -> Result<Volunteer, Self::Error> { unimplemented!() }
    async fn put_volunteer(&self, _: Uuid, _: NewVolunteer) -> Result<Volunteer, Self::Error> { unimplemented!() }
    async fn get_volunteer(&self, _: Uuid) -> Result<Option<Volunteer>, Self::Error> { unimplemented!() }
    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, Self::Error> { unimplemented!() }
    async fn get_volunteers(&self, _: &[Uuid]) -> Result<Vec<Volunteer>, Self::Error> { unimplemented!() }
    async fn add_event(&self, _: NewEvent) -> Result<Event, Self::Error> { unimplemented!() }
    async fn get_event(&self, _: Uuid) -> Result<Option<Event>, Self::Error> { unimplemented!() }
    async fn list_events(&self) -> Result<Vec<Event>, Self::Error> { unimplemented!() }
    async fn add_department(&self, _: NewDepartment) -> Result<Department, Self::Error> { unimplemented!() }
    async fn list_departments(&self) -> Result<Vec<Department>, Self::Error> { unimplemented!() }
    async fn add_role(&self, _: NewRole) -> Result<Role, Self::Error> { unimplemented!() }
    async fn list_roles(&self) -> Result<Vec<Role>, Self::Error> { unimplemented!() }
    async fn delete_role(&self, _: Uuid) -> Result<bool, Self::Error> { unimplemented!() }
    async fn record_participation(&self, _: NewParticipation) -> Result<Participation, Self::Error> { unimplemented!() }
    async fn get_participation(&self, _: Uuid) -> Result<Option<Participation>, Self::Error> { unimplemented!() }
    async fn list_participations(&self, _: Uuid) -> Result<Vec<Participation>, Self::Error> { unimplemented!() }
    async fn list_volunteer_participations(&self, _: Uuid) -> Result<Vec<Participation>, Self::Error> { unimplemented!() }
    async fn update_participation(&self, _: Uuid, _: AssignmentPatch) -> Result<Option<Participation>, Self::Error> { unimplemented!() }
    async fn set_participation_status(&self, _: Uuid, _: ParticipationStatus) -> Result<Option<Participation>, Self::Error> { unimplemented!() }
    async fn add_action(&self, _: NewAction) -> Result<Action, Self::Error> { unimplemented!() }
    async fn list_actions(&self, _: Option<Uuid>) -> Result<Vec<Action>, Self::Error> { unimplemented!() }
    async fn add_link(&self, _: Uuid, _: NewManualLink) -> Result<ManualLink, Self::Error> { unimplemented!() }
    async fn list_links(&self, _: Uuid) -> Result<Vec<ManualLink>, Self::Error> { unimplemented!() }
    async fn add_admin(&self, _: &str) -> Result<(), Self::Error> { unimplemented!() }
    async fn is_admin(&self, _: &str) -> Result<bool, Self::Error> { unimplemented!() }
  }

  #[tokio::test]
  async fn empty_batch_is_rejected_before_any_store_call() {
    let batch = BatchAssignment {
      volunteer_ids:  vec![],
      department_id:  Some(Uuid::new_v4()),
      assigned_roles: vec![],
    };
    let err = confirm_batch_assignment(&UntouchedStore, Uuid::new_v4(), batch)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NoVolunteersSelected));
  }

  #[tokio::test]
  async fn batch_without_department_is_rejected_before_any_store_call() {
    let batch = BatchAssignment {
      volunteer_ids:  vec![Uuid::new_v4()],
      department_id:  None,
      assigned_roles: vec!["Cook".into()],
    };
    let err = confirm_batch_assignment(&UntouchedStore, Uuid::new_v4(), batch)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NoDepartmentSelected));
  }

  #[test]
  fn into_participations_dedupes_and_stamps_assigned() {
    let (event, dept, v1, v2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let records = BatchAssignment {
      volunteer_ids:  vec![v1, v2, v1],
      department_id:  Some(dept),
      assigned_roles: vec!["R1".into(), "R2".into()],
    }
    .into_participations(event)
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].volunteer_id, v1);
    assert_eq!(records[1].volunteer_id, v2);
    for r in &records {
      assert_eq!(r.event_id, event);
      assert_eq!(r.department_id, Some(dept));
      assert_eq!(r.assigned_roles, ["R1", "R2"]);
      assert_eq!(r.status, ParticipationStatus::Assigned);
    }
  }

  #[test]
  fn check_roles_accepts_held_names_only_as_leftovers() {
    let dept = Uuid::new_v4();
    let cook = NewRole { name: "Cook".into(), department_id: Some(dept), ..NewRole::default() }
      .into_role(Uuid::new_v4())
      .unwrap();
    let roles = [cook];

    assert!(check_roles(&roles, dept, &["Cook".into()], &[]).is_ok());
    assert!(check_roles(&roles, dept, &["Chef".into()], &[]).is_err());
    assert!(check_roles(&roles, dept, &["Chef".into()], &["Chef".into()]).is_ok());
  }
}
