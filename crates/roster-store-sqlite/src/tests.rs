//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use roster_core::{
  action::{ActionStatus, NewAction},
  assign::{
    confirm_batch_assignment, load_partition, set_participation_status, update_assignment,
    BatchAssignment,
  },
  event::{EventMode, NewEvent, NewManualLink},
  participation::{AssignmentPatch, NewParticipation, ParticipationStatus},
  role::{NewDepartment, NewRole},
  store::RosterStore,
  volunteer::NewVolunteer,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn participation(event_id: Uuid, volunteer_id: Uuid) -> NewParticipation {
  NewParticipation {
    event_id,
    volunteer_id,
    department_id: None,
    assigned_roles: Vec::new(),
    status: ParticipationStatus::Assigned,
  }
}

fn role(name: &str, department_id: Uuid) -> NewRole {
  NewRole {
    name: name.into(),
    department_id: Some(department_id),
    ..NewRole::default()
  }
}

// ─── Volunteers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_volunteer() {
  let s = store().await;

  let added = s
    .add_volunteer(NewVolunteer {
      age: Some(34),
      skills: "cooking, first aid".into(),
      ..NewVolunteer::named("Asha")
    })
    .await
    .unwrap();

  let fetched = s.get_volunteer(added.volunteer_id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
  assert_eq!(fetched.skill_list(), vec!["cooking", "first aid"]);
}

#[tokio::test]
async fn get_volunteer_missing_returns_none() {
  let s = store().await;
  assert!(s.get_volunteer(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn put_volunteer_overwrites_but_keeps_created_at() {
  let s = store().await;
  let id = Uuid::new_v4();

  let first = s.put_volunteer(id, NewVolunteer::named("Ravi")).await.unwrap();
  let second = s
    .put_volunteer(id, NewVolunteer {
      city: "Pune".into(),
      ..NewVolunteer::named("Ravi K")
    })
    .await
    .unwrap();

  assert_eq!(second.volunteer_id, id);
  assert_eq!(second.name, "Ravi K");
  assert_eq!(second.city, "Pune");
  assert_eq!(second.created_at, first.created_at);
  assert_eq!(s.list_volunteers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_volunteers_skips_unknown_ids() {
  let s = store().await;
  let a = s.add_volunteer(NewVolunteer::named("A")).await.unwrap();
  s.add_volunteer(NewVolunteer::named("B")).await.unwrap();

  let found = s
    .get_volunteers(&[a.volunteer_id, Uuid::new_v4()])
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].volunteer_id, a.volunteer_id);

  assert!(s.get_volunteers(&[]).await.unwrap().is_empty());
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_fields_round_trip() {
  let s = store().await;
  let event = s
    .add_event(NewEvent {
      date: NaiveDate::from_ymd_opt(2024, 11, 2),
      mode: Some(EventMode::InPerson),
      location: "Hall A".into(),
      ..NewEvent::named("Diwali Seva")
    })
    .await
    .unwrap();

  let fetched = s.get_event(event.event_id).await.unwrap().unwrap();
  assert_eq!(fetched, event);
}

#[tokio::test]
async fn list_events_puts_undated_last() {
  let s = store().await;
  s.add_event(NewEvent::named("Someday")).await.unwrap();
  s.add_event(NewEvent {
    date: NaiveDate::from_ymd_opt(2024, 1, 1),
    ..NewEvent::named("Early")
  })
  .await
  .unwrap();
  s.add_event(NewEvent {
    date: NaiveDate::from_ymd_opt(2024, 6, 1),
    ..NewEvent::named("Late")
  })
  .await
  .unwrap();

  let names: Vec<_> = s
    .list_events()
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.name)
    .collect();
  assert_eq!(names, vec!["Late", "Early", "Someday"]);
}

// ─── Departments and roles ───────────────────────────────────────────────────

#[tokio::test]
async fn roles_are_listed_by_name() {
  let s = store().await;
  let d = s.add_department(NewDepartment { name: "Kitchen".into() }).await.unwrap();
  s.add_role(role("Server", d.department_id)).await.unwrap();
  s.add_role(role("cook", d.department_id)).await.unwrap();
  s.add_role(role("Dishwasher", d.department_id)).await.unwrap();

  let names: Vec<_> = s
    .list_roles()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, vec!["cook", "Dishwasher", "Server"]);
}

#[tokio::test]
async fn add_role_requires_a_department() {
  let s = store().await;
  let err = s
    .add_role(NewRole {
      name: "Floater".into(),
      ..NewRole::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(roster_core::Error::NoDepartmentSelected)
  ));
  assert!(s.list_roles().await.unwrap().is_empty());
}

#[tokio::test]
async fn role_preferred_skills_are_stored_as_a_list() {
  let s = store().await;
  let d = s.add_department(NewDepartment { name: "Media".into() }).await.unwrap();
  s.add_role(NewRole {
    preferred_skills: "video, , editing ".into(),
    ..role("Camera", d.department_id)
  })
  .await
  .unwrap();

  let roles = s.list_roles().await.unwrap();
  assert_eq!(roles[0].preferred_skills, vec!["video", "editing"]);
}

#[tokio::test]
async fn delete_role_reports_whether_it_existed() {
  let s = store().await;
  let d = s.add_department(NewDepartment { name: "Kitchen".into() }).await.unwrap();
  let r = s.add_role(role("Cook", d.department_id)).await.unwrap();

  assert!(s.delete_role(r.role_id).await.unwrap());
  assert!(!s.delete_role(r.role_id).await.unwrap());
  assert!(s.list_roles().await.unwrap().is_empty());
}

// ─── Participations ──────────────────────────────────────────────────────────

#[tokio::test]
async fn participations_list_oldest_first() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let v1 = Uuid::new_v4();
  let v2 = Uuid::new_v4();

  s.record_participation(participation(e.event_id, v1)).await.unwrap();
  s.record_participation(participation(e.event_id, v2)).await.unwrap();

  let listed = s.list_participations(e.event_id).await.unwrap();
  let volunteers: Vec<_> = listed.iter().map(|p| p.volunteer_id).collect();
  assert_eq!(volunteers, vec![v1, v2]);
}

#[tokio::test]
async fn duplicate_participation_is_rejected() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let v = Uuid::new_v4();

  s.record_participation(participation(e.event_id, v)).await.unwrap();
  let err = s
    .record_participation(participation(e.event_id, v))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateParticipation { volunteer, .. } if volunteer == v));
  assert_eq!(s.list_participations(e.event_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn participation_for_missing_event_is_rejected() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let err = s
    .record_participation(participation(missing, Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EventNotFound(id) if id == missing));
}

#[tokio::test]
async fn volunteer_participations_span_events() {
  let s = store().await;
  let e1 = s.add_event(NewEvent::named("E1")).await.unwrap();
  let e2 = s.add_event(NewEvent::named("E2")).await.unwrap();
  let v = Uuid::new_v4();

  s.record_participation(participation(e1.event_id, v)).await.unwrap();
  s.record_participation(participation(e2.event_id, v)).await.unwrap();
  s.record_participation(participation(e2.event_id, Uuid::new_v4()))
    .await
    .unwrap();

  let mine = s.list_volunteer_participations(v).await.unwrap();
  let events: Vec<_> = mine.iter().map(|p| p.event_id).collect();
  assert_eq!(events, vec![e1.event_id, e2.event_id]);
}

#[tokio::test]
async fn update_participation_changes_only_department_and_roles() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let original = s
    .record_participation(NewParticipation {
      status: ParticipationStatus::Withdrawn,
      ..participation(e.event_id, Uuid::new_v4())
    })
    .await
    .unwrap();

  let dept = Uuid::new_v4();
  let updated = s
    .update_participation(original.participation_id, AssignmentPatch {
      department_id:  dept,
      assigned_roles: vec!["Cook".into()],
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.department_id, Some(dept));
  assert_eq!(updated.assigned_roles, vec!["Cook"]);
  assert_eq!(updated.status, ParticipationStatus::Withdrawn);
  assert_eq!(updated.volunteer_id, original.volunteer_id);
  assert_eq!(updated.recorded_at, original.recorded_at);
}

#[tokio::test]
async fn update_missing_participation_returns_none() {
  let s = store().await;
  let result = s
    .update_participation(Uuid::new_v4(), AssignmentPatch {
      department_id:  Uuid::new_v4(),
      assigned_roles: Vec::new(),
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Assignment flow ─────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_assignment_moves_everyone_to_assigned() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let d = s.add_department(NewDepartment { name: "D".into() }).await.unwrap();
  s.add_role(role("R1", d.department_id)).await.unwrap();
  s.add_role(role("R2", d.department_id)).await.unwrap();

  let v1 = s.add_volunteer(NewVolunteer::named("V1")).await.unwrap();
  let v2 = s.add_volunteer(NewVolunteer::named("V2")).await.unwrap();
  let v3 = s.add_volunteer(NewVolunteer::named("V3")).await.unwrap();
  s.record_participation(participation(e.event_id, v1.volunteer_id))
    .await
    .unwrap();

  let before = load_partition(&s, e.event_id).await.unwrap();
  assert_eq!(before.unassigned.len(), 2);
  assert_eq!(before.assigned.len(), 1);

  let after = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v2.volunteer_id, v3.volunteer_id],
    department_id:  Some(d.department_id),
    assigned_roles: vec!["R1".into(), "R2".into()],
  })
  .await
  .unwrap();

  assert!(after.unassigned.is_empty());
  assert_eq!(after.assigned.len(), 3);

  let records = s.list_participations(e.event_id).await.unwrap();
  let new: Vec<_> = records
    .iter()
    .filter(|p| p.volunteer_id != v1.volunteer_id)
    .collect();
  assert_eq!(new.len(), 2);
  for p in new {
    assert_eq!(p.department_id, Some(d.department_id));
    assert_eq!(p.assigned_roles, vec!["R1", "R2"]);
    assert_eq!(p.status, ParticipationStatus::Assigned);
  }
}

#[tokio::test]
async fn batch_assignment_rejects_roles_from_other_departments() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let kitchen = s.add_department(NewDepartment { name: "Kitchen".into() }).await.unwrap();
  let media = s.add_department(NewDepartment { name: "Media".into() }).await.unwrap();
  s.add_role(role("Camera", media.department_id)).await.unwrap();
  let v = s.add_volunteer(NewVolunteer::named("V")).await.unwrap();

  let err = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v.volunteer_id],
    department_id:  Some(kitchen.department_id),
    assigned_roles: vec!["Camera".into()],
  })
  .await
  .unwrap_err();

  assert!(matches!(err, roster_core::Error::RoleNotInDepartment { .. }));
  assert!(s.list_participations(e.event_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn batch_assignment_rejects_already_assigned_volunteers() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let d = s.add_department(NewDepartment { name: "D".into() }).await.unwrap();
  let v = s.add_volunteer(NewVolunteer::named("V")).await.unwrap();
  s.record_participation(participation(e.event_id, v.volunteer_id))
    .await
    .unwrap();

  let err = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v.volunteer_id],
    department_id:  Some(d.department_id),
    assigned_roles: Vec::new(),
  })
  .await
  .unwrap_err();

  assert!(matches!(err, roster_core::Error::AlreadyAssigned { .. }));
}

#[tokio::test]
async fn editing_an_assignment_keeps_the_volunteer_assigned() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let kitchen = s.add_department(NewDepartment { name: "Kitchen".into() }).await.unwrap();
  let media = s.add_department(NewDepartment { name: "Media".into() }).await.unwrap();
  s.add_role(role("Camera", media.department_id)).await.unwrap();
  let v = s.add_volunteer(NewVolunteer::named("V")).await.unwrap();

  let partition = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v.volunteer_id],
    department_id:  Some(kitchen.department_id),
    assigned_roles: Vec::new(),
  })
  .await
  .unwrap();
  let participation_id = partition.assigned[0].participation_id;

  let updated = update_assignment(&s, participation_id, AssignmentPatch {
    department_id:  media.department_id,
    assigned_roles: vec!["Camera".into()],
  })
  .await
  .unwrap();
  assert_eq!(updated.department_id, Some(media.department_id));

  let reloaded = load_partition(&s, e.event_id).await.unwrap();
  assert!(reloaded.unassigned.is_empty());
  assert_eq!(reloaded.assigned.len(), 1);
  assert_eq!(reloaded.assigned[0].department_name, "Media");
  assert_eq!(reloaded.assigned[0].assigned_roles, vec!["Camera"]);
}

#[tokio::test]
async fn moving_to_another_department_drops_roles_it_does_not_offer() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let kitchen = s.add_department(NewDepartment { name: "Kitchen".into() }).await.unwrap();
  let media = s.add_department(NewDepartment { name: "Media".into() }).await.unwrap();
  s.add_role(role("Cook", kitchen.department_id)).await.unwrap();
  s.add_role(role("Camera", media.department_id)).await.unwrap();
  let v = s.add_volunteer(NewVolunteer::named("V")).await.unwrap();

  let partition = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v.volunteer_id],
    department_id:  Some(kitchen.department_id),
    assigned_roles: vec!["Cook".into()],
  })
  .await
  .unwrap();
  let participation_id = partition.assigned[0].participation_id;

  let err = update_assignment(&s, participation_id, AssignmentPatch {
    department_id:  media.department_id,
    assigned_roles: vec!["Cook".into()],
  })
  .await
  .unwrap_err();
  assert!(matches!(err, roster_core::Error::RoleNotInDepartment { .. }));

  let stored = s.get_participation(participation_id).await.unwrap().unwrap();
  assert_eq!(stored.department_id, Some(kitchen.department_id));
  assert_eq!(stored.assigned_roles, vec!["Cook"]);
}

#[tokio::test]
async fn held_roles_survive_an_edit_within_the_same_department() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let kitchen = s.add_department(NewDepartment { name: "Kitchen".into() }).await.unwrap();
  let cook = s.add_role(role("Cook", kitchen.department_id)).await.unwrap();
  s.add_role(role("Server", kitchen.department_id)).await.unwrap();
  let v = s.add_volunteer(NewVolunteer::named("V")).await.unwrap();

  let partition = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v.volunteer_id],
    department_id:  Some(kitchen.department_id),
    assigned_roles: vec!["Cook".into()],
  })
  .await
  .unwrap();
  let participation_id = partition.assigned[0].participation_id;
  s.delete_role(cook.role_id).await.unwrap();

  let updated = update_assignment(&s, participation_id, AssignmentPatch {
    department_id:  kitchen.department_id,
    assigned_roles: vec!["Cook".into(), "Server".into()],
  })
  .await
  .unwrap();
  assert_eq!(updated.assigned_roles, vec!["Cook", "Server"]);
}

#[tokio::test]
async fn failed_create_keeps_earlier_records_of_the_batch() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let d = s.add_department(NewDepartment { name: "D".into() }).await.unwrap();
  let v1 = s.add_volunteer(NewVolunteer::named("V1")).await.unwrap();
  let v2 = s.add_volunteer(NewVolunteer::named("V2")).await.unwrap();
  let v3 = s.add_volunteer(NewVolunteer::named("V3")).await.unwrap();

  // The second create of the batch fails inside the database.
  s.execute_batch(format!(
    "CREATE TRIGGER reject_v2 BEFORE INSERT ON event_participation
     WHEN NEW.volunteer_id = '{}'
     BEGIN SELECT RAISE(ABORT, 'write rejected'); END;",
    v2.volunteer_id.hyphenated()
  ))
  .await
  .unwrap();

  let err = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v1.volunteer_id, v2.volunteer_id, v3.volunteer_id],
    department_id:  Some(d.department_id),
    assigned_roles: Vec::new(),
  })
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    roster_core::Error::BatchIncomplete { created: 1, requested: 3, .. }
  ));
  assert_eq!(err.to_string(), "failed to assign volunteers");

  let records = s.list_participations(e.event_id).await.unwrap();
  let assigned: Vec<_> = records.iter().map(|p| p.volunteer_id).collect();
  assert_eq!(assigned, vec![v1.volunteer_id]);
}

#[tokio::test]
async fn status_change_leaves_department_and_roles_alone() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  let d = s.add_department(NewDepartment { name: "D".into() }).await.unwrap();
  s.add_role(role("Usher", d.department_id)).await.unwrap();
  let v = s.add_volunteer(NewVolunteer::named("V")).await.unwrap();

  let partition = confirm_batch_assignment(&s, e.event_id, BatchAssignment {
    volunteer_ids:  vec![v.volunteer_id],
    department_id:  Some(d.department_id),
    assigned_roles: vec!["Usher".into()],
  })
  .await
  .unwrap();
  let participation_id = partition.assigned[0].participation_id;

  let updated =
    set_participation_status(&s, participation_id, ParticipationStatus::Unavailable)
      .await
      .unwrap();
  assert_eq!(updated.status, ParticipationStatus::Unavailable);
  assert_eq!(updated.department_id, Some(d.department_id));
  assert_eq!(updated.assigned_roles, vec!["Usher"]);

  // Still assigned for partition purposes.
  let reloaded = load_partition(&s, e.event_id).await.unwrap();
  assert_eq!(reloaded.assigned[0].status, ParticipationStatus::Unavailable);
  assert!(reloaded.unassigned.is_empty());
}

#[tokio::test]
async fn status_change_for_missing_participation_is_not_found() {
  let s = store().await;
  let missing = Uuid::new_v4();
  assert!(
    s.set_participation_status(missing, ParticipationStatus::Withdrawn)
      .await
      .unwrap()
      .is_none()
  );
  let err = set_participation_status(&s, missing, ParticipationStatus::Withdrawn)
    .await
    .unwrap_err();
  assert!(matches!(err, roster_core::Error::ParticipationNotFound(id) if id == missing));
}

// ─── Actions and links ───────────────────────────────────────────────────────

fn action(description: &str, due: Option<NaiveDate>, event_id: Option<Uuid>) -> NewAction {
  NewAction {
    description: description.into(),
    due_date: due,
    event_id,
    ..NewAction::default()
  }
}

#[tokio::test]
async fn global_actions_sort_by_due_date_with_undated_last() {
  let s = store().await;
  s.add_action(action("undated", None, None)).await.unwrap();
  s.add_action(action("soon", NaiveDate::from_ymd_opt(2024, 2, 1), None))
    .await
    .unwrap();
  s.add_action(action("later", NaiveDate::from_ymd_opt(2024, 9, 1), None))
    .await
    .unwrap();

  let order: Vec<_> = s
    .list_actions(None)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.description)
    .collect();
  assert_eq!(order, vec!["later", "soon", "undated"]);
}

#[tokio::test]
async fn event_actions_are_newest_first_and_scoped() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  s.add_action(action("first", None, Some(e.event_id))).await.unwrap();
  s.add_action(action("second", None, Some(e.event_id))).await.unwrap();
  s.add_action(action("elsewhere", None, None)).await.unwrap();

  let listed = s.list_actions(Some(e.event_id)).await.unwrap();
  let order: Vec<_> = listed.iter().map(|a| a.description.as_str()).collect();
  assert_eq!(order, vec!["second", "first"]);
  assert!(listed.iter().all(|a| a.status == ActionStatus::YetToStart));
}

#[tokio::test]
async fn action_for_missing_event_is_rejected() {
  let s = store().await;
  let err = s
    .add_action(action("orphan", None, Some(Uuid::new_v4())))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));
}

#[tokio::test]
async fn links_are_listed_newest_first() {
  let s = store().await;
  let e = s.add_event(NewEvent::named("E")).await.unwrap();
  for name in ["Agenda", "Signup sheet"] {
    s.add_link(e.event_id, NewManualLink {
      name: name.into(),
      url:  format!("https://example.org/{name}"),
    })
    .await
    .unwrap();
  }

  let names: Vec<_> = s
    .list_links(e.event_id)
    .await
    .unwrap()
    .into_iter()
    .map(|l| l.name)
    .collect();
  assert_eq!(names, vec!["Signup sheet", "Agenda"]);
}

// ─── Admin allowlist ─────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_lookup_ignores_case_and_repeats() {
  let s = store().await;
  s.add_admin("Coordinator@Example.org").await.unwrap();
  s.add_admin("coordinator@example.org").await.unwrap();

  assert!(s.is_admin("COORDINATOR@example.ORG").await.unwrap());
  assert!(!s.is_admin("someone@example.org").await.unwrap());
}
