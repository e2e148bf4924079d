//! Action tracker items and their list filter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

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
  EnumIter,
)]
pub enum ActionStatus {
  #[serde(rename = "In progress")]
  #[strum(serialize = "In progress")]
  InProgress,
  Completed,
  Suspended,
  #[default]
  #[serde(rename = "Yet to Start")]
  #[strum(serialize = "Yet to Start")]
  YetToStart,
  #[serde(rename = "Not Applicable")]
  #[strum(serialize = "Not Applicable")]
  NotApplicable,
}

impl ActionStatus {
  /// Parse a status label as shown to users, e.g. `"Yet to Start"`.
  pub fn parse(label: &str) -> Result<Self> {
    label
      .trim()
      .parse()
      .map_err(|_| Error::UnknownStatus(label.to_owned()))
  }
}

/// A tracked to-do item, optionally tied to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
  pub action_id:   Uuid,
  pub description: String,
  pub owner_name:  String,
  pub due_date:    Option<NaiveDate>,
  pub status:      ActionStatus,
  pub event_id:    Option<Uuid>,
  /// Set by the store on creation.
  pub assigned_at: DateTime<Utc>,
}

/// Input to [`crate::store::RosterStore::add_action`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewAction {
  pub description: String,
  pub owner_name:  String,
  pub due_date:    Option<NaiveDate>,
  pub status:      ActionStatus,
  pub event_id:    Option<Uuid>,
}

impl NewAction {
  pub fn validate(&self) -> Result<()> {
    if self.description.trim().is_empty() {
      return Err(Error::MissingField("action description"));
    }
    Ok(())
  }

  pub fn into_action(self, action_id: Uuid, assigned_at: DateTime<Utc>) -> Action {
    Action {
      action_id,
      description: self.description,
      owner_name: self.owner_name,
      due_date: self.due_date,
      status: self.status,
      event_id: self.event_id,
      assigned_at,
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Narrowing applied to the action list. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionFilter {
  pub status: Option<ActionStatus>,
  /// Case-insensitive substring of the owner name.
  pub owner:  Option<String>,
}

impl ActionFilter {
  pub fn matches(&self, action: &Action) -> bool {
    if let Some(status) = self.status
      && action.status != status
    {
      return false;
    }
    match self.owner.as_deref().map(str::trim) {
      Some(owner) if !owner.is_empty() => action
        .owner_name
        .to_lowercase()
        .contains(&owner.to_lowercase()),
      _ => true,
    }
  }

  pub fn apply(&self, actions: Vec<Action>) -> Vec<Action> {
    actions.into_iter().filter(|a| self.matches(a)).collect()
  }
}

/// Order for the global tracker: latest due date first, undated last.
pub fn sort_by_due_date(actions: &mut [Action]) {
  actions.sort_by(|a, b| match (a.due_date, b.due_date) {
    (Some(x), Some(y)) => y.cmp(&x),
    (Some(_), None) => std::cmp::Ordering::Less,
    (None, Some(_)) => std::cmp::Ordering::Greater,
    (None, None) => b.assigned_at.cmp(&a.assigned_at),
  });
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  fn action(owner: &str, status: ActionStatus, due: Option<NaiveDate>) -> Action {
    NewAction {
      description: "Book the hall".into(),
      owner_name: owner.into(),
      due_date: due,
      status,
      event_id: None,
    }
    .into_action(Uuid::new_v4(), Utc::now())
  }

  #[test]
  fn status_labels_match_tracker_options() {
    let labels: Vec<String> = ActionStatus::iter().map(|s| s.to_string()).collect();
    assert_eq!(
      labels,
      ["In progress", "Completed", "Suspended", "Yet to Start", "Not Applicable"]
    );
    assert_eq!(NewAction::default().status, ActionStatus::YetToStart);
  }

  #[test]
  fn status_parses_from_its_label() {
    assert_eq!(ActionStatus::parse(" In progress").unwrap(), ActionStatus::InProgress);
    assert!(matches!(
      ActionStatus::parse("done"),
      Err(Error::UnknownStatus(s)) if s == "done"
    ));
  }

  #[test]
  fn filter_combines_status_and_owner() {
    let actions = vec![
      action("Meera Iyer", ActionStatus::Completed, None),
      action("meera k", ActionStatus::InProgress, None),
      action("Arjun", ActionStatus::Completed, None),
    ];

    let by_owner = ActionFilter { status: None, owner: Some("MEERA".into()) };
    assert_eq!(by_owner.apply(actions.clone()).len(), 2);

    let both = ActionFilter {
      status: Some(ActionStatus::Completed),
      owner:  Some("meera".into()),
    };
    let hits = both.apply(actions.clone());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].owner_name, "Meera Iyer");

    assert_eq!(ActionFilter::default().apply(actions).len(), 3);
  }

  #[test]
  fn due_date_sort_puts_latest_first_and_undated_last() {
    let d = |day| NaiveDate::from_ymd_opt(2024, 5, day);
    let mut actions = vec![
      action("a", ActionStatus::YetToStart, d(1)),
      action("b", ActionStatus::YetToStart, None),
      action("c", ActionStatus::YetToStart, d(20)),
    ];
    sort_by_due_date(&mut actions);
    let owners: Vec<&str> = actions.iter().map(|a| a.owner_name.as_str()).collect();
    assert_eq!(owners, ["c", "a", "b"]);
  }

  #[test]
  fn empty_description_is_rejected() {
    assert!(NewAction::default().validate().is_err());
  }
}
