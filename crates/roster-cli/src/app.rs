//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use roster_core::{
  participation::ParticipationStatus,
  roster::{AssignedVolunteer, Partition, RoleOptions, Roster},
  selection::{AssignmentDraft, AssignmentRequest, VolunteerSelection},
  volunteer::Volunteer,
};
use uuid::Uuid;

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Pick the event to assign volunteers to.
  Events,
  /// Unassigned and assigned volunteers of the selected event.
  Assignment,
}

/// Which list has keyboard focus on the assignment screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
  Unassigned,
  Assigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFocus {
  Departments,
  Roles,
}

/// The open department/role modal.
#[derive(Debug, Clone)]
pub struct Modal {
  pub draft:             AssignmentDraft,
  pub focus:             ModalFocus,
  pub department_cursor: usize,
  pub role_cursor:       usize,
  /// Validation or request failure shown inside the modal.
  pub error:             Option<String>,
  /// Title line, e.g. the volunteer being edited.
  pub title:             String,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,
  pub pane:   Pane,

  /// Reference data and the selected event's participations.
  pub roster: Roster,

  /// Partition of the selected event, recomputed after every load.
  pub partition: Option<Partition>,

  /// Unassigned volunteers checked for the next batch.
  pub selection: VolunteerSelection,

  pub event_cursor:      usize,
  /// Cursor within the *filtered* unassigned list.
  pub unassigned_cursor: usize,
  pub assigned_cursor:   usize,

  /// Current fuzzy-filter string over unassigned volunteers.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  pub modal: Option<Modal>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with no data loaded.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::Events,
      pane: Pane::Unassigned,
      roster: Roster::default(),
      partition: None,
      selection: VolunteerSelection::default(),
      event_cursor: 0,
      unassigned_cursor: 0,
      assigned_cursor: 0,
      filter: String::new(),
      filter_active: false,
      modal: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch events, volunteers, departments, and roles.
  pub async fn load_reference(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    let client = &self.client;
    let loaded = tokio::try_join!(
      client.list_volunteers(),
      client.list_events(),
      client.list_departments(),
      client.list_roles(),
    );
    match loaded {
      Ok((volunteers, events, departments, roles)) => {
        let selected = self.roster.selected_event();
        self.roster = Roster::new(volunteers, events, departments, roles);
        self.roster.select_event(selected);
        self.event_cursor = self.event_cursor.min(self.roster.events.len().saturating_sub(1));
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to load reference data");
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Reload the selected event's participations and recompute the partition.
  pub async fn load_participations(&mut self) -> anyhow::Result<()> {
    let Some(event_id) = self.roster.selected_event() else {
      return Ok(());
    };
    self.status_msg = "Loading assignments…".into();
    match self.client.list_participations(event_id).await {
      Ok(records) => {
        if self.roster.set_participations(event_id, records) {
          self.refresh_partition();
        }
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        tracing::error!(event = %event_id, error = %e, "failed to load participations");
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Recompute the partition and drop checks on volunteers no longer
  /// unassigned.
  pub fn refresh_partition(&mut self) {
    self.partition = self.roster.partition().ok();
    if let Some(partition) = &self.partition {
      for orphan in &partition.orphaned {
        tracing::warn!(
          participation = %orphan.participation_id,
          volunteer = %orphan.volunteer_id,
          "participation refers to an unknown volunteer"
        );
      }
      self.selection.retain(|id| !partition.is_assigned(id));
    }
    self.clamp_cursors();
  }

  fn clamp_cursors(&mut self) {
    let unassigned = self.filtered_unassigned().len();
    let assigned = self.assigned().len();
    self.unassigned_cursor = self.unassigned_cursor.min(unassigned.saturating_sub(1));
    self.assigned_cursor = self.assigned_cursor.min(assigned.saturating_sub(1));
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  /// Unassigned volunteers matching the current filter query.
  pub fn filtered_unassigned(&self) -> Vec<&Volunteer> {
    let Some(partition) = &self.partition else {
      return Vec::new();
    };
    if self.filter.is_empty() {
      return partition.unassigned.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    partition
      .unassigned
      .iter()
      .filter(|v| {
        let haystack = format!("{} {} {} {}", v.name, v.kendra, v.city, v.skills);
        matcher.fuzzy_match(&haystack, &self.filter).is_some()
      })
      .collect()
  }

  pub fn assigned(&self) -> &[AssignedVolunteer] {
    self
      .partition
      .as_ref()
      .map(|p| p.assigned.as_slice())
      .unwrap_or_default()
  }

  pub fn cursor_unassigned(&self) -> Option<&Volunteer> {
    self.filtered_unassigned().get(self.unassigned_cursor).copied()
  }

  pub fn cursor_assigned(&self) -> Option<&AssignedVolunteer> {
    self.assigned().get(self.assigned_cursor)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.modal.is_some() {
      self.handle_modal_key(key).await;
      return Ok(true);
    }

    // Filter input mode: all printable keys go into the filter string.
    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }

    match self.screen {
      Screen::Events => self.handle_events_key(key).await,
      Screen::Assignment => self.handle_assignment_key(key).await,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => {}
    }
    self.unassigned_cursor = 0;
  }

  async fn handle_events_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        if self.event_cursor + 1 < self.roster.events.len() {
          self.event_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.event_cursor = self.event_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.roster.events.get(self.event_cursor).map(|e| e.event_id) {
          self.open_event(id).await;
        }
      }

      KeyCode::Char('r') => {
        // Failure is already reported in the status bar.
        let _ = self.load_reference().await;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_assignment_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.close_event(),

      KeyCode::Tab => {
        self.pane = match self.pane {
          Pane::Unassigned => Pane::Assigned,
          Pane::Assigned => Pane::Unassigned,
        };
      }

      KeyCode::Down | KeyCode::Char('j') => match self.pane {
        Pane::Unassigned => {
          if self.unassigned_cursor + 1 < self.filtered_unassigned().len() {
            self.unassigned_cursor += 1;
          }
        }
        Pane::Assigned => {
          if self.assigned_cursor + 1 < self.assigned().len() {
            self.assigned_cursor += 1;
          }
        }
      },
      KeyCode::Up | KeyCode::Char('k') => match self.pane {
        Pane::Unassigned => self.unassigned_cursor = self.unassigned_cursor.saturating_sub(1),
        Pane::Assigned => self.assigned_cursor = self.assigned_cursor.saturating_sub(1),
      },

      KeyCode::Char(' ') if self.pane == Pane::Unassigned => {
        if let Some(id) = self.cursor_unassigned().map(|v| v.volunteer_id) {
          self.selection.toggle(id);
        }
      }

      KeyCode::Char('a') => self.open_create_modal(),
      KeyCode::Enter | KeyCode::Char('e') => match self.pane {
        Pane::Unassigned => self.open_create_modal(),
        Pane::Assigned => self.open_edit_modal(),
      },

      KeyCode::Char('s') if self.pane == Pane::Assigned => self.cycle_status().await,

      KeyCode::Char('/') if self.pane == Pane::Unassigned => {
        self.filter_active = true;
        self.filter.clear();
        self.unassigned_cursor = 0;
      }

      KeyCode::Char('r') => {
        let _ = self.load_participations().await;
      }

      _ => {}
    }
    Ok(true)
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Switch to the assignment screen for `event_id` and load its records.
  async fn open_event(&mut self, event_id: Uuid) {
    self.roster.select_event(Some(event_id));
    self.selection.clear();
    self.partition = self.roster.partition().ok();
    self.filter.clear();
    self.unassigned_cursor = 0;
    self.assigned_cursor = 0;
    self.pane = Pane::Unassigned;
    self.screen = Screen::Assignment;
    let _ = self.load_participations().await;
  }

  fn close_event(&mut self) {
    self.roster.select_event(None);
    self.partition = None;
    self.selection.clear();
    self.filter.clear();
    self.screen = Screen::Events;
  }

  fn open_create_modal(&mut self) {
    let Some(event_id) = self.roster.selected_event() else {
      return;
    };
    match AssignmentDraft::create(event_id, &self.selection) {
      Ok(draft) => {
        let n = self.selection.len();
        self.modal = Some(Modal {
          draft,
          focus: ModalFocus::Departments,
          department_cursor: 0,
          role_cursor: 0,
          error: None,
          title: format!("Assign {n} volunteer{}", if n == 1 { "" } else { "s" }),
        });
      }
      Err(e) => self.status_msg = e.to_string(),
    }
  }

  fn open_edit_modal(&mut self) {
    let Some(assignment) = self.cursor_assigned() else {
      return;
    };
    let draft = AssignmentDraft::edit(assignment);
    let title = format!("Edit assignment: {}", assignment.volunteer.name);
    let department_cursor = draft
      .department()
      .and_then(|d| self.roster.departments.iter().position(|x| x.department_id == d))
      .unwrap_or(0);
    self.modal = Some(Modal {
      draft,
      focus: ModalFocus::Departments,
      department_cursor,
      role_cursor: 0,
      error: None,
      title,
    });
  }

  /// Move the assignment under the cursor to the next status and reload.
  async fn cycle_status(&mut self) {
    let Some((participation_id, status)) = self
      .cursor_assigned()
      .map(|a| (a.participation_id, next_status(a.status)))
    else {
      return;
    };
    match self.client.set_status(participation_id, status).await {
      Ok(_) => {
        if self.load_participations().await.is_ok() {
          self.status_msg = format!("Status set to {status}");
        }
      }
      Err(e) => {
        tracing::error!(participation = %participation_id, error = %e, "status change failed");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Modal ─────────────────────────────────────────────────────────────────

  async fn handle_modal_key(&mut self, key: KeyEvent) {
    let role_count = self.modal_role_options().map_or(0, |o| o.roles().len());
    let department_count = self.roster.departments.len();
    let Some(modal) = self.modal.as_mut() else {
      return;
    };

    match (key.code, modal.focus) {
      (KeyCode::Esc, _) => {
        self.modal = None;
      }
      (KeyCode::Tab, _) => {
        modal.focus = match modal.focus {
          ModalFocus::Departments => ModalFocus::Roles,
          ModalFocus::Roles => ModalFocus::Departments,
        };
      }

      (KeyCode::Down | KeyCode::Char('j'), ModalFocus::Departments) => {
        if modal.department_cursor + 1 < department_count {
          modal.department_cursor += 1;
        }
      }
      (KeyCode::Up | KeyCode::Char('k'), ModalFocus::Departments) => {
        modal.department_cursor = modal.department_cursor.saturating_sub(1);
      }
      (KeyCode::Down | KeyCode::Char('j'), ModalFocus::Roles) => {
        if modal.role_cursor + 1 < role_count {
          modal.role_cursor += 1;
        }
      }
      (KeyCode::Up | KeyCode::Char('k'), ModalFocus::Roles) => {
        modal.role_cursor = modal.role_cursor.saturating_sub(1);
      }

      (KeyCode::Char(' ') | KeyCode::Enter, ModalFocus::Departments) => {
        let department = self
          .roster
          .departments
          .get(modal.department_cursor)
          .map(|d| d.department_id);
        modal.draft.select_department(department);
        modal.role_cursor = 0;
        modal.error = None;
        modal.focus = ModalFocus::Roles;
      }
      (KeyCode::Char(' '), ModalFocus::Roles) => self.toggle_cursor_role(),

      (KeyCode::Enter, ModalFocus::Roles) | (KeyCode::Char('c'), _) => self.submit_modal().await,

      _ => {}
    }
  }

  /// Roles the modal offers for its chosen department, or `None` before a
  /// department is picked.
  pub fn modal_role_options(&self) -> Option<RoleOptions> {
    let department_id = self.modal.as_ref()?.draft.department()?;
    Some(self.roster.role_options(department_id))
  }

  fn toggle_cursor_role(&mut self) {
    let Some(options) = self.modal_role_options() else {
      return;
    };
    let Some(modal) = self.modal.as_mut() else {
      return;
    };
    if let Some(role) = options.roles().get(modal.role_cursor) {
      modal.error = modal.draft.toggle_role(role).err().map(|e| e.to_string());
    }
  }

  /// Confirm the modal: issue the create batch or the update, then reload.
  async fn submit_modal(&mut self) {
    let Some(modal) = self.modal.as_mut() else {
      return;
    };
    let request = match modal.draft.confirm() {
      Ok(request) => request,
      Err(e) => {
        modal.error = Some(e.to_string());
        return;
      }
    };

    let outcome = match &request {
      AssignmentRequest::Batch { event_id, batch } => self
        .client
        .assign(*event_id, batch)
        .await
        .map(|_| format!("Assigned {} volunteer(s)", batch.volunteer_ids.len())),
      AssignmentRequest::Update { participation_id, patch } => self
        .client
        .update_participation(*participation_id, patch)
        .await
        .map(|_| "Assignment updated".to_owned()),
    };

    match outcome {
      Ok(message) => {
        if matches!(request, AssignmentRequest::Batch { .. }) {
          self.selection.clear();
        }
        self.modal = None;
        if self.load_participations().await.is_ok() {
          self.status_msg = message;
        }
      }
      Err(e) => {
        tracing::error!(error = %e, "assignment request failed");
        if let Some(modal) = self.modal.as_mut() {
          modal.error = Some(format!("Error: {e}"));
        }
      }
    }
  }
}

fn next_status(status: ParticipationStatus) -> ParticipationStatus {
  match status {
    ParticipationStatus::Assigned => ParticipationStatus::Withdrawn,
    ParticipationStatus::Withdrawn => ParticipationStatus::Unavailable,
    ParticipationStatus::Unavailable => ParticipationStatus::Assigned,
  }
}
