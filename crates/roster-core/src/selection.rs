//! Selection and modal state for the assignment screen.
//!
//! [`VolunteerSelection`] tracks the unassigned volunteers an operator has
//! checked. [`AssignmentDraft`] is the department/role modal, opened either for
//! a new batch or to edit one existing participation. Confirming a draft
//! yields an [`AssignmentRequest`] ready for [`crate::assign`].

use uuid::Uuid;

use crate::{
  Error, Result,
  assign::BatchAssignment,
  participation::AssignmentPatch,
  role::Role,
  roster::AssignedVolunteer,
};

// ─── Volunteer selection ─────────────────────────────────────────────────────

/// Checked volunteers, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerSelection {
  ids: Vec<Uuid>,
}

impl VolunteerSelection {
  /// Check `id` if unchecked, uncheck it otherwise. Returns whether it is now
  /// checked.
  pub fn toggle(&mut self, id: Uuid) -> bool {
    if let Some(pos) = self.ids.iter().position(|v| *v == id) {
      self.ids.remove(pos);
      false
    } else {
      self.ids.push(id);
      true
    }
  }

  pub fn contains(&self, id: Uuid) -> bool { self.ids.contains(&id) }

  pub fn ids(&self) -> &[Uuid] { &self.ids }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }

  pub fn clear(&mut self) { self.ids.clear(); }

  /// Drop checked ids that `keep` rejects, e.g. volunteers that became
  /// assigned after a reload.
  pub fn retain(&mut self, mut keep: impl FnMut(Uuid) -> bool) {
    self.ids.retain(|id| keep(*id));
  }
}

// ─── Modal draft ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
  /// Assign a batch of currently-unassigned volunteers.
  Create {
    event_id:      Uuid,
    volunteer_ids: Vec<Uuid>,
  },
  /// Edit the department and roles of one participation.
  Edit { participation_id: Uuid },
}

/// The department/role modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
  mode:       DraftMode,
  department: Option<Uuid>,
  roles:      Vec<String>,
}

/// What a confirmed draft asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentRequest {
  Batch {
    event_id: Uuid,
    batch:    BatchAssignment,
  },
  Update {
    participation_id: Uuid,
    patch:            AssignmentPatch,
  },
}

impl AssignmentDraft {
  /// Open the modal for the checked volunteers. Fails if none are checked.
  pub fn create(event_id: Uuid, selection: &VolunteerSelection) -> Result<Self> {
    if selection.is_empty() {
      return Err(Error::NoVolunteersSelected);
    }
    Ok(Self {
      mode:       DraftMode::Create {
        event_id,
        volunteer_ids: selection.ids().to_vec(),
      },
      department: None,
      roles:      Vec::new(),
    })
  }

  /// Open the modal seeded with an existing assignment.
  pub fn edit(assignment: &AssignedVolunteer) -> Self {
    Self {
      mode:       DraftMode::Edit { participation_id: assignment.participation_id },
      department: assignment.department_id,
      roles:      assignment.assigned_roles.clone(),
    }
  }

  pub fn mode(&self) -> &DraftMode { &self.mode }

  pub fn is_edit(&self) -> bool { matches!(self.mode, DraftMode::Edit { .. }) }

  pub fn department(&self) -> Option<Uuid> { self.department }

  pub fn roles(&self) -> &[String] { &self.roles }

  /// Choose a department. Any previously checked roles are cleared, even when
  /// the same department is picked again.
  pub fn select_department(&mut self, department_id: Option<Uuid>) {
    self.department = department_id;
    self.roles.clear();
  }

  /// Check or uncheck `role`. Only roles of the selected department can be
  /// toggled. Returns whether the role is now checked.
  pub fn toggle_role(&mut self, role: &Role) -> Result<bool> {
    let department = self.department.ok_or(Error::NoDepartmentSelected)?;
    if role.department_id != department {
      return Err(Error::RoleNotInDepartment {
        role: role.name.clone(),
        department,
      });
    }
    if let Some(pos) = self.roles.iter().position(|r| *r == role.name) {
      self.roles.remove(pos);
      Ok(false)
    } else {
      self.roles.push(role.name.clone());
      Ok(true)
    }
  }

  pub fn has_role(&self, role_name: &str) -> bool {
    self.roles.iter().any(|r| r == role_name)
  }

  /// Validate the draft and turn it into a request.
  pub fn confirm(&self) -> Result<AssignmentRequest> {
    let department_id = self.department.ok_or(Error::NoDepartmentSelected)?;
    Ok(match &self.mode {
      DraftMode::Create { event_id, volunteer_ids } => AssignmentRequest::Batch {
        event_id: *event_id,
        batch:    BatchAssignment {
          volunteer_ids:  volunteer_ids.clone(),
          department_id:  Some(department_id),
          assigned_roles: self.roles.clone(),
        },
      },
      DraftMode::Edit { participation_id } => AssignmentRequest::Update {
        participation_id: *participation_id,
        patch:            AssignmentPatch {
          department_id,
          assigned_roles: self.roles.clone(),
        },
      },
    })
  }
}
