//! Departments and the roles they scope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, volunteer::split_list};

/// Organisational grouping that scopes roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
  pub department_id: Uuid,
  pub name:          String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
  pub name: String,
}

impl NewDepartment {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("department name"));
    }
    Ok(())
  }
}

/// A named responsibility within a department.
///
/// Participations refer to roles by `name`, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  pub role_id:          Uuid,
  pub name:             String,
  pub department_id:    Uuid,
  pub category:         String,
  pub responsibilities: String,
  pub comments:         String,
  pub preferred_skills: Vec<String>,
  pub time_commitment:  String,
}

/// Input to [`crate::store::RosterStore::add_role`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewRole {
  pub name:             String,
  pub department_id:    Option<Uuid>,
  pub category:         String,
  pub responsibilities: String,
  pub comments:         String,
  /// Comma-separated, as typed into the form.
  pub preferred_skills: String,
  pub time_commitment:  String,
}

impl NewRole {
  /// Check required fields, returning the department the role belongs to.
  pub fn validate(&self) -> Result<Uuid> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("role name"));
    }
    self.department_id.ok_or(Error::NoDepartmentSelected)
  }

  /// Check required fields and build the stored record.
  pub fn into_role(self, role_id: Uuid) -> Result<Role> {
    let department_id = self.validate()?;
    let preferred_skills = split_list(&self.preferred_skills)
      .into_iter()
      .map(str::to_owned)
      .collect();
    Ok(Role {
      role_id,
      name: self.name,
      department_id,
      category: self.category,
      responsibilities: self.responsibilities,
      comments: self.comments,
      preferred_skills,
      time_commitment: self.time_commitment,
    })
  }
}

/// A role together with its owning department's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleListing {
  #[serde(flatten)]
  pub role:            Role,
  pub department_name: String,
}

/// Pair each role with its department name, or `"Unknown"` if the department
/// is gone.
pub fn list_with_departments(
  roles: &[Role],
  departments: &[Department],
) -> Vec<RoleListing> {
  roles
    .iter()
    .map(|role| RoleListing {
      role:            role.clone(),
      department_name: departments
        .iter()
        .find(|d| d.department_id == role.department_id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| "Unknown".to_owned()),
    })
    .collect()
}
