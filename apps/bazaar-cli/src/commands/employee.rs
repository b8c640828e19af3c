//! # Employee Commands
//!
//! Staff records and the role permission table.

use bazaar_core::permissions::{role_permissions, Permission};
use bazaar_core::{Employee, EmployeeStatus, Role};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, EmployeeInput};

/// What a role may open.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

pub async fn list_employees(state: &AppState) -> Result<Vec<Employee>, ApiError> {
    debug!("list_employees command");
    let pos = state.pos.read().await;
    Ok(pos.employees().to_vec())
}

pub async fn add_employee(state: &AppState, input: EmployeeInput) -> Result<Employee, ApiError> {
    debug!(role = ?input.role, "add_employee command");
    let mut pos = state.pos.write().await;
    Ok(pos.add_employee(input).await?)
}

pub async fn update_employee(
    state: &AppState,
    id: &str,
    input: EmployeeInput,
) -> Result<Employee, ApiError> {
    debug!(id = %id, "update_employee command");
    let mut pos = state.pos.write().await;
    Ok(pos.update_employee(id, input).await?)
}

/// Sets today's status; `active = false` takes the employee off the roster.
pub async fn set_employee_status(
    state: &AppState,
    id: &str,
    status: EmployeeStatus,
    active: bool,
) -> Result<Employee, ApiError> {
    debug!(id = %id, ?status, active, "set_employee_status command");
    let mut pos = state.pos.write().await;
    Ok(pos.set_employee_status(id, status, active).await?)
}

/// The permission table for one role, or all three.
pub fn permissions(role: Option<Role>) -> Vec<RolePermissions> {
    let roles = match role {
        Some(role) => vec![role],
        None => vec![Role::Admin, Role::Manager, Role::Cashier],
    };
    roles
        .into_iter()
        .map(|role| RolePermissions {
            role,
            permissions: role_permissions(role).to_vec(),
        })
        .collect()
}
