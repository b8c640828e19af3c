//! # Role Permissions
//!
//! Static role → permission table.
//!
//! ```text
//!               Dashboard Billing Products Customers Sales Reports Employees Attendance Settings
//!   Admin          ✓        ✓        ✓         ✓       ✓      ✓        ✓          ✓         ✓
//!   Manager        ✓        ✓        ✓         ✓       ✓      ✓        ✓          ✓
//!   Cashier        ✓        ✓                  ✓
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Role;

/// An area of the back office a role may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Permission {
    Dashboard,
    Billing,
    Products,
    Customers,
    Sales,
    Reports,
    Employees,
    Attendance,
    Settings,
}

const ADMIN: &[Permission] = &[
    Permission::Dashboard,
    Permission::Billing,
    Permission::Products,
    Permission::Customers,
    Permission::Sales,
    Permission::Reports,
    Permission::Employees,
    Permission::Attendance,
    Permission::Settings,
];

const MANAGER: &[Permission] = &[
    Permission::Dashboard,
    Permission::Billing,
    Permission::Products,
    Permission::Customers,
    Permission::Sales,
    Permission::Reports,
    Permission::Employees,
    Permission::Attendance,
];

const CASHIER: &[Permission] = &[
    Permission::Dashboard,
    Permission::Billing,
    Permission::Customers,
];

/// Everything `role` may do.
pub const fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::Manager => MANAGER,
        Role::Cashier => CASHIER,
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_everything() {
        for permission in MANAGER.iter().chain(CASHIER) {
            assert!(has_permission(Role::Admin, *permission));
        }
        assert!(has_permission(Role::Admin, Permission::Settings));
    }

    #[test]
    fn test_cashier_is_limited_to_the_counter() {
        assert!(has_permission(Role::Cashier, Permission::Billing));
        assert!(has_permission(Role::Cashier, Permission::Customers));
        assert!(!has_permission(Role::Cashier, Permission::Products));
        assert!(!has_permission(Role::Cashier, Permission::Attendance));
    }

    #[test]
    fn test_manager_cannot_change_settings() {
        assert!(has_permission(Role::Manager, Permission::Attendance));
        assert!(!has_permission(Role::Manager, Permission::Settings));
    }
}
