use serde::{Deserialize, Serialize};

use crate::entities::Role;

/// Identity resolved by the authentication layer before the core is
/// invoked. Passed explicitly into every core entry point; the core never
/// reads caller identity from ambient state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallerContext {
    pub user_id: i32,
    pub business_id: i32,
    pub role: Role,
}

impl CallerContext {
    pub fn new(user_id: i32, business_id: i32, role: Role) -> Self {
        Self {
            user_id,
            business_id,
            role,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Employee)
    }

    /// Whether this caller may act on appointments belonging to `client_id`.
    /// Staff may act on any client in their tenant; clients only on
    /// themselves.
    pub fn can_act_for(&self, client_id: i32) -> bool {
        self.is_staff() || self.user_id == client_id
    }
}
