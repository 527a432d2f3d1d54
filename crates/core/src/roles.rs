//! Well-known operator role name constants.
//!
//! These must match the role strings issued by the backend at login.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_STAFF: &str = "staff";

/// Whether an operator with `role` may check tickets in.
///
/// Comparison is case-insensitive; customers and unknown roles are refused.
pub fn can_check_in(role: &str) -> bool {
    [ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF]
        .iter()
        .any(|r| r.eq_ignore_ascii_case(role.trim()))
}
