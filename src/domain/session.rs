//! The authenticated identity of a request and the role predicates over it.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserRole;

/// Identity produced by the session resolver.
///
/// `real_user_id` is always the id read back from storage, never the
/// subject embedded in the session token.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Session {
    pub real_user_id: Uuid,
    pub user_email: String,
    /// `None` when the stored role is not one we recognise.
    pub user_role: Option<UserRole>,
    pub is_super_admin: bool,
}

/// Something that carries the caller's global role: the session itself, or
/// an organization context resolved from it.
pub trait RoleHolder {
    fn global_role(&self) -> Option<UserRole>;
    fn is_super_admin(&self) -> bool;

    fn has_role(&self, role: UserRole) -> bool {
        self.global_role() == Some(role)
    }
}

impl RoleHolder for Session {
    fn global_role(&self) -> Option<UserRole> {
        self.user_role
    }

    fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }
}

/// True for ADMIN users and super-admins.
pub fn is_admin<R: RoleHolder>(holder: Option<&R>) -> bool {
    holder.is_some_and(|h| h.is_super_admin() || h.has_role(UserRole::Admin))
}

pub fn is_creative<R: RoleHolder>(holder: Option<&R>) -> bool {
    holder.is_some_and(|h| h.has_role(UserRole::Creative))
}

pub fn is_client<R: RoleHolder>(holder: Option<&R>) -> bool {
    holder.is_some_and(|h| h.has_role(UserRole::Client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Option<UserRole>) -> Session {
        Session {
            real_user_id: Uuid::new_v4(),
            user_email: "someone@example.com".to_string(),
            user_role: role,
            is_super_admin: false,
        }
    }

    #[test]
    fn predicates_match_their_role_only() {
        let admin = session(Some(UserRole::Admin));
        let creative = session(Some(UserRole::Creative));
        let client = session(Some(UserRole::Client));

        assert!(is_admin(Some(&admin)));
        assert!(!is_admin(Some(&creative)));
        assert!(is_creative(Some(&creative)));
        assert!(!is_creative(Some(&client)));
        assert!(is_client(Some(&client)));
        assert!(!is_client(Some(&admin)));
    }

    #[test]
    fn missing_role_fails_closed() {
        let unknown = session(None);
        assert!(!is_admin(Some(&unknown)));
        assert!(!is_creative(Some(&unknown)));
        assert!(!is_client(Some(&unknown)));
    }

    #[test]
    fn missing_session_fails_closed() {
        assert!(!is_admin::<Session>(None));
        assert!(!is_creative::<Session>(None));
        assert!(!is_client::<Session>(None));
    }

    #[test]
    fn super_admin_counts_as_admin() {
        let mut s = session(Some(UserRole::Client));
        s.is_super_admin = true;
        assert!(is_admin(Some(&s)));
        assert!(is_client(Some(&s)));
    }
}
