use serde::{Deserialize, Serialize};
use std::fmt;

/// Portal roles, closed set. Unknown codes coming from storage are a data
/// error and surface as `None` from [`Role::from_code`] rather than a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Citizen,
    Validator,
    Admin,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Citizen => "citizen",
            Validator => "validator",
            Admin => "admin",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "citizen" => Some(Citizen),
            "validator" => Some(Validator),
            "admin" => Some(Admin),
            _ => None,
        }
    }

    /// Validators and admins may work the identity verification queue.
    #[inline]
    pub const fn can_review_applications(&self) -> bool {
        use Role::*;
        matches!(self, Validator | Admin)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_code() {
        assert_eq!(Role::from_code("citizen"), Some(Role::Citizen));
        assert_eq!(Role::from_code("validator"), Some(Role::Validator));
        assert_eq!(Role::from_code("admin"), Some(Role::Admin));
        assert_eq!(Role::from_code("superuser"), None);
        assert_eq!(Role::from_code(""), None);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Citizen.to_string(), "citizen");
        assert_eq!(Role::Validator.to_string(), "validator");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_checks() {
        assert!(!Role::Citizen.can_review_applications());
        assert!(Role::Validator.can_review_applications());
        assert!(Role::Admin.can_review_applications());
        assert!(!Role::Citizen.is_admin());
        assert!(!Role::Validator.is_admin());
        assert!(Role::Admin.is_admin());
    }

    #[test]
    fn test_role_serde_codes() {
        assert_eq!(
            serde_json::to_string(&Role::Validator).unwrap(),
            "\"validator\""
        );
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
