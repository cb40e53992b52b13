use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Access class of an account.
///
/// Students may browse and download documents; admins may additionally
/// upload and delete them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Student, Role::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Admin => "Admin",
        }
    }

    /// Parses the exact stored spelling. Matching is case-sensitive, the
    /// same as every other credential field.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Student" => Some(Role::Student),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| Error::BadRequest(format!("unknown role: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(Role::parse("Student"), Some(Role::Student));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_display_matches_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_role_from_str_error() {
        let err = "Guest".parse::<Role>().unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
