//! Role/action permission table for CloudVault.
//!
//! Pure capability evaluation over the fixed three-tier role order:
//! owner has {read, write, delete}, editor has {read, write}, viewer has
//! {read}. Anything outside the table denies by default.

use std::fmt;
use std::str::FromStr;

use crate::db::ShareRole;
use crate::{Result, VaultError};

/// Action requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// View metadata or download content.
    Read,
    /// Modify metadata or content.
    Write,
    /// Move to trash or remove.
    Delete,
}

impl Action {
    /// Convert action to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "write" => Ok(Action::Write),
            "delete" => Ok(Action::Delete),
            _ => Err(format!("unknown action: {s}")),
        }
    }
}

/// Whether a role allows an action.
///
/// The match is exhaustive so the table cannot silently drift when a
/// variant is added.
pub fn allows(role: ShareRole, action: Action) -> bool {
    match (role, action) {
        (ShareRole::Owner, Action::Read) => true,
        (ShareRole::Owner, Action::Write) => true,
        (ShareRole::Owner, Action::Delete) => true,
        (ShareRole::Editor, Action::Read) => true,
        (ShareRole::Editor, Action::Write) => true,
        (ShareRole::Editor, Action::Delete) => false,
        (ShareRole::Viewer, Action::Read) => true,
        (ShareRole::Viewer, Action::Write) => false,
        (ShareRole::Viewer, Action::Delete) => false,
    }
}

/// Check that a role allows an action, converting denial into a
/// permission error.
pub fn check_permission(role: ShareRole, action: Action) -> Result<()> {
    if allows(role, action) {
        return Ok(());
    }
    Err(VaultError::Permission(format!(
        "role '{role}' does not allow '{action}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_table_is_exact() {
        let cases = [
            (ShareRole::Owner, Action::Read, true),
            (ShareRole::Owner, Action::Write, true),
            (ShareRole::Owner, Action::Delete, true),
            (ShareRole::Editor, Action::Read, true),
            (ShareRole::Editor, Action::Write, true),
            (ShareRole::Editor, Action::Delete, false),
            (ShareRole::Viewer, Action::Read, true),
            (ShareRole::Viewer, Action::Write, false),
            (ShareRole::Viewer, Action::Delete, false),
        ];

        for (role, action, expected) in cases {
            assert_eq!(allows(role, action), expected, "{role} / {action}");
        }
    }

    #[test]
    fn test_check_permission_denies_with_error() {
        assert!(check_permission(ShareRole::Viewer, Action::Read).is_ok());
        let err = check_permission(ShareRole::Viewer, Action::Delete).unwrap_err();
        assert!(matches!(err, VaultError::Permission(_)));
    }

    #[test]
    fn test_unknown_role_string_fails_closed() {
        // Malformed role strings never parse, so evaluation can't reach
        // the allow table.
        assert!("superuser".parse::<ShareRole>().is_err());
        assert!("".parse::<ShareRole>().is_err());
    }

    #[test]
    fn test_action_round_trip() {
        for action in [Action::Read, Action::Write, Action::Delete] {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!("share".parse::<Action>().is_err());
    }
}
