//! Staff roster loaded from environment variables.
//!
//! Identity comes from Discord; this module only decides which Discord users may
//! manage the catalog and ring up sales. The roster is read from
//! `STAFF_USER_IDS` as a comma separated list of user IDs. An empty roster
//! leaves the bot open to everyone.

use std::collections::HashSet;

/// Environment variable holding the comma separated staff user IDs.
pub const STAFF_USER_IDS_VAR: &str = "STAFF_USER_IDS";

/// The set of Discord users allowed to use the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffRoster {
    user_ids: HashSet<String>,
}

impl StaffRoster {
    /// Parses a comma separated list of user IDs, ignoring blanks.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let user_ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { user_ids }
    }

    /// Reads the roster from `STAFF_USER_IDS`. A missing variable yields an open roster.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(STAFF_USER_IDS_VAR)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    /// True when no staff IDs are configured and everyone is permitted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.user_ids.is_empty()
    }

    /// Whether the given Discord user may use the bot.
    #[must_use]
    pub fn permits(&self, user_id: &str) -> bool {
        self.is_open() || self.user_ids.contains(user_id)
    }

    /// Number of configured staff members
    #[must_use]
    pub fn len(&self) -> usize {
        self.user_ids.len()
    }

    /// True when no staff IDs are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_blanks_and_whitespace() {
        let roster = StaffRoster::parse(" 111 , ,222,");
        assert_eq!(roster.len(), 2);
        assert!(roster.permits("111"));
        assert!(roster.permits("222"));
        assert!(!roster.permits("333"));
    }

    #[test]
    fn test_empty_roster_is_open() {
        let roster = StaffRoster::parse("");
        assert!(roster.is_open());
        assert!(roster.permits("anyone"));
    }
}
