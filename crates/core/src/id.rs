//! Strongly-typed identifiers used across the bot.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Separator between the platform tag and the user id in a caller identity.
pub const IDENTITY_DELIMITER: char = ':';

/// Identifier of a chat user (opaque, platform-assigned).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accepts either a raw id (`1234`) or a mention (`<@1234>`, `<@!1234>`).
    pub fn from_mention_or_raw(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let id = match trimmed.strip_prefix("<@").and_then(|s| s.strip_suffix('>')) {
            Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
            None => trimmed,
        };

        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(DomainError::validation(format!("invalid user '{input}'")));
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identity of the caller of a command: `<platform>:<user-id>`.
///
/// The identity string is produced by the chat gateway and is never trusted
/// for authorization on its own; it only names who the permission service
/// is asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity {
    platform: String,
    user_id: UserId,
}

impl CallerIdentity {
    pub fn new(platform: impl Into<String>, user_id: UserId) -> Self {
        Self {
            platform: platform.into(),
            user_id,
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl core::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}{}", self.platform, IDENTITY_DELIMITER, self.user_id)
    }
}

impl FromStr for CallerIdentity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (platform, user) = s.split_once(IDENTITY_DELIMITER).ok_or_else(|| {
            DomainError::malformed_identity(format!("'{s}' has no '{IDENTITY_DELIMITER}' delimiter"))
        })?;

        if user.is_empty() {
            return Err(DomainError::malformed_identity(format!("'{s}' has an empty user id")));
        }

        Ok(Self::new(platform, UserId::new(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_and_user() {
        let caller: CallerIdentity = "discord:1234".parse().unwrap();
        assert_eq!(caller.platform(), "discord");
        assert_eq!(caller.user_id().as_str(), "1234");
        assert_eq!(caller.to_string(), "discord:1234");
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let caller: CallerIdentity = "slack:T01:U02".parse().unwrap();
        assert_eq!(caller.platform(), "slack");
        assert_eq!(caller.user_id().as_str(), "T01:U02");
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let err = "discord1234".parse::<CallerIdentity>().unwrap_err();
        assert!(matches!(err, DomainError::MalformedIdentity(_)));
    }

    #[test]
    fn empty_user_is_malformed() {
        let err = "discord:".parse::<CallerIdentity>().unwrap_err();
        assert!(matches!(err, DomainError::MalformedIdentity(_)));
    }

    #[test]
    fn user_id_accepts_mentions() {
        assert_eq!(UserId::from_mention_or_raw("<@42>").unwrap().as_str(), "42");
        assert_eq!(UserId::from_mention_or_raw("<@!42>").unwrap().as_str(), "42");
        assert_eq!(UserId::from_mention_or_raw("42").unwrap().as_str(), "42");
        assert!(UserId::from_mention_or_raw("<@>").is_err());
    }
}
