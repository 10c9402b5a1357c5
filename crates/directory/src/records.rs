//! Records owned by the collaborators.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use rolecall_core::Entity;

use crate::RemoteError;

/// Kind assigned to roles that mirror a chat-platform role.
pub const DEFAULT_ROLE_KIND: &str = "discord";

/// Filter name meaning "no membership restriction".
pub const WILDCARD_FILTER: &str = "wildcard";

/// A role in the internal resource directory, keyed by `short_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub short_name: String,
    pub kind: String,
    /// Display name (the name used on the chat platform).
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: i32,
    pub mentionable: bool,
    pub joinable: bool,
    pub sig: bool,
    /// Filter whose members hold this role.
    pub filter_a: String,
    pub filter_b: String,
}

impl Role {
    /// A plain (non-SIG) platform role bound to the wildcard filters.
    pub fn new(short_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            kind: DEFAULT_ROLE_KIND.to_string(),
            name: name.into(),
            color: 0,
            hoist: false,
            position: 0,
            mentionable: false,
            joinable: false,
            sig: false,
            filter_a: WILDCARD_FILTER.to_string(),
            filter_b: WILDCARD_FILTER.to_string(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_a = filter.into();
        self
    }

    pub fn is_wildcard_bound(&self) -> bool {
        self.filter_a == WILDCARD_FILTER
    }

    /// Applies a `set <key> <value>` update.
    pub fn set(&mut self, key: RoleKey, value: &str) -> Result<(), RemoteError> {
        let bad = |what: &str| RemoteError::invalid(format!("{key} expects {what}, got '{value}'"));
        match key {
            RoleKey::Name => self.name = value.to_string(),
            RoleKey::Color => {
                let hex = value.trim_start_matches('#');
                self.color = u32::from_str_radix(hex, 16).map_err(|_| bad("a hex color"))?;
            }
            RoleKey::Hoist => self.hoist = parse_bool(value).ok_or_else(|| bad("a boolean"))?,
            RoleKey::Position => self.position = value.parse().map_err(|_| bad("an integer"))?,
            RoleKey::Mentionable => {
                self.mentionable = parse_bool(value).ok_or_else(|| bad("a boolean"))?
            }
            RoleKey::Joinable => self.joinable = parse_bool(value).ok_or_else(|| bad("a boolean"))?,
            RoleKey::FilterA => self.filter_a = value.to_string(),
            RoleKey::FilterB => self.filter_b = value.to_string(),
        }
        Ok(())
    }
}

impl Entity for Role {
    fn key(&self) -> &str {
        &self.short_name
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Role attributes that may be changed with `set`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoleKey {
    Name,
    Color,
    Hoist,
    Position,
    Mentionable,
    Joinable,
    FilterA,
    FilterB,
}

impl RoleKey {
    pub const ALL: [RoleKey; 8] = [
        RoleKey::Name,
        RoleKey::Color,
        RoleKey::Hoist,
        RoleKey::Position,
        RoleKey::Mentionable,
        RoleKey::Joinable,
        RoleKey::FilterA,
        RoleKey::FilterB,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKey::Name => "Name",
            RoleKey::Color => "Color",
            RoleKey::Hoist => "Hoist",
            RoleKey::Position => "Position",
            RoleKey::Mentionable => "Mentionable",
            RoleKey::Joinable => "Joinable",
            RoleKey::FilterA => "FilterA",
            RoleKey::FilterB => "FilterB",
        }
    }
}

impl core::fmt::Display for RoleKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKey {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RemoteError::invalid(format!("unknown role key '{s}'")))
    }
}

/// A named membership group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub description: String,
}

impl Entity for Filter {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Binds a role to the members of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub role: String,
    pub filter: String,
}

impl Entity for Rule {
    fn key(&self) -> &str {
        &self.name
    }
}

/// A role as the chat platform knows it, keyed by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRole {
    pub id: String,
    pub name: String,
}

impl Entity for PlatformRole {
    fn key(&self) -> &str {
        &self.name
    }
}
