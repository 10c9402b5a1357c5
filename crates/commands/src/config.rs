//! Bot configuration.
//!
//! Loaded once at startup: optional JSON file (`ROLECALL_CONFIG`), then
//! environment overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rolecall_auth::{Permission, PermissionSet};

/// Guild used when none is configured (dev console only).
pub const DEV_GUILD_ID: &str = "dev-guild";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Marker in front of top-level commands (`!role`).
    pub prefix: String,
    /// Chat-platform guild whose roles are reconciled.
    pub guild_id: String,
    /// Permissions any of which allows mutating commands.
    pub admin_permissions: Vec<String>,
    /// Platform roles never mirrored into the directory.
    pub ignored_platform_roles: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            guild_id: String::new(),
            admin_permissions: vec!["role_admins".to_string()],
            ignored_platform_roles: vec!["@everyone".to_string()],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Settings {
    /// Load settings from `ROLECALL_CONFIG` (if set) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match std::env::var_os("ROLECALL_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok());

        if settings.guild_id.is_empty() {
            tracing::warn!("ROLECALL_GUILD_ID not set; using dev guild '{DEV_GUILD_ID}'");
            settings.guild_id = DEV_GUILD_ID.to_string();
        }

        Ok(settings)
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Apply `ROLECALL_*` overrides from a variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("ROLECALL_PREFIX") {
            self.prefix = prefix;
        }
        if let Some(guild) = lookup("ROLECALL_GUILD_ID") {
            self.guild_id = guild;
        }
        if let Some(perms) = lookup("ROLECALL_ADMIN_PERMISSIONS") {
            self.admin_permissions = perms
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    pub fn admin_permission_set(&self) -> PermissionSet {
        self.admin_permissions
            .iter()
            .map(|p| Permission::new(p.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_guard_with_role_admins() {
        let settings = Settings::default();
        assert_eq!(settings.prefix, "!");
        assert_eq!(settings.admin_permission_set().to_string(), "role_admins");
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "guild_id": "42" }"#).unwrap();
        assert_eq!(settings.guild_id, "42");
        assert_eq!(settings.ignored_platform_roles, vec!["@everyone".to_string()]);
    }

    #[test]
    fn env_overrides_win() {
        let mut settings = Settings::default();
        settings.apply_overrides(|key| match key {
            "ROLECALL_PREFIX" => Some(".".to_string()),
            "ROLECALL_ADMIN_PERMISSIONS" => Some("role_admins, sig_admins,".to_string()),
            _ => None,
        });

        assert_eq!(settings.prefix, ".");
        assert_eq!(
            settings.admin_permissions,
            vec!["role_admins".to_string(), "sig_admins".to_string()]
        );
    }
}
