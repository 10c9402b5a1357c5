//! In-memory collaborators.
//!
//! Intended for tests/dev. Every call is recorded (`"<operation> <target>"`)
//! and failures can be injected per operation and target, so tests can assert
//! which remote calls a command did (or did not) issue.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, RwLock};

use rolecall_core::{Entity, UserId};

use crate::{
    ChatPlatform, Filter, PlatformRole, RemoteError, RemoteResult, ResourceDirectory, Role,
    RoleKey, Rule,
};

/// Target matching every call of an operation in [`InMemoryDirectory::fail_on`].
pub const ANY_TARGET: &str = "*";

fn poisoned<T>(_: T) -> RemoteError {
    RemoteError::transport("lock poisoned")
}

#[derive(Debug, Default)]
struct CallRecorder {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<(String, String), RemoteError>>,
}

impl CallRecorder {
    /// Records the call and returns the injected failure for it, if any.
    fn enter(&self, op: &str, target: &str) -> RemoteResult<()> {
        let entry = if target.is_empty() {
            op.to_string()
        } else {
            format!("{op} {target}")
        };
        self.calls.lock().map_err(poisoned)?.push(entry);

        let failures = self.failures.lock().map_err(poisoned)?;
        let injected = failures
            .get(&(op.to_string(), target.to_string()))
            .or_else(|| failures.get(&(op.to_string(), ANY_TARGET.to_string())));

        match injected {
            Some(err) => {
                tracing::debug!(op, target, error = %err, "injected failure");
                Err(err.clone())
            }
            None => Ok(()),
        }
    }

    fn fail_on(&self, op: &str, target: &str, err: RemoteError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert((op.to_string(), target.to_string()), err);
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource directory
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct DirectoryState {
    roles: BTreeMap<String, Role>,
    filters: BTreeMap<String, Filter>,
    members: BTreeMap<String, BTreeSet<UserId>>,
    rules: BTreeMap<String, Rule>,
    /// Overrides the advertised `role_keys` (all [`RoleKey`]s when unset).
    role_keys: Option<Vec<String>>,
}

/// In-memory resource directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
    recorder: CallRecorder,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a role without recording a call.
    pub fn with_role(self, role: Role) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.roles.insert(role.key().to_string(), role);
        }
        self
    }

    /// Seed a filter and its members without recording a call.
    pub fn with_filter(self, name: &str, description: &str, members: &[&str]) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.filters.insert(
                name.to_string(),
                Filter {
                    name: name.to_string(),
                    description: description.to_string(),
                },
            );
            state
                .members
                .insert(name.to_string(), members.iter().map(|m| UserId::from(*m)).collect());
        }
        self
    }

    /// Seed a rule without recording a call.
    pub fn with_rule(self, rule: Rule) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.rules.insert(rule.key().to_string(), rule);
        }
        self
    }

    /// Advertise only `keys` from `role_keys`.
    pub fn with_role_keys(self, keys: &[&str]) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.role_keys = Some(keys.iter().map(|k| k.to_string()).collect());
        }
        self
    }

    /// Make `op` fail with `err` when called on `target` ([`ANY_TARGET`] for all).
    pub fn fail_on(&self, op: &str, target: &str, err: RemoteError) {
        self.recorder.fail_on(op, target, err);
    }

    /// Every call issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }

    /// Short names of the roles currently stored (sorted).
    pub fn role_names(&self) -> Vec<String> {
        self.state
            .read()
            .map(|s| s.roles.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn members_of(state: &DirectoryState, filter: &str) -> RemoteResult<Vec<UserId>> {
        if !state.filters.contains_key(filter) {
            return Err(RemoteError::not_found(format!("filter '{filter}'")));
        }
        Ok(state
            .members
            .get(filter)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl ResourceDirectory for InMemoryDirectory {
    async fn list_roles(&self) -> RemoteResult<Vec<Role>> {
        self.recorder.enter("list_roles", "")?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.roles.values().cloned().collect())
    }

    async fn get_role(&self, short_name: &str) -> RemoteResult<Role> {
        self.recorder.enter("get_role", short_name)?;
        let state = self.state.read().map_err(poisoned)?;
        state
            .roles
            .get(short_name)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("role '{short_name}'")))
    }

    async fn add_role(&self, role: Role) -> RemoteResult<()> {
        self.recorder.enter("add_role", role.key())?;
        let mut state = self.state.write().map_err(poisoned)?;
        if state.roles.contains_key(role.key()) {
            return Err(RemoteError::already_exists(format!("role '{}'", role.key())));
        }
        state.roles.insert(role.key().to_string(), role);
        Ok(())
    }

    async fn remove_role(&self, short_name: &str) -> RemoteResult<()> {
        self.recorder.enter("remove_role", short_name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .roles
            .remove(short_name)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("role '{short_name}'")))
    }

    async fn set_role(&self, short_name: &str, key: &str, value: &str) -> RemoteResult<()> {
        self.recorder.enter("set_role", short_name)?;
        let key: RoleKey = key.parse()?;
        let mut state = self.state.write().map_err(poisoned)?;
        let role = state
            .roles
            .get_mut(short_name)
            .ok_or_else(|| RemoteError::not_found(format!("role '{short_name}'")))?;
        role.set(key, value)
    }

    async fn role_keys(&self) -> RemoteResult<Vec<String>> {
        self.recorder.enter("role_keys", "")?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(match &state.role_keys {
            Some(keys) => keys.clone(),
            None => RoleKey::ALL.iter().map(|k| k.as_str().to_string()).collect(),
        })
    }

    async fn role_members(&self, short_name: &str) -> RemoteResult<Vec<UserId>> {
        self.recorder.enter("role_members", short_name)?;
        let state = self.state.read().map_err(poisoned)?;
        let role = state
            .roles
            .get(short_name)
            .ok_or_else(|| RemoteError::not_found(format!("role '{short_name}'")))?;
        if role.is_wildcard_bound() {
            return Err(RemoteError::invalid(format!(
                "role '{short_name}' is bound to the wildcard filter"
            )));
        }
        Self::members_of(&state, &role.filter_a)
    }

    async fn user_roles(&self, user: &UserId) -> RemoteResult<Vec<Role>> {
        self.recorder.enter("user_roles", user.as_str())?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .roles
            .values()
            .filter(|role| {
                state
                    .members
                    .get(&role.filter_a)
                    .is_some_and(|members| members.contains(user))
            })
            .cloned()
            .collect())
    }

    async fn list_filters(&self) -> RemoteResult<Vec<Filter>> {
        self.recorder.enter("list_filters", "")?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.filters.values().cloned().collect())
    }

    async fn get_filter(&self, name: &str) -> RemoteResult<Filter> {
        self.recorder.enter("get_filter", name)?;
        let state = self.state.read().map_err(poisoned)?;
        state
            .filters
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("filter '{name}'")))
    }

    async fn add_filter(&self, filter: Filter) -> RemoteResult<()> {
        self.recorder.enter("add_filter", filter.key())?;
        let mut state = self.state.write().map_err(poisoned)?;
        if state.filters.contains_key(filter.key()) {
            return Err(RemoteError::already_exists(format!("filter '{}'", filter.key())));
        }
        state.members.insert(filter.key().to_string(), BTreeSet::new());
        state.filters.insert(filter.key().to_string(), filter);
        Ok(())
    }

    async fn remove_filter(&self, name: &str) -> RemoteResult<()> {
        self.recorder.enter("remove_filter", name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        if state.filters.remove(name).is_none() {
            return Err(RemoteError::not_found(format!("filter '{name}'")));
        }
        state.members.remove(name);
        Ok(())
    }

    async fn list_members(&self, filter: &str) -> RemoteResult<Vec<UserId>> {
        self.recorder.enter("list_members", filter)?;
        let state = self.state.read().map_err(poisoned)?;
        Self::members_of(&state, filter)
    }

    async fn add_members(&self, filter: &str, users: &[UserId]) -> RemoteResult<()> {
        self.recorder.enter("add_members", filter)?;
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.filters.contains_key(filter) {
            return Err(RemoteError::not_found(format!("filter '{filter}'")));
        }
        let members = state.members.entry(filter.to_string()).or_default();
        let added = users.iter().filter(|u| members.insert((*u).clone())).count();
        if added == 0 && !users.is_empty() {
            return Err(RemoteError::already_exists(format!("membership in '{filter}'")));
        }
        Ok(())
    }

    async fn remove_members(&self, filter: &str, users: &[UserId]) -> RemoteResult<()> {
        self.recorder.enter("remove_members", filter)?;
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.filters.contains_key(filter) {
            return Err(RemoteError::not_found(format!("filter '{filter}'")));
        }
        let members = state.members.entry(filter.to_string()).or_default();
        let removed = users.iter().filter(|u| members.remove(*u)).count();
        if removed == 0 && !users.is_empty() {
            return Err(RemoteError::not_found(format!("membership in '{filter}'")));
        }
        Ok(())
    }

    async fn list_rules(&self) -> RemoteResult<Vec<Rule>> {
        self.recorder.enter("list_rules", "")?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.rules.values().cloned().collect())
    }

    async fn get_rule(&self, name: &str) -> RemoteResult<Rule> {
        self.recorder.enter("get_rule", name)?;
        let state = self.state.read().map_err(poisoned)?;
        state
            .rules
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("rule '{name}'")))
    }

    async fn add_rule(&self, rule: Rule) -> RemoteResult<()> {
        self.recorder.enter("add_rule", &rule.name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        if state.rules.contains_key(&rule.name) {
            return Err(RemoteError::already_exists(format!("rule '{}'", rule.name)));
        }
        if !state.roles.contains_key(&rule.role) {
            return Err(RemoteError::not_found(format!("role '{}'", rule.role)));
        }
        if !state.filters.contains_key(&rule.filter) {
            return Err(RemoteError::not_found(format!("filter '{}'", rule.filter)));
        }
        state.rules.insert(rule.key().to_string(), rule);
        Ok(())
    }

    async fn remove_rule(&self, name: &str) -> RemoteResult<()> {
        self.recorder.enter("remove_rule", name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .rules
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("rule '{name}'")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat platform
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Guild {
    roles: Vec<PlatformRole>,
    members: BTreeMap<String, BTreeSet<UserId>>,
}

#[derive(Debug, Default)]
struct PlatformState {
    guilds: BTreeMap<String, Guild>,
    next_id: u64,
}

impl PlatformState {
    fn create(&mut self, guild: &str, name: &str) -> RemoteResult<PlatformRole> {
        self.next_id += 1;
        let id = self.next_id.to_string();
        let guild = self.guilds.entry(guild.to_string()).or_default();
        if guild.roles.iter().any(|r| r.key() == name) {
            return Err(RemoteError::already_exists(format!("platform role '{name}'")));
        }
        let role = PlatformRole {
            id,
            name: name.to_string(),
        };
        guild.roles.push(role.clone());
        Ok(role)
    }
}

/// In-memory chat platform (guilds are created on first use).
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    state: RwLock<PlatformState>,
    recorder: CallRecorder,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a role (with members) without recording a call.
    pub fn with_role(self, guild: &str, name: &str, members: &[&str]) -> Self {
        if let Ok(mut state) = self.state.write() {
            if state.create(guild, name).is_ok() {
                let guild = state.guilds.entry(guild.to_string()).or_default();
                guild
                    .members
                    .insert(name.to_string(), members.iter().map(|m| UserId::from(*m)).collect());
            }
        }
        self
    }

    /// Make `op` fail with `err` when called on `target` ([`ANY_TARGET`] for all).
    pub fn fail_on(&self, op: &str, target: &str, err: RemoteError) {
        self.recorder.fail_on(op, target, err);
    }

    /// Every call issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }

    /// Names of the roles currently in `guild`, in creation order.
    pub fn role_names(&self, guild: &str) -> Vec<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| {
                s.guilds
                    .get(guild)
                    .map(|g| g.roles.iter().map(|r| r.name.clone()).collect())
            })
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ChatPlatform for InMemoryPlatform {
    async fn get_all_roles(&self, guild: &str) -> RemoteResult<Vec<PlatformRole>> {
        self.recorder.enter("get_all_roles", guild)?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .guilds
            .get(guild)
            .map(|g| g.roles.clone())
            .unwrap_or_default())
    }

    async fn create_role(&self, guild: &str, name: &str) -> RemoteResult<PlatformRole> {
        self.recorder.enter("create_role", name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        state.create(guild, name)
    }

    async fn delete_role(&self, guild: &str, name: &str) -> RemoteResult<()> {
        self.recorder.enter("delete_role", name)?;
        let mut state = self.state.write().map_err(poisoned)?;
        let guild = state
            .guilds
            .get_mut(guild)
            .ok_or_else(|| RemoteError::not_found(format!("guild '{guild}'")))?;
        let before = guild.roles.len();
        guild.roles.retain(|r| r.name != name);
        if guild.roles.len() == before {
            return Err(RemoteError::not_found(format!("platform role '{name}'")));
        }
        guild.members.remove(name);
        Ok(())
    }

    async fn role_members(&self, guild: &str, role: &str) -> RemoteResult<Vec<UserId>> {
        self.recorder.enter("role_members", role)?;
        let state = self.state.read().map_err(poisoned)?;
        let guild = state
            .guilds
            .get(guild)
            .ok_or_else(|| RemoteError::not_found(format!("guild '{guild}'")))?;
        if !guild.roles.iter().any(|r| r.key() == role) {
            return Err(RemoteError::not_found(format!("platform role '{role}'")));
        }
        Ok(guild
            .members
            .get(role)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_member_role(&self, guild: &str, user: &UserId, role: &str) -> RemoteResult<()> {
        self.recorder.enter("add_member_role", &format!("{role} {user}"))?;
        let mut state = self.state.write().map_err(poisoned)?;
        let guild = state
            .guilds
            .get_mut(guild)
            .ok_or_else(|| RemoteError::not_found(format!("guild '{guild}'")))?;
        if !guild.roles.iter().any(|r| r.key() == role) {
            return Err(RemoteError::not_found(format!("platform role '{role}'")));
        }
        if !guild.members.entry(role.to_string()).or_default().insert(user.clone()) {
            return Err(RemoteError::already_exists(format!("'{user}' in '{role}'")));
        }
        Ok(())
    }
}
