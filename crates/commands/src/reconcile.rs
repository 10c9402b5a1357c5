//! Directory ↔ chat platform reconciliation.
//!
//! Both sides are keyed with [`normalize_name`] and diffed in key order. The
//! internal side is applied first, then the external side. Items are applied
//! one at a time; a duplicate (`RemoteError::AlreadyExists`) means another run
//! got there first and is not reported. Any other item failure is kept and
//! the run continues.
//!
//! Only fetching can abort a run. Nothing is rolled back.

use std::collections::{BTreeMap, BTreeSet};

use rolecall_core::{UserId, normalize_name};
use rolecall_directory::{ChatPlatform, PlatformRole, RemoteError, RemoteResult, ResourceDirectory, Role};

use crate::reply::code_block;
use crate::{Reply, Services};

/// Which collaborator an item was applied to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Internal,
    External,
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::Internal => f.write_str("the directory"),
            Side::External => f.write_str("the chat service"),
        }
    }
}

/// What a run does to each missing item.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncAction {
    CreateRole,
    AddMember,
}

impl SyncAction {
    /// Success line verb (`Created c in ...`).
    pub fn past(&self) -> &'static str {
        match self {
            SyncAction::CreateRole => "Created",
            SyncAction::AddMember => "Added",
        }
    }

    /// Failure line verb (`Failed to create c in ...`).
    pub fn infinitive(&self) -> &'static str {
        match self {
            SyncAction::CreateRole => "create",
            SyncAction::AddMember => "add",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncPhase {
    Fetching,
    Diffing,
    ApplyingToInternal,
    ApplyingToExternal,
    Reporting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// Swallowed duplicate.
    AlreadyPresent,
    Failed(RemoteError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub side: Side,
    pub item: String,
    pub outcome: Outcome,
}

/// Per-item results of one run, in the order they were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    action: SyncAction,
    items: Vec<ItemOutcome>,
}

impl SyncReport {
    fn new(action: SyncAction) -> Self {
        Self {
            action,
            items: Vec::new(),
        }
    }

    pub fn created(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|i| i.outcome == Outcome::Created)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Nothing was created and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.created().next().is_none() && !self.has_failures()
    }

    fn record(&mut self, side: Side, item: String, result: RemoteResult<()>) {
        let outcome = match result {
            Ok(()) => Outcome::Created,
            Err(err) if err.is_already_exists() => {
                tracing::debug!(%side, item = %item, error = %err, "already present");
                Outcome::AlreadyPresent
            }
            Err(err) => {
                tracing::warn!(%side, item = %item, error = %err, "sync item failed");
                Outcome::Failed(err)
            }
        };
        self.items.push(ItemOutcome { side, item, outcome });
    }

    /// One line per creation or failure; fatal when any item failed.
    pub fn into_reply(self) -> Reply {
        if self.is_noop() {
            return Reply::success("Nothing to sync");
        }

        let (past, infinitive) = (self.action.past(), self.action.infinitive());
        let lines: Vec<String> = self
            .items
            .iter()
            .filter_map(|i| match &i.outcome {
                Outcome::Created => Some(format!("{past} {} in {}", i.item, i.side)),
                Outcome::AlreadyPresent => None,
                Outcome::Failed(err) => {
                    Some(format!("Failed to {infinitive} {} in {}: {err}", i.item, i.side))
                }
            })
            .collect();

        if self.has_failures() {
            Reply::fatal(code_block(lines))
        } else {
            Reply::success(code_block(lines))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Diffing
// ─────────────────────────────────────────────────────────────────────────────

/// Roles present on one side only, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDiff {
    /// `(key, display name)` of platform roles missing from the directory.
    pub missing_internally: Vec<(String, String)>,
    /// Short names of directory roles missing from the platform.
    pub missing_externally: Vec<String>,
}

fn external_by_key<'r>(
    external: &'r [PlatformRole],
    ignored: &[String],
) -> BTreeMap<String, &'r PlatformRole> {
    let ignored: BTreeSet<String> = ignored.iter().map(|n| normalize_name(n)).collect();
    let mut keyed = BTreeMap::new();
    for role in external {
        let key = normalize_name(&role.name);
        if key.is_empty() {
            tracing::warn!(id = %role.id, name = %role.name, "skipping platform role with a blank name");
            continue;
        }
        if !ignored.contains(&key) {
            keyed.entry(key).or_insert(role);
        }
    }
    keyed
}

fn internal_by_key(internal: &[Role]) -> BTreeMap<String, &Role> {
    let mut keyed = BTreeMap::new();
    for role in internal {
        let key = normalize_name(&role.short_name);
        if key.is_empty() {
            tracing::warn!(name = %role.name, "skipping directory role with a blank short name");
            continue;
        }
        keyed.entry(key).or_insert(role);
    }
    keyed
}

/// Key both sides and return what each is missing, sorted by key.
///
/// When two roles on the same side share a key, the first one wins. Roles
/// whose name normalizes to nothing are left out on both sides.
pub fn diff_roles(internal: &[Role], external: &[PlatformRole], ignored: &[String]) -> RoleDiff {
    let internal = internal_by_key(internal);
    let external = external_by_key(external, ignored);

    RoleDiff {
        missing_internally: external
            .iter()
            .filter(|(key, _)| !internal.contains_key(*key))
            .map(|(key, role)| (key.clone(), role.name.clone()))
            .collect(),
        missing_externally: internal
            .iter()
            .filter(|(key, _)| !external.contains_key(*key))
            .map(|(_, role)| role.short_name.clone())
            .collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDiff {
    pub missing_internally: Vec<UserId>,
    pub missing_externally: Vec<UserId>,
}

pub fn diff_members(internal: &[UserId], external: &[UserId]) -> MemberDiff {
    let internal: BTreeSet<&UserId> = internal.iter().collect();
    let external: BTreeSet<&UserId> = external.iter().collect();

    MemberDiff {
        missing_internally: external.difference(&internal).map(|u| (*u).clone()).collect(),
        missing_externally: internal.difference(&external).map(|u| (*u).clone()).collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reconciler
// ─────────────────────────────────────────────────────────────────────────────

/// A role present on both sides whose membership is reconciled.
struct MemberPair {
    role: Role,
    platform_name: String,
    diff: MemberDiff,
}

pub struct Reconciler<'a> {
    directory: &'a dyn ResourceDirectory,
    platform: &'a dyn ChatPlatform,
    guild: &'a str,
    ignored: &'a [String],
}

impl<'a> Reconciler<'a> {
    pub fn new(services: &'a Services) -> Self {
        Self {
            directory: services.directory.as_ref(),
            platform: services.platform.as_ref(),
            guild: &services.settings.guild_id,
            ignored: &services.settings.ignored_platform_roles,
        }
    }

    fn enter(&self, phase: SyncPhase) {
        tracing::debug!(?phase, guild = self.guild, "sync phase");
    }

    async fn fetch_roles(&self) -> RemoteResult<(Vec<Role>, Vec<PlatformRole>)> {
        self.enter(SyncPhase::Fetching);

        let external = self.platform.get_all_roles(self.guild).await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to fetch platform roles");
        })?;
        let internal = self.directory.list_roles().await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to fetch directory roles");
        })?;

        Ok((internal, external))
    }

    /// Make both sides hold the same set of role keys.
    pub async fn sync_roles(&self) -> RemoteResult<SyncReport> {
        let (internal, external) = self.fetch_roles().await?;

        self.enter(SyncPhase::Diffing);
        let diff = diff_roles(&internal, &external, self.ignored);

        let mut report = SyncReport::new(SyncAction::CreateRole);

        self.enter(SyncPhase::ApplyingToInternal);
        for (key, display) in diff.missing_internally {
            let result = self.directory.add_role(Role::new(key.as_str(), display)).await;
            report.record(Side::Internal, key, result);
        }

        self.enter(SyncPhase::ApplyingToExternal);
        for short_name in diff.missing_externally {
            let result = self
                .platform
                .create_role(self.guild, &short_name)
                .await
                .map(|_| ());
            report.record(Side::External, short_name, result);
        }

        self.enter(SyncPhase::Reporting);
        tracing::info!(
            created = report.created().count(),
            failed = report.failures().count(),
            "role sync finished"
        );
        Ok(report)
    }

    /// Make every role present on both sides hold the same members.
    ///
    /// Roles bound to the wildcard filter have no membership to reconcile.
    /// Member fetches are part of the fetch phase: one unreadable role (e.g.
    /// `filter_a` names a deleted filter) aborts the whole run before any write.
    pub async fn sync_members(&self) -> RemoteResult<SyncReport> {
        let (internal, external) = self.fetch_roles().await?;

        let external = external_by_key(&external, self.ignored);
        let mut pairs = Vec::new();
        for (key, role) in internal_by_key(&internal) {
            if role.is_wildcard_bound() {
                continue;
            }
            let Some(platform_role) = external.get(&key) else {
                continue;
            };

            let internal_members = self.directory.role_members(&role.short_name).await.inspect_err(
                |err| tracing::warn!(role = %role.short_name, error = %err, "failed to fetch directory members"),
            )?;
            let external_members = self
                .platform
                .role_members(self.guild, &platform_role.name)
                .await
                .inspect_err(
                    |err| tracing::warn!(role = %platform_role.name, error = %err, "failed to fetch platform members"),
                )?;

            pairs.push(MemberPair {
                role: role.clone(),
                platform_name: platform_role.name.clone(),
                diff: diff_members(&internal_members, &external_members),
            });
        }

        self.enter(SyncPhase::Diffing);
        let mut report = SyncReport::new(SyncAction::AddMember);

        self.enter(SyncPhase::ApplyingToInternal);
        for pair in &pairs {
            for user in &pair.diff.missing_internally {
                let result = self
                    .directory
                    .add_members(&pair.role.filter_a, std::slice::from_ref(user))
                    .await;
                report.record(Side::Internal, format!("{user} to {}", pair.role.short_name), result);
            }
        }

        self.enter(SyncPhase::ApplyingToExternal);
        for pair in &pairs {
            for user in &pair.diff.missing_externally {
                let result = self
                    .platform
                    .add_member_role(self.guild, user, &pair.platform_name)
                    .await;
                report.record(Side::External, format!("{user} to {}", pair.platform_name), result);
            }
        }

        self.enter(SyncPhase::Reporting);
        tracing::info!(
            roles = pairs.len(),
            added = report.created().count(),
            failed = report.failures().count(),
            "member sync finished"
        );
        Ok(report)
    }
}
