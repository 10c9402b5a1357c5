use std::sync::Arc;

use rolecall_auth::{Permission, StaticPermissions};
use rolecall_commands::{Dispatcher, Services, Settings, build_dispatcher};
use rolecall_core::UserId;
use rolecall_directory::{
    InMemoryDirectory, InMemoryPlatform, RemoteError, ResourceDirectory, Role, Rule,
    in_memory::ANY_TARGET,
};

const GUILD: &str = "g";
const ADMIN: &str = "discord:1";
const STRANGER: &str = "discord:2";

struct TestBot {
    dispatcher: Dispatcher,
    services: Services,
    directory: Arc<InMemoryDirectory>,
    platform: Arc<InMemoryPlatform>,
    permissions: Arc<StaticPermissions>,
}

impl TestBot {
    fn new(directory: InMemoryDirectory, platform: InMemoryPlatform) -> Self {
        let settings = Settings {
            guild_id: GUILD.to_string(),
            ..Settings::default()
        };

        let directory = Arc::new(directory);
        let platform = Arc::new(platform);
        let permissions = Arc::new(StaticPermissions::new());
        permissions.grant(UserId::from("1"), [Permission::new("role_admins")]);

        let dispatcher = build_dispatcher(&settings).unwrap();
        let services = Services::new(
            directory.clone(),
            platform.clone(),
            permissions.clone(),
            settings,
        );

        Self {
            dispatcher,
            services,
            directory,
            platform,
            permissions,
        }
    }

    fn empty() -> Self {
        Self::new(InMemoryDirectory::new(), InMemoryPlatform::new())
    }

    async fn run(&self, sender: &str, text: &str) -> String {
        self.dispatcher.handle_text(&self.services, sender, text).await
    }

    fn no_remote_calls(&self) -> bool {
        self.directory.calls().is_empty() && self.platform.calls().is_empty()
    }
}

/// Directory holds roles `a` and `b`; the platform holds `b` and `c`.
fn drifted() -> TestBot {
    TestBot::new(
        InMemoryDirectory::new()
            .with_role(Role::new("a", "a"))
            .with_role(Role::new("b", "b")),
        InMemoryPlatform::new()
            .with_role(GUILD, "b", &[])
            .with_role(GUILD, "c", &[]),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Routing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_subcommand_is_a_warning_without_remote_calls() {
    let bot = TestBot::empty();

    let reply = bot.run(ADMIN, "!role bogus").await;

    assert_eq!(reply, ":warning: Not a valid subcommand: bogus");
    assert!(bot.no_remote_calls());
    assert_eq!(bot.permissions.calls(), 0);
}

#[tokio::test]
async fn unknown_command_is_a_warning() {
    let bot = TestBot::empty();

    assert_eq!(bot.run(ADMIN, "!roles list").await, ":warning: Not a valid command: !roles");
    assert!(bot.no_remote_calls());
}

#[tokio::test]
async fn bare_command_and_help_list_subcommands() {
    let bot = TestBot::empty();

    let bare = bot.run(ADMIN, "!role").await;
    assert_eq!(bare, bot.run(ADMIN, "!role help").await);
    assert!(bare.starts_with(":white_check_mark: ```Usage: !role <subcommand> <arguments>"));
    assert!(bare.contains("\nAdministrate Roles, Rules and Filters\n"));
    assert!(bare.contains("\tcreate: Add Role\n"));
    assert!(bare.contains("\tsync: Sync Roles to chat service\n"));

    let create = bare.find("create:").unwrap();
    let sync = bare.find("sync:").unwrap();
    assert!(create < sync);

    let filter_help = bot.run(ADMIN, "!filter help").await;
    assert!(filter_help.contains("\tadd_member: Add Filter Member\n"));
    assert!(bot.no_remote_calls());
}

// ─────────────────────────────────────────────────────────────────────────────
// Arity and authorization
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn short_arity_is_usage_with_zero_calls() {
    let bot = TestBot::empty();

    let cases = [
        ("!role create fc", ":warning: Usage: !role create <role_name> <filter> <role_description>"),
        ("!role destroy", ":warning: Usage: !role destroy <role_name>"),
        ("!role info a b", ":warning: Usage: !role info <role_name>"),
        ("!role list everything", ":warning: Usage: !role list [all]"),
        ("!filter create logi", ":warning: Usage: !filter create <filter_name> <filter_description>"),
        ("!filter add_member 5", ":warning: Usage: !filter add_member <user> <filter_name>"),
        ("!rule create r fc", ":warning: Usage: !rule create <rule_name> <role_name> <filter_name>"),
        ("!role sync now", ":warning: Usage: !role sync"),
    ];

    for (text, expected) in cases {
        assert_eq!(bot.run(ADMIN, text).await, expected, "{text}");
    }
    assert!(bot.no_remote_calls());
    assert_eq!(bot.permissions.calls(), 0);
}

#[tokio::test]
async fn denied_caller_causes_no_mutation() {
    let bot = TestBot::empty();

    let reply = bot.run(STRANGER, "!role create fc wildcard Fleet Commanders").await;

    assert_eq!(reply, ":warning: User doesn't have permission to this command");
    assert!(bot.no_remote_calls());
    assert_eq!(bot.permissions.calls(), 1);
}

#[tokio::test]
async fn permission_service_failure_is_fatal_and_aborts() {
    let bot = drifted();
    bot.permissions.set_failure(Some("permissions unavailable".to_string()));

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(reply, ":octagonal_sign: permissions unavailable");
    assert!(bot.no_remote_calls());
}

#[tokio::test]
async fn malformed_sender_is_a_warning() {
    let bot = TestBot::empty();

    let reply = bot.run("no-delimiter", "!filter destroy logi").await;

    assert!(reply.starts_with(":warning: "), "{reply}");
    assert!(bot.no_remote_calls());
    assert_eq!(bot.permissions.calls(), 0);
}

#[tokio::test]
async fn mentions_are_rejected_before_the_gate() {
    let bot = TestBot::empty();

    assert_eq!(
        bot.run(ADMIN, "!role create <@123> wildcard Fleet").await,
        ":warning: Discord users may not be roles"
    );
    assert_eq!(
        bot.run(ADMIN, "!role create fc wildcard <@!123>").await,
        ":warning: Discord users may not be descriptions"
    );
    assert_eq!(bot.permissions.calls(), 0);
    assert!(bot.no_remote_calls());
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource handlers
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_listings_have_a_distinct_message() {
    let bot = TestBot::empty();

    assert_eq!(bot.run(ADMIN, "!role list").await, ":white_check_mark: There are no roles");
    assert_eq!(bot.run(ADMIN, "!filter list").await, ":white_check_mark: There are no filters");
    assert_eq!(bot.run(ADMIN, "!rule list").await, ":white_check_mark: There are no rules");
    assert_eq!(bot.run(ADMIN, "!role list_roles").await, ":white_check_mark: You have no roles");
}

#[tokio::test]
async fn role_lifecycle() {
    let bot = TestBot::empty();

    assert_eq!(
        bot.run(ADMIN, "!role create fc fc_members \"Fleet  Commanders\"").await,
        ":white_check_mark: Created role `fc`"
    );
    let stored = bot.directory.get_role("fc").await.unwrap();
    assert_eq!(stored.name, "Fleet Commanders");
    assert_eq!(stored.filter_a, "fc_members");

    assert_eq!(
        bot.run(ADMIN, "!role list").await,
        ":white_check_mark: ```\nfc: Fleet Commanders\n```"
    );
    assert_eq!(
        bot.run(ADMIN, "!role set fc color #00ff00").await,
        ":white_check_mark: Set color of `fc` to '#00ff00'"
    );
    assert!(bot.run(ADMIN, "!role info fc").await.contains("Color: #00ff00\n"));

    assert_eq!(
        bot.run(ADMIN, "!role destroy fc").await,
        ":white_check_mark: Removed role `fc`"
    );
    assert_eq!(
        bot.run(ADMIN, "!role info fc").await,
        ":octagonal_sign: role 'fc' not found"
    );
}

#[tokio::test]
async fn collaborator_errors_are_fatal_and_verbatim() {
    let bot = TestBot::empty();
    bot.directory
        .fail_on("list_filters", ANY_TARGET, RemoteError::transport("directory unavailable"));

    assert_eq!(
        bot.run(ADMIN, "!filter list").await,
        ":octagonal_sign: directory unavailable"
    );
    assert_eq!(
        bot.run(ADMIN, "!role set missing hoist yes").await,
        ":octagonal_sign: role 'missing' not found"
    );
}

#[tokio::test]
async fn filter_members_accept_mentions() {
    let bot = TestBot::new(
        InMemoryDirectory::new().with_filter("logi", "Logistics", &["7"]),
        InMemoryPlatform::new(),
    );

    assert_eq!(
        bot.run(ADMIN, "!filter add_member <@!42> logi").await,
        ":white_check_mark: Added `42` to `logi`"
    );
    assert_eq!(
        bot.run(ADMIN, "!filter list_members logi").await,
        ":white_check_mark: ```\n42\n7\n```"
    );
    assert_eq!(
        bot.run(ADMIN, "!filter remove_member 7 logi").await,
        ":white_check_mark: Removed `7` from `logi`"
    );
    assert_eq!(
        bot.run(STRANGER, "!filter remove_member 42 logi").await,
        ":warning: User doesn't have permission to this command"
    );
    assert_eq!(
        bot.directory.list_members("logi").await.unwrap(),
        vec![UserId::from("42")]
    );
}

#[tokio::test]
async fn filters_and_rules() {
    let bot = TestBot::new(
        InMemoryDirectory::new().with_role(Role::new("fc", "Fleet Commanders")),
        InMemoryPlatform::new(),
    );

    assert_eq!(
        bot.run(ADMIN, "!filter create fc_members 'Fleet Commanders only'").await,
        ":white_check_mark: Created filter `fc_members`"
    );
    assert_eq!(
        bot.directory.get_filter("fc_members").await.unwrap().description,
        "Fleet Commanders only"
    );

    assert_eq!(
        bot.run(ADMIN, "!rule create fc_rule fc fc_members").await,
        ":white_check_mark: Created rule `fc_rule`"
    );
    assert_eq!(
        bot.run(ADMIN, "!rule info fc_rule").await,
        ":white_check_mark: ```\nName: fc_rule\nRole: fc\nFilter: fc_members\n```"
    );
    assert_eq!(
        bot.run(ADMIN, "!rule create fc_rule fc fc_members").await,
        ":octagonal_sign: rule 'fc_rule' already exists"
    );
    assert_eq!(
        bot.run(ADMIN, "!rule destroy fc_rule").await,
        ":white_check_mark: Removed rule `fc_rule`"
    );
}

#[tokio::test]
async fn caller_roles_follow_filter_membership() {
    let bot = TestBot::new(
        InMemoryDirectory::new()
            .with_filter("fc_members", "FCs", &["1"])
            .with_role(Role::new("fc", "Fleet Commanders").with_filter("fc_members")),
        InMemoryPlatform::new(),
    );

    assert_eq!(
        bot.run(ADMIN, "!role list_roles").await,
        ":white_check_mark: ```\nfc: Fleet Commanders\n```"
    );
    assert_eq!(
        bot.run(ADMIN, "!role list_members fc").await,
        ":white_check_mark: ```\n1\n```"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_creates_missing_roles_on_both_sides() {
    let bot = drifted();

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(
        reply,
        ":white_check_mark: ```\nCreated c in the directory\nCreated a in the chat service\n```"
    );
    assert_eq!(bot.directory.calls(), vec!["list_roles", "add_role c"]);
    assert_eq!(bot.platform.calls(), vec!["get_all_roles g", "create_role a"]);
    assert_eq!(bot.directory.role_names(), vec!["a", "b", "c"]);
    assert_eq!(bot.platform.role_names(GUILD), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn second_sync_has_nothing_to_do() {
    let bot = drifted();

    bot.run(ADMIN, "!role sync").await;
    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(reply, ":white_check_mark: Nothing to sync");
}

#[tokio::test]
async fn sync_swallows_duplicates() {
    let bot = drifted();
    bot.directory
        .fail_on("add_role", "c", RemoteError::already_exists("role 'c'"));

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(reply, ":white_check_mark: ```\nCreated a in the chat service\n```");
}

#[tokio::test]
async fn sync_reports_failures_alongside_successes() {
    let bot = drifted();
    bot.platform
        .fail_on("create_role", "a", RemoteError::transport("chat service unavailable"));

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(
        reply,
        ":octagonal_sign: ```\nCreated c in the directory\nFailed to create a in the chat service: chat service unavailable\n```"
    );
    assert_eq!(bot.directory.role_names(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn sync_fetch_failure_aborts_without_mutation() {
    let bot = drifted();
    bot.directory
        .fail_on("list_roles", ANY_TARGET, RemoteError::transport("directory unavailable"));

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(reply, ":octagonal_sign: directory unavailable");
    assert_eq!(bot.directory.calls(), vec!["list_roles"]);
    assert_eq!(bot.platform.calls(), vec!["get_all_roles g"]);
}

#[tokio::test]
async fn sync_ignores_configured_platform_roles_and_normalizes_names() {
    let bot = TestBot::new(
        InMemoryDirectory::new().with_role(Role::new("fleet_commanders", "Fleet Commanders")),
        InMemoryPlatform::new()
            .with_role(GUILD, "@everyone", &[])
            .with_role(GUILD, "Fleet  Commanders", &[])
            .with_role(GUILD, "Logi Team", &[]),
    );

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(reply, ":white_check_mark: ```\nCreated logi_team in the directory\n```");
    let created = bot.directory.get_role("logi_team").await.unwrap();
    assert_eq!(created.name, "Logi Team");
    assert_eq!(created.kind, "discord");
    assert!(created.is_wildcard_bound());
}

#[tokio::test]
async fn sync_members_fills_both_sides() {
    let bot = TestBot::new(
        InMemoryDirectory::new()
            .with_filter("fc_members", "FCs", &["1", "2"])
            .with_role(Role::new("fc", "Fleet Commanders").with_filter("fc_members"))
            .with_role(Role::new("everyone", "Everyone")),
        InMemoryPlatform::new()
            .with_role(GUILD, "fc", &["2", "3"])
            .with_role(GUILD, "everyone", &["9"]),
    );

    let reply = bot.run(ADMIN, "!role sync_members").await;

    assert_eq!(
        reply,
        ":white_check_mark: ```\nAdded 3 to fc in the directory\nAdded 1 to fc in the chat service\n```"
    );
    assert_eq!(
        bot.directory.list_members("fc_members").await.unwrap(),
        vec![UserId::from("1"), UserId::from("2"), UserId::from("3")]
    );
    assert!(!bot.platform.calls().iter().any(|c| c.contains("everyone")));

    assert_eq!(
        bot.run(ADMIN, "!role sync_members").await,
        ":white_check_mark: Nothing to sync"
    );
}

#[tokio::test]
async fn sync_members_requires_admin() {
    let bot = drifted();

    let reply = bot.run(STRANGER, "!role sync_members").await;

    assert_eq!(reply, ":warning: User doesn't have permission to this command");
    assert!(bot.no_remote_calls());
}

#[tokio::test]
async fn detailed_role_listing_and_keys() {
    let bot = TestBot::new(
        InMemoryDirectory::new().with_role(Role::new("fc", "Fleet Commanders").with_filter("fc_members")),
        InMemoryPlatform::new(),
    );

    assert_eq!(
        bot.run(ADMIN, "!role list all").await,
        ":white_check_mark: ```\nfc: Fleet Commanders (kind=discord, filters=fc_members/wildcard, joinable=false, sig=false)\n```"
    );
    assert_eq!(
        bot.run(ADMIN, "!role keys").await,
        ":white_check_mark: ```\nKeys:\n\tName\n\tColor\n\tHoist\n\tPosition\n\tMentionable\n\tJoinable\n\tFilterA\n\tFilterB\n```"
    );
}

#[tokio::test]
async fn missing_role_keys_have_a_distinct_message() {
    let bot = TestBot::new(InMemoryDirectory::new().with_role_keys(&[]), InMemoryPlatform::new());

    assert_eq!(bot.run(ADMIN, "!role keys").await, ":white_check_mark: There are no role keys");
}

#[tokio::test]
async fn rule_listing_shows_bindings() {
    let bot = TestBot::new(
        InMemoryDirectory::new().with_rule(Rule {
            name: "fc_rule".to_string(),
            role: "fc".to_string(),
            filter: "fc_members".to_string(),
        }),
        InMemoryPlatform::new(),
    );

    assert_eq!(
        bot.run(ADMIN, "!rule list").await,
        ":white_check_mark: ```\nfc_rule: fc <- fc_members\n```"
    );
}

#[tokio::test]
async fn sync_skips_roles_with_blank_names() {
    let bot = TestBot::new(
        InMemoryDirectory::new(),
        InMemoryPlatform::new()
            .with_role(GUILD, "  ", &[])
            .with_role(GUILD, "logi", &[]),
    );

    let reply = bot.run(ADMIN, "!role sync").await;

    assert_eq!(reply, ":white_check_mark: ```\nCreated logi in the directory\n```");
    assert_eq!(bot.directory.role_names(), vec!["logi"]);
}

fn fc_on_both_sides() -> TestBot {
    TestBot::new(
        InMemoryDirectory::new()
            .with_filter("fc_members", "FCs", &["1", "2"])
            .with_role(Role::new("fc", "Fleet Commanders").with_filter("fc_members")),
        InMemoryPlatform::new().with_role(GUILD, "fc", &["2", "3"]),
    )
}

#[tokio::test]
async fn sync_members_reports_failures_alongside_successes() {
    let bot = fc_on_both_sides();
    bot.platform
        .fail_on("add_member_role", "fc 1", RemoteError::transport("chat service unavailable"));

    let reply = bot.run(ADMIN, "!role sync_members").await;

    assert_eq!(
        reply,
        ":octagonal_sign: ```\nAdded 3 to fc in the directory\nFailed to add 1 to fc in the chat service: chat service unavailable\n```"
    );
    assert_eq!(
        bot.directory.list_members("fc_members").await.unwrap(),
        vec![UserId::from("1"), UserId::from("2"), UserId::from("3")]
    );
}

#[tokio::test]
async fn sync_members_fetch_failure_aborts_without_mutation() {
    let bot = fc_on_both_sides();
    bot.platform
        .fail_on("role_members", "fc", RemoteError::transport("chat service unavailable"));

    let reply = bot.run(ADMIN, "!role sync_members").await;

    assert_eq!(reply, ":octagonal_sign: chat service unavailable");
    assert_eq!(bot.directory.calls(), vec!["list_roles", "role_members fc"]);
    assert_eq!(bot.platform.calls(), vec!["get_all_roles g", "role_members fc"]);
}

#[tokio::test]
async fn sync_members_aborts_when_a_role_filter_is_gone() {
    let bot = TestBot::new(
        InMemoryDirectory::new()
            .with_filter("alpha_members", "Alpha", &["1"])
            .with_role(Role::new("alpha", "Alpha").with_filter("alpha_members"))
            .with_role(Role::new("fc", "Fleet Commanders").with_filter("gone")),
        InMemoryPlatform::new()
            .with_role(GUILD, "alpha", &[])
            .with_role(GUILD, "fc", &[]),
    );

    let reply = bot.run(ADMIN, "!role sync_members").await;

    assert_eq!(reply, ":octagonal_sign: filter 'gone' not found");
    assert!(!bot.directory.calls().iter().any(|c| c.starts_with("add_")));
    assert!(!bot.platform.calls().iter().any(|c| c.starts_with("add_")));
}
