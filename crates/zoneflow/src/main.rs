mod commands;

use clap::{Parser, Subcommand};
use zoneflow_api::ApiClient;

#[derive(Parser)]
#[command(name = "zflow")]
#[command(about = "Converge Cloudflare resources to a requested state", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up accounts
    #[command(subcommand)]
    Account(AccountCommands),
    /// Manage zones
    #[command(subcommand)]
    Zone(ZoneCommands),
    /// Manage zone settings
    #[command(subcommand)]
    Setting(SettingCommands),
    /// Manage rulesets
    #[command(subcommand)]
    Ruleset(RulesetCommands),
    /// Manage rules inside a ruleset
    #[command(subcommand)]
    Rule(RuleCommands),
    /// Manage page rules
    #[command(subcommand)]
    Pagerule(PageruleCommands),
    /// Manage account rules lists
    #[command(subcommand)]
    List(ListCommands),
    /// Manage single rules list items
    #[command(subcommand)]
    Item(ItemCommands),
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Show an account by name
    Info {
        /// Account name
        name: String,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ZoneCommands {
    /// Create a zone unless it already exists
    Ensure {
        /// Zone name (example.com)
        zone: String,
        /// Id of the account that owns the zone
        #[arg(long)]
        account_id: String,
        /// Zone type (full, partial, secondary)
        #[arg(long = "type", default_value = "full")]
        zone_type: zoneflow_core::ZoneType,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a zone if it exists
    Remove {
        /// Zone name
        zone: String,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a zone by name
    Info {
        /// Zone name
        zone: String,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SettingCommands {
    /// Drive a zone setting to a value
    Set {
        /// Zone name
        zone: String,
        /// Setting id (ssl, always_use_https, security_header, ...)
        setting: zoneflow_core::SettingId,
        /// New value: JSON, a bare string, or @file
        value: String,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current value of a zone setting
    Get {
        /// Zone name
        zone: String,
        /// Setting id
        setting: zoneflow_core::SettingId,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RulesetCommands {
    /// Create a ruleset unless it already exists
    Ensure {
        /// Ruleset name
        name: String,
        /// Account id owning the ruleset
        #[arg(long, conflicts_with = "zone", required_unless_present = "zone")]
        account_id: Option<String>,
        /// Zone name owning the ruleset
        #[arg(long)]
        zone: Option<String>,
        /// Phase the ruleset runs in
        #[arg(long)]
        phase: zoneflow_core::RulesetPhase,
        /// Kind of the ruleset (managed, custom, root, zone)
        #[arg(long)]
        kind: zoneflow_core::RulesetKind,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a ruleset if it exists
    Remove {
        /// Ruleset name
        name: String,
        /// Account id owning the ruleset
        #[arg(long, conflicts_with = "zone", required_unless_present = "zone")]
        account_id: Option<String>,
        /// Zone name owning the ruleset
        #[arg(long)]
        zone: Option<String>,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a ruleset by name and phase, rules included
    Info {
        /// Ruleset name
        name: String,
        /// Account id owning the ruleset
        #[arg(long, conflicts_with = "zone", required_unless_present = "zone")]
        account_id: Option<String>,
        /// Zone name owning the ruleset
        #[arg(long)]
        zone: Option<String>,
        /// Phase the ruleset runs in
        #[arg(long)]
        phase: zoneflow_core::RulesetPhase,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RuleCommands {
    /// Drive a rule in a ruleset to the requested shape
    Ensure {
        /// Name of the ruleset holding the rule
        ruleset: String,
        /// Stable reference identifying the rule
        rule_ref: String,
        /// Account id owning the ruleset
        #[arg(long, conflicts_with = "zone", required_unless_present = "zone")]
        account_id: Option<String>,
        /// Zone name owning the ruleset
        #[arg(long)]
        zone: Option<String>,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Action taken when the expression matches
        #[arg(long)]
        action: Option<zoneflow_core::RuleAction>,
        /// Action parameters: JSON or @file
        #[arg(long)]
        action_parameters: Option<String>,
        /// Whether the rule is enabled
        #[arg(long)]
        enabled: Option<bool>,
        /// Exposed credential check: JSON or @file
        #[arg(long)]
        exposed_credential_check: Option<String>,
        /// Filter expression
        #[arg(long)]
        expression: Option<String>,
        /// Logging overrides: JSON or @file
        #[arg(long)]
        logging: Option<String>,
        /// Placement within the ruleset: JSON or @file
        #[arg(long)]
        position: Option<String>,
        /// Rate limiting parameters: JSON or @file
        #[arg(long)]
        ratelimit: Option<String>,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a rule from a ruleset if it is there
    Remove {
        /// Name of the ruleset holding the rule
        ruleset: String,
        /// Stable reference identifying the rule
        rule_ref: String,
        /// Account id owning the ruleset
        #[arg(long, conflicts_with = "zone", required_unless_present = "zone")]
        account_id: Option<String>,
        /// Zone name owning the ruleset
        #[arg(long)]
        zone: Option<String>,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a rule from a ruleset identified by name and phase
    Info {
        /// Name of the ruleset holding the rule
        ruleset: String,
        /// Account id owning the ruleset
        #[arg(long, conflicts_with = "zone", required_unless_present = "zone")]
        account_id: Option<String>,
        /// Zone name owning the ruleset
        #[arg(long)]
        zone: Option<String>,
        /// Phase the ruleset runs in
        #[arg(long)]
        phase: zoneflow_core::RulesetPhase,
        /// Rule reference to match
        #[arg(long = "ref")]
        rule_ref: Option<String>,
        /// Rule description to match
        #[arg(long)]
        description: Option<String>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PageruleCommands {
    /// Drive the page rule for a target URL to the requested shape
    Ensure {
        /// Zone name
        zone: String,
        /// Target URL pattern the rule applies to
        target: String,
        /// Actions as a JSON array of {id, value} objects, or @file
        #[arg(long)]
        actions: String,
        /// Requested priority within the zone's page rules
        #[arg(long, default_value_t = 1)]
        priority: u32,
        /// Create the rule in the disabled state
        #[arg(long)]
        disabled: bool,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the page rule for a target URL if it exists
    Remove {
        /// Zone name
        zone: String,
        /// Target URL pattern the rule applies to
        target: String,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Make sure a list exists and holds exactly the given items
    Ensure {
        /// List name
        name: String,
        /// Account name (defaults to default_account from the config)
        #[arg(long, env = "ZONEFLOW_ACCOUNT")]
        account: Option<String>,
        /// List kind (ip, asn, hostname, redirect)
        #[arg(long)]
        kind: zoneflow_core::ListKind,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Items as a JSON array, or @file
        #[arg(long)]
        items: Option<String>,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a list if it exists
    Remove {
        /// List name
        name: String,
        /// Account name (defaults to default_account from the config)
        #[arg(long, env = "ZONEFLOW_ACCOUNT")]
        account: Option<String>,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Make sure a list holds exactly this item
    Ensure {
        /// Name of the list holding the item
        list: String,
        /// Account name (defaults to default_account from the config)
        #[arg(long, env = "ZONEFLOW_ACCOUNT")]
        account: Option<String>,
        /// List kind (ip, asn, hostname, redirect)
        #[arg(long)]
        kind: zoneflow_core::ListKind,
        /// The item as a JSON object, or @file
        #[arg(long)]
        item: String,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an item from a list if it is there
    Remove {
        /// Name of the list holding the item
        list: String,
        /// Account name (defaults to default_account from the config)
        #[arg(long, env = "ZONEFLOW_ACCOUNT")]
        account: Option<String>,
        /// List kind (ip, asn, hostname, redirect)
        #[arg(long)]
        kind: zoneflow_core::ListKind,
        /// The item as a JSON object, or @file
        #[arg(long)]
        item: String,
        /// Read the current state but apply nothing
        #[arg(long)]
        dry_run: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    // Version needs neither config nor credentials
    if matches!(cli.command, Commands::Version) {
        println!("zoneflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = zoneflow_config::load()?;
    let credentials = config.credentials()?;
    let client = ApiClient::new(credentials);

    match cli.command {
        Commands::Account(cmd) => {
            commands::account::handle(cmd, &client).await?;
        }
        Commands::Zone(cmd) => {
            commands::zone::handle(cmd, &client).await?;
        }
        Commands::Setting(cmd) => {
            commands::setting::handle(cmd, &client).await?;
        }
        Commands::Ruleset(cmd) => {
            commands::ruleset::handle(cmd, &client).await?;
        }
        Commands::Rule(cmd) => {
            commands::rule::handle(cmd, &client).await?;
        }
        Commands::Pagerule(cmd) => {
            commands::pagerule::handle(cmd, &client).await?;
        }
        Commands::List(cmd) => {
            commands::list::handle(cmd, &client, &config).await?;
        }
        Commands::Item(cmd) => {
            commands::item::handle(cmd, &client, &config).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
