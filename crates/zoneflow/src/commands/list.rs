use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_config::ZoneflowConfig;
use zoneflow_core::ListOps;

use super::{account_name, print_json, read_items_arg};
use crate::ListCommands;

pub async fn handle(
    cmd: ListCommands,
    client: &ApiClient,
    config: &ZoneflowConfig,
) -> anyhow::Result<()> {
    match cmd {
        ListCommands::Ensure {
            name,
            account,
            kind,
            description,
            items,
            dry_run,
            json,
        } => {
            let account = account_name(account, config)?;
            let items = items.as_deref().map(read_items_arg).transpose()?;
            let outcome = ListOps::new(client)
                .ensure(
                    &account,
                    &name,
                    kind,
                    description.as_deref(),
                    items.as_deref(),
                    dry_run,
                )
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!(
                    "{} List {} now holds {} item(s)",
                    "✓".green().bold(),
                    name.cyan(),
                    outcome.rules_list.len()
                );
            } else if dry_run {
                println!(
                    "{} List {} currently holds {} item(s)",
                    "dry run:".yellow(),
                    name.cyan(),
                    outcome.rules_list.len()
                );
            } else {
                println!("List {} already holds the requested items", name.cyan());
            }
        }
        ListCommands::Remove {
            name,
            account,
            dry_run,
            json,
        } => {
            let account = account_name(account, config)?;
            let outcome = ListOps::new(client).remove(&account, &name, dry_run).await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Deleted list {}", "✓".green().bold(), name.cyan());
            } else if dry_run {
                println!("{} Read-only pass, nothing deleted", "dry run:".yellow());
            } else {
                println!("List {} is not there, nothing to do", name.cyan());
            }
        }
    }

    Ok(())
}
